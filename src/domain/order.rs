use std::fmt;

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::cart::{Cart, ProductId};

/// Orders at or above this subtotal ship free.
pub const FREE_DELIVERY_THRESHOLD: i64 = 499;
pub const DELIVERY_FEE: i64 = 40;
pub const DEFAULT_COUNTRY: &str = "India";

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineInput {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShippingAddress {
    pub full_name: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// A field of [`ShippingAddress`] that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ShippingAddress {
    /// Checks minimum lengths of the required fields, reporting all of them.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let rules: [(&'static str, &str, usize, &'static str); 7] = [
            ("fullName", &self.full_name, 2, "Full name is required"),
            ("phone", &self.phone, 10, "Valid phone number is required"),
            ("addressLine1", &self.address_line1, 5, "Address is required"),
            ("city", &self.city, 2, "City is required"),
            ("state", &self.state, 2, "State is required"),
            ("postalCode", &self.postal_code, 6, "Valid PIN code is required"),
            ("country", &self.country, 1, "Country is required"),
        ];

        let errors: Vec<FieldError> = rules
            .into_iter()
            .filter(|(_, value, min, _)| value.trim().chars().count() < *min)
            .map(|(field, _, _, message)| FieldError { field, message })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrder {
    pub user_id: Uuid,
    pub lines: Vec<OrderLineInput>,
    pub shipping_address: ShippingAddress,
}

impl CreateOrder {
    pub fn from_cart(user_id: Uuid, cart: &Cart, shipping_address: ShippingAddress) -> Self {
        let lines = cart
            .lines()
            .iter()
            .map(|l| OrderLineInput {
                product_id: l.product_id.clone(),
                quantity: l.quantity,
                unit_price: l.unit_price.clone(),
            })
            .collect();

        Self {
            user_id,
            lines,
            shipping_address,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "CONFIRMED" => Self::Confirmed,
            "PAID" => Self::Paid,
            "SHIPPED" => Self::Shipped,
            "DELIVERED" => Self::Delivered,
            "CANCELLED" => Self::Cancelled,
            _ => Self::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Paid => "PAID",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineView {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub total_amount: BigDecimal,
    pub lines: Vec<OrderLineView>,
    pub shipping_address: Option<ShippingAddress>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Amounts shown at checkout, derived from the cart subtotal.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub subtotal: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub grand_total: BigDecimal,
}

impl OrderSummary {
    pub fn for_subtotal(subtotal: BigDecimal) -> Self {
        let delivery_fee = if subtotal >= BigDecimal::from(FREE_DELIVERY_THRESHOLD) {
            BigDecimal::from(0)
        } else {
            BigDecimal::from(DELIVERY_FEE)
        };
        let grand_total = &subtotal + &delivery_fee;

        Self {
            subtotal,
            delivery_fee,
            grand_total,
        }
    }

    pub fn free_delivery(&self) -> bool {
        self.delivery_fee == BigDecimal::from(0)
    }

    /// Grand total in the currency's minor unit (paise for INR), rounded.
    pub fn amount_minor(&self) -> Option<i64> {
        (&self.grand_total * &BigDecimal::from(100)).round(0).to_i64()
    }
}
