//! Wire representations of the backend services' JSON payloads.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cart::ProductId;
use crate::domain::catalog::{primary_image, Page, Product};
use crate::domain::order::{
    CreateOrder, OrderLineView, OrderStatus, OrderView, ShippingAddress, DEFAULT_COUNTRY,
};
use crate::domain::payment::{GatewayOrder, PaymentResult, PaymentVerification};
use crate::domain::user::{LoginRequest, RegisterRequest, Session, User};

// ── Auth ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LoginBody<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a LoginRequest> for LoginBody<'a> {
    fn from(r: &'a LoginRequest) -> Self {
        Self {
            username: &r.username,
            password: &r.password,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<&'a str>,
}

impl<'a> From<&'a RegisterRequest> for RegisterBody<'a> {
    fn from(r: &'a RegisterRequest) -> Self {
        Self {
            username: &r.username,
            email: &r.email,
            password: &r.password,
            first_name: r.first_name.as_deref(),
            last_name: r.last_name.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginResponseDto {
    pub token: String,
    #[serde(rename = "type", default)]
    pub token_type: Option<String>,
    pub user: User,
}

impl From<LoginResponseDto> for Session {
    fn from(dto: LoginResponseDto) -> Self {
        Session {
            token: dto.token,
            token_type: dto.token_type.unwrap_or_else(|| "Bearer".to_string()),
            user: dto.user,
        }
    }
}

// ── Catalog ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: BigDecimal,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl From<ProductDto> for Product {
    fn from(dto: ProductDto) -> Self {
        Product {
            id: ProductId::new(dto.id),
            image_url: primary_image(&dto.images),
            name: dto.name,
            description: dto.description,
            category: dto.category,
            price: dto.price,
            stock: dto.stock,
            sku: dto.sku,
            images: dto.images,
            tags: dto.tags,
            active: dto.active,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDto<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: i64,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default)]
    pub number: i64,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
}

impl<T> PageDto<T> {
    pub fn into_page<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
            first: self.first,
            last: self.last,
        }
        .map(f)
    }
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddressDto {
    pub full_name: String,
    pub phone: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(default)]
    pub country: Option<String>,
}

impl From<&ShippingAddress> for ShippingAddressDto {
    fn from(a: &ShippingAddress) -> Self {
        Self {
            full_name: a.full_name.clone(),
            phone: a.phone.clone(),
            address_line1: a.address_line1.clone(),
            address_line2: a.address_line2.clone().filter(|l| !l.trim().is_empty()),
            city: a.city.clone(),
            state: a.state.clone(),
            postal_code: a.postal_code.clone(),
            country: Some(a.country.clone()),
        }
    }
}

impl From<ShippingAddressDto> for ShippingAddress {
    fn from(dto: ShippingAddressDto) -> Self {
        Self {
            full_name: dto.full_name,
            phone: dto.phone,
            address_line1: dto.address_line1,
            address_line2: dto.address_line2,
            city: dto.city,
            state: dto.state,
            postal_code: dto.postal_code,
            country: dto.country.unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    pub product_id: String,
    pub quantity: u32,
    pub price: BigDecimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderBody {
    pub user_id: Uuid,
    pub items: Vec<OrderItemDto>,
    pub shipping_address: ShippingAddressDto,
}

impl From<&CreateOrder> for CreateOrderBody {
    fn from(order: &CreateOrder) -> Self {
        Self {
            user_id: order.user_id,
            items: order
                .lines
                .iter()
                .map(|l| OrderItemDto {
                    product_id: l.product_id.to_string(),
                    quantity: l.quantity,
                    price: l.unit_price.clone(),
                })
                .collect(),
            shipping_address: (&order.shipping_address).into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    #[serde(default)]
    pub total_amount: Option<BigDecimal>,
    #[serde(default)]
    pub items: Vec<OrderItemDto>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddressDto>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<OrderDto> for OrderView {
    fn from(dto: OrderDto) -> Self {
        let lines: Vec<OrderLineView> = dto
            .items
            .into_iter()
            .map(|i| OrderLineView {
                product_id: ProductId::new(i.product_id),
                quantity: i.quantity,
                unit_price: i.price,
            })
            .collect();

        // Older order-service builds omit the total; derive it from the lines.
        let total_amount = dto.total_amount.unwrap_or_else(|| {
            lines
                .iter()
                .map(|l| &l.unit_price * &BigDecimal::from(l.quantity))
                .sum()
        });

        OrderView {
            id: dto.id,
            user_id: dto.user_id,
            status: OrderStatus::parse(&dto.status),
            total_amount,
            lines,
            shipping_address: dto.shipping_address.map(Into::into),
            created_at: dto.created_at,
        }
    }
}

// ── Payments ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGatewayOrderBody<'a> {
    pub order_id: Uuid,
    pub amount: i64,
    pub currency: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayOrderDto {
    pub razorpay_order_id: String,
    pub amount: i64,
    pub currency: String,
}

impl From<GatewayOrderDto> for GatewayOrder {
    fn from(dto: GatewayOrderDto) -> Self {
        Self {
            gateway_order_id: dto.razorpay_order_id,
            amount: dto.amount,
            currency: dto.currency,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationBody<'a> {
    pub razorpay_order_id: &'a str,
    pub razorpay_payment_id: &'a str,
    pub razorpay_signature: &'a str,
    pub order_id: Uuid,
}

impl<'a> From<&'a PaymentVerification> for VerificationBody<'a> {
    fn from(v: &'a PaymentVerification) -> Self {
        Self {
            razorpay_order_id: &v.gateway_order_id,
            razorpay_payment_id: &v.gateway_payment_id,
            razorpay_signature: &v.signature,
            order_id: v.order_id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResultDto {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub payment_id: String,
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub status: String,
}

impl From<PaymentResultDto> for PaymentResult {
    fn from(dto: PaymentResultDto) -> Self {
        Self {
            success: dto.success,
            payment_id: dto.payment_id,
            order_id: dto.order_id,
            status: dto.status,
        }
    }
}
