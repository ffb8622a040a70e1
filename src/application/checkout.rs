use std::time::Duration;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{CreateOrder, OrderSummary, ShippingAddress};
use crate::domain::payment::{
    CustomerPrefill, GatewayCheckout, GatewayResponse, PaymentResult, PaymentVerification,
};
use crate::domain::ports::{KeyValueStorage, OrderService, PaymentGateway, PaymentService};
use crate::domain::user::User;
use crate::errors::CheckoutError;

use super::cart_store::CartStore;

#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub gateway_key_id: String,
    pub merchant_name: String,
    pub currency: String,
    /// Upper bound on the customer's time in the gateway widget.
    pub payment_timeout: Duration,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            gateway_key_id: "rzp_test_xxxxx".to_string(),
            merchant_name: "CloudForge".to_string(),
            currency: "INR".to_string(),
            payment_timeout: Duration::from_secs(15 * 60),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    pub order_id: Uuid,
    pub payment: PaymentResult,
    pub summary: OrderSummary,
}

/// Result of handing the customer to the gateway.
enum GatewayOutcome {
    Paid(GatewayResponse),
    Dismissed,
    TimedOut,
}

/// Drives one checkout: platform order, gateway order, customer payment and
/// server-side verification.
///
/// The cart is cleared only after the payment service confirms the gateway
/// signature. Every other exit leaves it untouched.
pub struct CheckoutService<O, P, G> {
    orders: O,
    payments: P,
    gateway: G,
    settings: CheckoutSettings,
}

impl<O, P, G> CheckoutService<O, P, G>
where
    O: OrderService,
    P: PaymentService,
    G: PaymentGateway,
{
    pub fn new(orders: O, payments: P, gateway: G, settings: CheckoutSettings) -> Self {
        Self {
            orders,
            payments,
            gateway,
            settings,
        }
    }

    /// Amounts the customer will be charged for the current cart.
    pub fn summary<S: KeyValueStorage>(&self, cart: &CartStore<S>) -> OrderSummary {
        OrderSummary::for_subtotal(cart.total())
    }

    pub async fn checkout<S: KeyValueStorage>(
        &self,
        cart: &mut CartStore<S>,
        user: Option<&User>,
        address: &ShippingAddress,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let user = user.ok_or(CheckoutError::NotAuthenticated)?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        address.validate().map_err(CheckoutError::InvalidAddress)?;

        let summary = self.summary(cart);
        let amount = summary.amount_minor().ok_or_else(|| {
            CheckoutError::OrderCreation(DomainError::InvalidInput(format!(
                "order total {} is out of range",
                summary.grand_total
            )))
        })?;

        // 1. Platform order
        let request = CreateOrder::from_cart(user.id, cart.cart(), address.clone());
        let order = self.orders.create_order(&request).await.map_err(|e| {
            log::error!("Order creation failed: {}", e);
            CheckoutError::OrderCreation(e)
        })?;
        let order_id = order.id;
        log::info!("Created order {} for {} ({} paise)", order_id, user.id, amount);

        // 2. Gateway order
        let gateway_order = self
            .payments
            .create_gateway_order(order_id, amount, &self.settings.currency)
            .await
            .map_err(|source| {
                log::error!("Gateway order for {} failed: {}", order_id, source);
                CheckoutError::GatewayInit { order_id, source }
            })?;

        // 3. Customer pays in the gateway widget
        let checkout = GatewayCheckout {
            key_id: self.settings.gateway_key_id.clone(),
            amount,
            currency: gateway_order.currency.clone(),
            merchant_name: self.settings.merchant_name.clone(),
            description: format!("Order #{order_id}"),
            gateway_order_id: gateway_order.gateway_order_id.clone(),
            prefill: CustomerPrefill {
                name: address.full_name.clone(),
                email: user.email.clone(),
                contact: address.phone.clone(),
            },
        };

        let response = match self.collect_payment(order_id, &checkout).await? {
            GatewayOutcome::Paid(response) => response,
            GatewayOutcome::Dismissed => {
                log::warn!("Payment for order {} dismissed by customer", order_id);
                return Err(CheckoutError::Abandoned { order_id });
            }
            GatewayOutcome::TimedOut => {
                log::warn!(
                    "No payment callback for order {} within {:?}",
                    order_id,
                    self.settings.payment_timeout
                );
                return Err(CheckoutError::Abandoned { order_id });
            }
        };

        // 4. Server-side signature verification
        let verification = PaymentVerification::new(response, order_id);
        let payment = match self.payments.verify_payment(&verification).await {
            Ok(result) if result.success => result,
            Ok(result) => {
                log::error!("Payment for order {} rejected: {}", order_id, result.status);
                return Err(CheckoutError::VerificationFailed {
                    order_id,
                    reason: result.status,
                });
            }
            Err(e) => {
                log::error!("Payment verification for order {} failed: {}", order_id, e);
                return Err(CheckoutError::VerificationFailed {
                    order_id,
                    reason: e.to_string(),
                });
            }
        };

        cart.clear_cart();
        log::info!("Order {} paid ({})", order_id, payment.payment_id);

        Ok(CheckoutReceipt {
            order_id,
            payment,
            summary,
        })
    }

    async fn collect_payment(
        &self,
        order_id: Uuid,
        checkout: &GatewayCheckout,
    ) -> Result<GatewayOutcome, CheckoutError> {
        match tokio::time::timeout(self.settings.payment_timeout, self.gateway.collect(checkout))
            .await
        {
            Ok(Ok(Some(response))) => Ok(GatewayOutcome::Paid(response)),
            Ok(Ok(None)) => Ok(GatewayOutcome::Dismissed),
            Ok(Err(source)) => {
                log::error!("Payment gateway failed to open for {}: {}", order_id, source);
                Err(CheckoutError::GatewayInit { order_id, source })
            }
            Err(_) => Ok(GatewayOutcome::TimedOut),
        }
    }
}
