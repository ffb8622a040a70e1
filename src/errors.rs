use thiserror::Error;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::FieldError;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid shipping address: {}", join_fields(.0))]
    InvalidAddress(Vec<FieldError>),

    #[error("Order creation failed: {0}")]
    OrderCreation(DomainError),

    #[error("Payment gateway unavailable for order {order_id}: {source}")]
    GatewayInit { order_id: Uuid, source: DomainError },

    #[error("Payment verification failed for order {order_id}: {reason}")]
    VerificationFailed { order_id: Uuid, reason: String },

    #[error("Payment for order {order_id} was not completed")]
    Abandoned { order_id: Uuid },
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl CheckoutError {
    /// Message suitable for showing to the customer.
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::NotAuthenticated => "Please sign in to continue to checkout.".to_string(),
            CheckoutError::EmptyCart => "Your cart is empty.".to_string(),
            CheckoutError::InvalidAddress(errors) => errors
                .iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join(". "),
            CheckoutError::OrderCreation(_) => {
                "Failed to process payment. Please try again.".to_string()
            }
            CheckoutError::GatewayInit { .. } => {
                "Failed to load payment gateway. Please try again.".to_string()
            }
            CheckoutError::VerificationFailed { .. } => {
                "Payment verification failed. Please contact support.".to_string()
            }
            CheckoutError::Abandoned { .. } => {
                "Payment was not completed. Your cart has been kept so you can try again."
                    .to_string()
            }
        }
    }

    /// Whether the customer can simply try the checkout again.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            CheckoutError::NotAuthenticated
                | CheckoutError::EmptyCart
                | CheckoutError::InvalidAddress(_)
                | CheckoutError::VerificationFailed { .. }
        )
    }

    /// The platform order left pending by a failure after order creation.
    pub fn pending_order(&self) -> Option<Uuid> {
        match self {
            CheckoutError::GatewayInit { order_id, .. }
            | CheckoutError::VerificationFailed { order_id, .. }
            | CheckoutError::Abandoned { order_id } => Some(*order_id),
            _ => None,
        }
    }
}
