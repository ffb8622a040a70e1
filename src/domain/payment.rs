use uuid::Uuid;

/// Gateway-side order created for a platform order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOrder {
    pub gateway_order_id: String,
    /// Minor units.
    pub amount: i64,
    pub currency: String,
}

/// Prefill details shown by the gateway's checkout widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerPrefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// Everything the gateway's client-side flow needs to collect a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCheckout {
    pub key_id: String,
    pub amount: i64,
    pub currency: String,
    pub merchant_name: String,
    pub description: String,
    pub gateway_order_id: String,
    pub prefill: CustomerPrefill,
}

/// Signed payload the gateway hands back once the customer has paid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentVerification {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
    pub order_id: Uuid,
}

impl PaymentVerification {
    pub fn new(response: GatewayResponse, order_id: Uuid) -> Self {
        Self {
            gateway_order_id: response.gateway_order_id,
            gateway_payment_id: response.gateway_payment_id,
            signature: response.signature,
            order_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentResult {
    pub success: bool,
    pub payment_id: String,
    pub order_id: String,
    pub status: String,
}
