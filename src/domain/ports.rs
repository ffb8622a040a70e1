use uuid::Uuid;

use super::catalog::{Page, PageRequest, Product};
use super::cart::ProductId;
use super::errors::{DomainError, StorageError};
use super::order::{CreateOrder, OrderView};
use super::payment::{GatewayCheckout, GatewayOrder, GatewayResponse, PaymentResult, PaymentVerification};
use super::user::{LoginRequest, RegisterRequest, Session, User};

/// Client-local storage of named string entries.
pub trait KeyValueStorage: Send + Sync + 'static {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

pub trait AuthService {
    async fn login(&self, request: &LoginRequest) -> Result<Session, DomainError>;
    async fn register(&self, request: &RegisterRequest) -> Result<Session, DomainError>;
    async fn current_user(&self) -> Result<User, DomainError>;
}

pub trait CatalogService {
    async fn products(&self, page: PageRequest) -> Result<Page<Product>, DomainError>;
    async fn all_products(&self) -> Result<Vec<Product>, DomainError>;
    async fn product(&self, id: &ProductId) -> Result<Product, DomainError>;
    async fn products_by_category(
        &self,
        category: &str,
        page: PageRequest,
    ) -> Result<Page<Product>, DomainError>;
    async fn search(&self, query: &str, page: PageRequest) -> Result<Page<Product>, DomainError>;
    async fn latest_products(&self) -> Result<Vec<Product>, DomainError>;
}

pub trait OrderService {
    async fn create_order(&self, order: &CreateOrder) -> Result<OrderView, DomainError>;
    async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError>;
    async fn order(&self, id: Uuid) -> Result<OrderView, DomainError>;
    async fn cancel_order(&self, id: Uuid) -> Result<OrderView, DomainError>;
}

pub trait PaymentService {
    /// `amount` is in minor units.
    async fn create_gateway_order(
        &self,
        order_id: Uuid,
        amount: i64,
        currency: &str,
    ) -> Result<GatewayOrder, DomainError>;
    async fn verify_payment(
        &self,
        verification: &PaymentVerification,
    ) -> Result<PaymentResult, DomainError>;
    async fn payment_status(&self, payment_id: &str) -> Result<PaymentResult, DomainError>;
}

/// The gateway's customer-facing checkout flow.
///
/// Resolves with the signed response once the customer pays, `None` if the
/// customer dismisses the widget, or an error if the widget cannot load. It
/// may also never resolve; callers bound it with a timeout.
pub trait PaymentGateway {
    async fn collect(
        &self,
        checkout: &GatewayCheckout,
    ) -> Result<Option<GatewayResponse>, DomainError>;
}
