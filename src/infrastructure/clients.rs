use uuid::Uuid;

use crate::domain::cart::ProductId;
use crate::domain::catalog::{Page, PageRequest, Product};
use crate::domain::errors::DomainError;
use crate::domain::order::{CreateOrder, OrderView};
use crate::domain::payment::{GatewayOrder, PaymentResult, PaymentVerification};
use crate::domain::ports::{AuthService, CatalogService, OrderService, PaymentService};
use crate::domain::user::{LoginRequest, RegisterRequest, Session, User};

use super::http::ApiClient;
use super::models::{
    CreateGatewayOrderBody, CreateOrderBody, GatewayOrderDto, LoginBody, LoginResponseDto,
    OrderDto, PageDto, PaymentResultDto, ProductDto, RegisterBody, VerificationBody,
};

/// Page size used when the whole catalog is requested at once.
const ALL_PRODUCTS_PAGE_SIZE: u32 = 100;

fn page_query(page: PageRequest) -> Vec<(&'static str, String)> {
    vec![("page", page.page.to_string()), ("size", page.size.to_string())]
}

// ── Auth ─────────────────────────────────────────────────────────────────────

pub struct HttpAuthService {
    api: ApiClient,
}

impl HttpAuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl AuthService for HttpAuthService {
    async fn login(&self, request: &LoginRequest) -> Result<Session, DomainError> {
        let dto: LoginResponseDto = self.api.post(&["auth", "login"], &LoginBody::from(request)).await?;
        Ok(dto.into())
    }

    async fn register(&self, request: &RegisterRequest) -> Result<Session, DomainError> {
        let dto: LoginResponseDto = self
            .api
            .post(&["auth", "register"], &RegisterBody::from(request))
            .await?;
        Ok(dto.into())
    }

    async fn current_user(&self) -> Result<User, DomainError> {
        self.api.get(&["users", "me"], &[]).await
    }
}

// ── Catalog ──────────────────────────────────────────────────────────────────

pub struct HttpCatalogService {
    api: ApiClient,
}

impl HttpCatalogService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn page(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Page<Product>, DomainError> {
        let dto: PageDto<ProductDto> = self.api.get(segments, query).await?;
        Ok(dto.into_page(Product::from))
    }
}

impl CatalogService for HttpCatalogService {
    async fn products(&self, page: PageRequest) -> Result<Page<Product>, DomainError> {
        self.page(&["products"], &page_query(page)).await
    }

    async fn all_products(&self) -> Result<Vec<Product>, DomainError> {
        let page = PageRequest::new(0, ALL_PRODUCTS_PAGE_SIZE);
        Ok(self.page(&["products"], &page_query(page)).await?.content)
    }

    async fn product(&self, id: &ProductId) -> Result<Product, DomainError> {
        let dto: ProductDto = self.api.get(&["products", id.as_str()], &[]).await?;
        Ok(dto.into())
    }

    async fn products_by_category(
        &self,
        category: &str,
        page: PageRequest,
    ) -> Result<Page<Product>, DomainError> {
        self.page(&["products", "category", category], &page_query(page))
            .await
    }

    async fn search(&self, query: &str, page: PageRequest) -> Result<Page<Product>, DomainError> {
        let mut params = vec![("q", query.to_string())];
        params.extend(page_query(page));
        self.page(&["products", "search"], &params).await
    }

    async fn latest_products(&self) -> Result<Vec<Product>, DomainError> {
        let dtos: Vec<ProductDto> = self.api.get(&["products", "latest"], &[]).await?;
        Ok(dtos.into_iter().map(Product::from).collect())
    }
}

// ── Orders ───────────────────────────────────────────────────────────────────

pub struct HttpOrderService {
    api: ApiClient,
}

impl HttpOrderService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl OrderService for HttpOrderService {
    async fn create_order(&self, order: &CreateOrder) -> Result<OrderView, DomainError> {
        let dto: OrderDto = self.api.post(&["orders"], &CreateOrderBody::from(order)).await?;
        Ok(dto.into())
    }

    async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        let user_id = user_id.to_string();
        let dtos: Vec<OrderDto> = self.api.get(&["orders", "user", user_id.as_str()], &[]).await?;
        Ok(dtos.into_iter().map(OrderView::from).collect())
    }

    async fn order(&self, id: Uuid) -> Result<OrderView, DomainError> {
        let id = id.to_string();
        let dto: OrderDto = self.api.get(&["orders", id.as_str()], &[]).await?;
        Ok(dto.into())
    }

    async fn cancel_order(&self, id: Uuid) -> Result<OrderView, DomainError> {
        let id = id.to_string();
        let dto: OrderDto = self.api.post_empty(&["orders", id.as_str(), "cancel"]).await?;
        Ok(dto.into())
    }
}

// ── Payments ─────────────────────────────────────────────────────────────────

pub struct HttpPaymentService {
    api: ApiClient,
}

impl HttpPaymentService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl PaymentService for HttpPaymentService {
    async fn create_gateway_order(
        &self,
        order_id: Uuid,
        amount: i64,
        currency: &str,
    ) -> Result<GatewayOrder, DomainError> {
        let body = CreateGatewayOrderBody {
            order_id,
            amount,
            currency,
        };
        let dto: GatewayOrderDto = self.api.post(&["payments", "create"], &body).await?;
        Ok(dto.into())
    }

    async fn verify_payment(
        &self,
        verification: &PaymentVerification,
    ) -> Result<PaymentResult, DomainError> {
        let dto: PaymentResultDto = self
            .api
            .post(&["payments", "verify"], &VerificationBody::from(verification))
            .await?;
        Ok(dto.into())
    }

    async fn payment_status(&self, payment_id: &str) -> Result<PaymentResult, DomainError> {
        let dto: PaymentResultDto = self.api.get(&["payments", payment_id], &[]).await?;
        Ok(dto.into())
    }
}
