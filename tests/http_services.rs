//! REST adapters and a full checkout against stub backend services.
//!
//! The stubs run as an actix-web server on an ephemeral local port, so these
//! tests need no external infrastructure.

use std::sync::Mutex;
use std::time::Duration;

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use bigdecimal::BigDecimal;
use serde_json::{json, Value};
use storefront::application::cart_store::CartStore;
use storefront::application::checkout::{CheckoutService, CheckoutSettings};
use storefront::application::session::SessionStore;
use storefront::domain::cart::{CartLine, ProductId};
use storefront::domain::catalog::{PageRequest, PLACEHOLDER_IMAGE_URL};
use storefront::domain::errors::DomainError;
use storefront::domain::order::{OrderStatus, ShippingAddress};
use storefront::domain::payment::{GatewayCheckout, GatewayResponse, PaymentVerification};
use storefront::domain::ports::{
    AuthService, CatalogService, OrderService, PaymentGateway, PaymentService,
};
use storefront::domain::user::LoginRequest;
use storefront::infrastructure::clients::{
    HttpAuthService, HttpCatalogService, HttpOrderService, HttpPaymentService,
};
use storefront::infrastructure::http::ApiClient;
use storefront::infrastructure::memory_storage::MemoryStorage;
use uuid::Uuid;

const TOKEN: &str = "tok-123";
const USER_ID: &str = "6f1c2a8e-0d7b-4a43-9c55-2f0e4b7d9a10";
const ORDER_ID: &str = "0b7e6c1d-3f2a-4e59-8d44-7a1b2c3d4e5f";

// ── Stub backend ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorded {
    order_bodies: Vec<Value>,
    payment_bodies: Vec<Value>,
    queries: Vec<String>,
    paths: Vec<String>,
}

type State = web::Data<Mutex<Recorded>>;

fn user_json() -> Value {
    json!({
        "id": USER_ID,
        "username": "asha",
        "email": "asha@example.com",
        "firstName": "Asha",
        "lastName": "Rao",
        "role": "USER",
        "enabled": true,
        "createdAt": "2026-01-05T10:00:00Z"
    })
}

fn product_json(id: &str, images: Value) -> Value {
    json!({
        "id": id,
        "name": format!("Product {id}"),
        "description": "",
        "category": "kitchen",
        "price": 250,
        "stock": 4,
        "sku": format!("SKU-{id}"),
        "images": images,
        "tags": [],
        "active": true
    })
}

fn page_json(content: Vec<Value>) -> Value {
    json!({
        "content": content,
        "totalElements": 2,
        "totalPages": 1,
        "number": 0,
        "size": 20,
        "first": true,
        "last": true
    })
}

fn order_json(status: &str) -> Value {
    json!({
        "id": ORDER_ID,
        "userId": USER_ID,
        "status": status,
        "totalAmount": 540,
        "items": [{"productId": "p1", "quantity": 2, "price": 250}],
        "createdAt": "2026-02-01T09:30:00Z"
    })
}

fn authorized(req: &HttpRequest) -> bool {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {TOKEN}").as_str())
}

async fn login(body: web::Json<Value>) -> HttpResponse {
    if body["password"] == "secret" {
        HttpResponse::Ok().json(json!({ "token": TOKEN, "type": "Bearer", "user": user_json() }))
    } else {
        HttpResponse::Unauthorized().json(json!({ "error": "Bad credentials" }))
    }
}

async fn me(req: HttpRequest) -> HttpResponse {
    if authorized(&req) {
        HttpResponse::Ok().json(user_json())
    } else {
        HttpResponse::Unauthorized().finish()
    }
}

fn record_path(req: &HttpRequest, state: &State) {
    state.lock().unwrap().paths.push(req.uri().path().to_string());
}

async fn products(req: HttpRequest, state: State) -> HttpResponse {
    record_path(&req, &state);
    state.lock().unwrap().queries.push(req.query_string().to_string());
    HttpResponse::Ok().json(page_json(vec![
        product_json("p1", json!(["/p1.png"])),
        product_json("p2", json!([])),
    ]))
}

async fn latest() -> HttpResponse {
    HttpResponse::Ok().json(vec![product_json("p9", json!(["/p9.png"]))])
}

async fn product(req: HttpRequest, path: web::Path<String>, state: State) -> HttpResponse {
    record_path(&req, &state);
    match path.as_str() {
        "p1" => HttpResponse::Ok().json(product_json("p1", json!(["/p1.png"]))),
        _ => HttpResponse::NotFound().json(json!({ "error": "Product not found" })),
    }
}

async fn create_order(req: HttpRequest, body: web::Json<Value>, state: State) -> HttpResponse {
    if !authorized(&req) {
        return HttpResponse::Unauthorized().finish();
    }
    state.lock().unwrap().order_bodies.push(body.into_inner());
    HttpResponse::Created().json(order_json("PENDING"))
}

async fn user_orders(path: web::Path<String>) -> HttpResponse {
    if path.as_str() == USER_ID {
        HttpResponse::Ok().json(vec![order_json("PAID")])
    } else {
        HttpResponse::Ok().json(Vec::<Value>::new())
    }
}

async fn cancel_order() -> HttpResponse {
    HttpResponse::Ok().json(order_json("CANCELLED"))
}

async fn create_payment(body: web::Json<Value>, state: State) -> HttpResponse {
    let amount = body["amount"].clone();
    let currency = body["currency"].clone();
    state.lock().unwrap().payment_bodies.push(body.into_inner());
    HttpResponse::Ok().json(json!({
        "razorpayOrderId": "order_rzp_77",
        "amount": amount,
        "currency": currency
    }))
}

async fn verify_payment(body: web::Json<Value>, state: State) -> HttpResponse {
    let valid = body["razorpaySignature"] == "valid-sig";
    state.lock().unwrap().payment_bodies.push(body.into_inner());
    if valid {
        HttpResponse::Ok().json(json!({
            "success": true,
            "paymentId": "pay_77",
            "orderId": ORDER_ID,
            "status": "COMPLETED"
        }))
    } else {
        HttpResponse::BadRequest().json(json!({ "error": "Invalid signature" }))
    }
}

async fn payment_status(req: HttpRequest, state: State) -> HttpResponse {
    record_path(&req, &state);
    HttpResponse::InternalServerError().body("ledger offline")
}

/// Start the stub backend on an ephemeral port and return its API base URL.
fn start_backend(state: State) -> String {
    let server = HttpServer::new(move || {
        App::new().app_data(state.clone()).service(
            web::scope("/api")
                .route("/auth/login", web::post().to(login))
                .route("/users/me", web::get().to(me))
                .route("/products", web::get().to(products))
                .route("/products/latest", web::get().to(latest))
                .route("/products/search", web::get().to(products))
                .route("/products/category/{category}", web::get().to(products))
                .route("/products/{id}", web::get().to(product))
                .route("/orders", web::post().to(create_order))
                .route("/orders/user/{user_id}", web::get().to(user_orders))
                .route("/orders/{id}/cancel", web::post().to(cancel_order))
                .route("/payments/create", web::post().to(create_payment))
                .route("/payments/verify", web::post().to(verify_payment))
                .route("/payments/{id}", web::get().to(payment_status)),
        )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind the stub backend");

    let port = server.addrs()[0].port();
    tokio::spawn(server.run());

    format!("http://127.0.0.1:{port}/api")
}

fn api(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(5)).unwrap()
}

struct SigningGateway {
    signature: &'static str,
}

impl PaymentGateway for SigningGateway {
    async fn collect(
        &self,
        checkout: &GatewayCheckout,
    ) -> Result<Option<GatewayResponse>, DomainError> {
        Ok(Some(GatewayResponse {
            gateway_order_id: checkout.gateway_order_id.clone(),
            gateway_payment_id: "pay_77".to_string(),
            signature: self.signature.to_string(),
        }))
    }
}

fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Asha Rao".to_string(),
        phone: "9876543210".to_string(),
        address_line1: "12 MG Road".to_string(),
        address_line2: Some("Near the park".to_string()),
        city: "Pune".to_string(),
        state: "Maharashtra".to_string(),
        postal_code: "411001".to_string(),
        country: "India".to_string(),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_then_fetch_current_user() {
    let base = start_backend(web::Data::new(Mutex::new(Recorded::default())));
    let auth = HttpAuthService::new(api(&base));

    let mut sessions = SessionStore::restore(MemoryStorage::new());
    let session = sessions
        .login(
            &auth,
            &LoginRequest {
                username: "asha".to_string(),
                password: "secret".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(session.token, TOKEN);
    assert_eq!(session.user.display_name(), "Asha Rao");

    let err = HttpAuthService::new(api(&base)).current_user().await.unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));

    let authed = HttpAuthService::new(api(&base).with_token(TOKEN));
    let user = authed.current_user().await.unwrap();
    assert_eq!(user.id, USER_ID.parse::<Uuid>().unwrap());
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let base = start_backend(web::Data::new(Mutex::new(Recorded::default())));
    let auth = HttpAuthService::new(api(&base));

    let err = auth
        .login(&LoginRequest {
            username: "asha".to_string(),
            password: "nope".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));
}

#[tokio::test]
async fn catalog_queries_and_image_fallback() {
    let state = web::Data::new(Mutex::new(Recorded::default()));
    let base = start_backend(state.clone());
    let catalog = HttpCatalogService::new(api(&base));

    let page = catalog.products(PageRequest::new(1, 10)).await.unwrap();
    assert_eq!(page.content.len(), 2);
    assert_eq!(page.content[0].image_url, "/p1.png");
    assert_eq!(page.content[1].image_url, PLACEHOLDER_IMAGE_URL);
    assert_eq!(page.content[0].price, BigDecimal::from(250));

    let all = catalog.all_products().await.unwrap();
    assert_eq!(all.len(), 2);

    catalog.search("kettle", PageRequest::default()).await.unwrap();
    catalog
        .products_by_category("kitchen", PageRequest::default())
        .await
        .unwrap();

    let latest = catalog.latest_products().await.unwrap();
    assert_eq!(latest[0].id, ProductId::new("p9"));

    let queries = state.lock().unwrap().queries.clone();
    assert_eq!(
        queries,
        vec![
            "page=1&size=10",
            "page=0&size=100",
            "q=kettle&page=0&size=20",
            "page=0&size=20",
        ]
    );
}

#[tokio::test]
async fn missing_product_maps_to_not_found() {
    let base = start_backend(web::Data::new(Mutex::new(Recorded::default())));
    let catalog = HttpCatalogService::new(api(&base));

    let found = catalog.product(&ProductId::new("p1")).await.unwrap();
    assert_eq!(found.sku, "SKU-p1");

    let err = catalog.product(&ProductId::new("zzz")).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound));
}

#[tokio::test]
async fn path_values_stay_in_their_segment() {
    let state = web::Data::new(Mutex::new(Recorded::default()));
    let base = start_backend(state.clone());
    let catalog = HttpCatalogService::new(api(&base).with_token(TOKEN));
    let payments = HttpPaymentService::new(api(&base));

    let err = catalog
        .product(&ProductId::new("../../users/me"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound));

    catalog
        .products_by_category("Toys & Games?size=999", PageRequest::default())
        .await
        .unwrap();

    let err = payments.payment_status("pay/../../orders/x").await.unwrap_err();
    assert!(matches!(err, DomainError::Service { status: 500, .. }));

    let err = catalog.product(&ProductId::new("..")).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));

    let recorded = state.lock().unwrap();
    assert_eq!(
        recorded.paths,
        vec![
            "/api/products/..%2F..%2Fusers%2Fme",
            "/api/products/category/Toys%20&%20Games%3Fsize=999",
            "/api/payments/pay%2F..%2F..%2Forders%2Fx",
        ]
    );
    assert_eq!(recorded.queries, vec!["page=0&size=20"]);
}

#[tokio::test]
async fn order_history_and_cancel() {
    let base = start_backend(web::Data::new(Mutex::new(Recorded::default())));
    let orders = HttpOrderService::new(api(&base).with_token(TOKEN));
    let user_id: Uuid = USER_ID.parse().unwrap();

    let listed = orders.orders_for_user(user_id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, OrderStatus::Paid);
    assert_eq!(listed[0].total_amount, BigDecimal::from(540));

    let cancelled = orders.cancel_order(ORDER_ID.parse().unwrap()).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn server_errors_keep_status_and_body() {
    let base = start_backend(web::Data::new(Mutex::new(Recorded::default())));
    let payments = HttpPaymentService::new(api(&base));

    let err = payments.payment_status("pay_1").await.unwrap_err();
    match err {
        DomainError::Service { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "ledger offline");
        }
        other => panic!("expected Service error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_backend_is_unavailable() {
    // Nothing listens on the discard port.
    let orders = HttpOrderService::new(api("http://127.0.0.1:9/api"));

    let err = orders.order(Uuid::nil()).await.unwrap_err();
    assert!(matches!(err, DomainError::Unavailable(_)));
}

#[tokio::test]
async fn checkout_end_to_end() {
    let state = web::Data::new(Mutex::new(Recorded::default()));
    let base = start_backend(state.clone());

    let auth = HttpAuthService::new(api(&base));
    let mut sessions = SessionStore::restore(MemoryStorage::new());
    sessions
        .login(
            &auth,
            &LoginRequest {
                username: "asha".to_string(),
                password: "secret".to_string(),
            },
        )
        .await
        .unwrap();

    let authed = api(&base).with_token(TOKEN);
    let catalog = HttpCatalogService::new(authed.clone());
    let product = catalog.product(&ProductId::new("p1")).await.unwrap();

    let mut cart = CartStore::new(MemoryStorage::new());
    cart.add_item(CartLine::from_product(&product, 1));
    cart.add_item(CartLine::from_product(&product, 1));

    let checkout = CheckoutService::new(
        HttpOrderService::new(authed.clone()),
        HttpPaymentService::new(authed.clone()),
        SigningGateway {
            signature: "valid-sig",
        },
        CheckoutSettings::default(),
    );

    let receipt = checkout
        .checkout(&mut cart, sessions.user(), &address())
        .await
        .unwrap();

    assert!(cart.is_empty());
    assert_eq!(receipt.order_id, ORDER_ID.parse::<Uuid>().unwrap());
    assert_eq!(receipt.payment.payment_id, "pay_77");

    let recorded = state.lock().unwrap();
    let order = &recorded.order_bodies[0];
    assert_eq!(order["userId"], USER_ID);
    assert_eq!(order["items"][0]["productId"], "p1");
    assert_eq!(order["items"][0]["quantity"], 2);
    assert_eq!(order["shippingAddress"]["postalCode"], "411001");

    // 500 subtotal ships free: 500.00 INR in paise.
    assert_eq!(recorded.payment_bodies[0]["amount"], 50_000);
    assert_eq!(recorded.payment_bodies[0]["currency"], "INR");
    assert_eq!(recorded.payment_bodies[1]["razorpayOrderId"], "order_rzp_77");
    assert_eq!(recorded.payment_bodies[1]["orderId"], ORDER_ID);
}

#[tokio::test]
async fn invalid_signature_keeps_cart() {
    let base = start_backend(web::Data::new(Mutex::new(Recorded::default())));
    let authed = api(&base).with_token(TOKEN);

    let mut cart = CartStore::new(MemoryStorage::new());
    cart.add_item(CartLine::new("p1", "Product p1", BigDecimal::from(250), "", 1));
    let user = HttpAuthService::new(authed.clone()).current_user().await.unwrap();

    let checkout = CheckoutService::new(
        HttpOrderService::new(authed.clone()),
        HttpPaymentService::new(authed.clone()),
        SigningGateway {
            signature: "forged",
        },
        CheckoutSettings::default(),
    );

    let err = checkout
        .checkout(&mut cart, Some(&user), &address())
        .await
        .unwrap_err();

    assert_eq!(
        err.user_message(),
        "Payment verification failed. Please contact support."
    );
    assert_eq!(cart.item_count(), 1);
}

#[tokio::test]
async fn verification_body_uses_gateway_field_names() {
    let state = web::Data::new(Mutex::new(Recorded::default()));
    let base = start_backend(state.clone());
    let payments = HttpPaymentService::new(api(&base));

    let result = payments
        .verify_payment(&PaymentVerification {
            gateway_order_id: "order_rzp_1".to_string(),
            gateway_payment_id: "pay_1".to_string(),
            signature: "valid-sig".to_string(),
            order_id: Uuid::nil(),
        })
        .await
        .unwrap();
    assert!(result.success);

    let body = state.lock().unwrap().payment_bodies[0].clone();
    assert_eq!(body["razorpayPaymentId"], "pay_1");
    assert_eq!(body["razorpaySignature"], "valid-sig");
}
