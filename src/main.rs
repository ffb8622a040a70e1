use std::process::ExitCode;

use storefront::application::order_history::OrderHistory;
use storefront::domain::order::OrderSummary;
use storefront::infrastructure::clients::{HttpAuthService, HttpOrderService};
use storefront::{api_client, restore_state, Config};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let (cart, mut session) = match restore_state(&config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Cannot open {}: {}", config.data_dir.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let api = match api_client(&config, &session) {
        Ok(api) => api,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if session.is_authenticated() {
        match session.refresh_user(&HttpAuthService::new(api.clone())).await {
            Ok(user) => log::info!("Signed in as {} <{}>", user.display_name(), user.email),
            Err(e) => log::warn!("Could not refresh the signed-in user: {}", e),
        }
    } else {
        log::info!("Not signed in");
    }

    if let Some(user) = session.user() {
        match OrderHistory::new(HttpOrderService::new(api)).list(user).await {
            Ok(orders) => {
                for order in orders {
                    log::info!(
                        "Order {} {} total {}",
                        order.id,
                        order.status.as_str(),
                        order.total_amount
                    );
                }
            }
            Err(e) => log::warn!("Could not load order history: {}", e),
        }
    }

    for line in cart.lines() {
        log::info!(
            "{} x {} @ {} = {}",
            line.quantity,
            line.name,
            line.unit_price,
            line.line_total()
        );
    }

    let summary = OrderSummary::for_subtotal(cart.total());
    log::info!(
        "{} item(s) in {} line(s): subtotal {}, delivery {}, total {}",
        cart.item_count(),
        cart.len(),
        summary.subtotal,
        summary.delivery_fee,
        summary.grand_total
    );

    ExitCode::SUCCESS
}
