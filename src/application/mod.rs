pub mod cart_store;
pub mod checkout;
pub mod order_history;
pub mod session;
