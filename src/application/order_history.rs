use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::OrderView;
use crate::domain::ports::OrderService;
use crate::domain::user::User;

/// Past orders of the signed-in customer.
pub struct OrderHistory<O> {
    orders: O,
}

impl<O: OrderService> OrderHistory<O> {
    pub fn new(orders: O) -> Self {
        Self { orders }
    }

    /// Orders of `user`, newest first.
    pub async fn list(&self, user: &User) -> Result<Vec<OrderView>, DomainError> {
        let mut orders = self.orders.orders_for_user(user.id).await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// A single order, hidden unless it belongs to `user`.
    pub async fn get(&self, user: &User, id: Uuid) -> Result<OrderView, DomainError> {
        let order = self.orders.order(id).await?;
        if order.user_id != user.id {
            return Err(DomainError::NotFound);
        }
        Ok(order)
    }

    pub async fn cancel(&self, user: &User, id: Uuid) -> Result<OrderView, DomainError> {
        let order = self.get(user, id).await?;
        if !order.status.is_cancellable() {
            return Err(DomainError::InvalidInput(format!(
                "order {} is {} and can no longer be cancelled",
                id,
                order.status.as_str()
            )));
        }

        let cancelled = self.orders.cancel_order(id).await?;
        log::info!("Cancelled order {}", id);
        Ok(cancelled)
    }
}
