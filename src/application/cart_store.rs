use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::domain::cart::{Cart, CartLine, ProductId};
use crate::domain::errors::StorageError;
use crate::domain::ports::KeyValueStorage;

/// Storage entry holding the cart snapshot.
pub const CART_STORAGE_KEY: &str = "cloudforge-cart";

const SNAPSHOT_VERSION: u32 = 0;

/// Persisted form of the cart: only the lines, never derived totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub state: SnapshotState,
    #[serde(default)]
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotState {
    #[serde(default)]
    pub items: Vec<CartLine>,
}

impl CartSnapshot {
    pub fn of(cart: &Cart) -> Self {
        Self {
            state: SnapshotState {
                items: cart.lines().to_vec(),
            },
            version: SNAPSHOT_VERSION,
        }
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn into_cart(self) -> Cart {
        Cart::from_lines(self.state.items)
    }
}

/// The shopping cart shared by every storefront surface.
///
/// Each mutation updates the in-memory cart first and then writes the
/// snapshot through to `storage`. A failed write is logged and otherwise
/// ignored; the in-memory state stays authoritative for the session.
pub struct CartStore<S> {
    cart: Cart,
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Empty cart backed by `storage`. Nothing is read or written yet.
    pub fn new(storage: S) -> Self {
        Self {
            cart: Cart::new(),
            storage,
            key: CART_STORAGE_KEY.to_string(),
        }
    }

    /// Restores the cart persisted under [`CART_STORAGE_KEY`].
    pub fn restore(storage: S) -> Self {
        Self::restore_from(storage, CART_STORAGE_KEY)
    }

    /// Restores the cart persisted under `key`. Missing, unreadable or
    /// malformed snapshots yield an empty cart.
    pub fn restore_from(storage: S, key: &str) -> Self {
        let cart = match storage.load(key) {
            Ok(Some(raw)) => match CartSnapshot::from_json(&raw) {
                Ok(snapshot) => snapshot.into_cart(),
                Err(e) => {
                    log::warn!("Discarding unreadable cart snapshot '{}': {}", key, e);
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(e) => {
                log::warn!("Could not load cart snapshot '{}': {}", key, e);
                Cart::new()
            }
        };

        log::debug!("Restored cart with {} line(s)", cart.len());

        Self {
            cart,
            storage,
            key: key.to_string(),
        }
    }

    pub fn add_item(&mut self, line: CartLine) {
        if self.cart.add_item(line) {
            self.persist();
        }
    }

    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if self.cart.update_quantity(product_id, quantity) {
            self.persist();
        }
    }

    pub fn remove_item(&mut self, product_id: &ProductId) {
        if self.cart.remove_item(product_id) {
            self.persist();
        }
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.persist();
    }

    pub fn total(&self) -> BigDecimal {
        self.cart.total()
    }

    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    pub fn line_total(&self, product_id: &ProductId) -> Option<BigDecimal> {
        self.cart.get(product_id).map(CartLine::line_total)
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.cart.get(product_id)
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.cart.contains(product_id)
    }

    pub fn len(&self) -> usize {
        self.cart.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::of(&self.cart)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&self) {
        let result = self
            .snapshot()
            .to_json()
            .and_then(|raw| self.storage.save(&self.key, &raw));

        if let Err(e) = result {
            log::warn!("Cart change kept in memory only, persisting failed: {}", e);
        }
    }
}
