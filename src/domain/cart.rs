use std::fmt;

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use super::catalog::Product;

/// Opaque catalog identifier. Unique key of a line within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One product entry in the cart.
///
/// Name, image and price are captured when the line is first added and are
/// never refreshed from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: BigDecimal,
    pub image_url: String,
    pub quantity: u32,
}

impl CartLine {
    pub fn new(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: BigDecimal,
        image_url: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            unit_price,
            image_url: image_url.into(),
            quantity,
        }
    }

    /// Line for `quantity` units of a catalog product at its current price.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price.clone(),
            image_url: product.image_url.clone(),
            quantity,
        }
    }

    pub fn line_total(&self) -> BigDecimal {
        &self.unit_price * &BigDecimal::from(self.quantity)
    }
}

/// Ordered collection of cart lines, at most one per product.
///
/// Pure state: every operation is total and synchronous. Durability lives in
/// [`crate::application::cart_store::CartStore`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from untrusted lines, merging duplicates and dropping
    /// zero quantities.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            cart.add_item(line);
        }
        cart
    }

    /// Merges `line` into the cart. An existing line keeps its metadata and
    /// only gains quantity. Returns `false` when nothing changed.
    pub fn add_item(&mut self, line: CartLine) -> bool {
        if line.quantity == 0 {
            return false;
        }

        match self.position(&line.product_id) {
            Some(idx) => {
                let existing = &mut self.lines[idx];
                let quantity = existing.quantity.saturating_add(line.quantity);
                if quantity == existing.quantity {
                    return false;
                }
                existing.quantity = quantity;
            }
            None => self.lines.push(line),
        }
        true
    }

    /// Sets the quantity of a present line; `quantity <= 0` removes it.
    /// Unknown ids are ignored. Returns `false` when nothing changed.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.lines.iter_mut().find(|l| &l.product_id == product_id) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| &l.product_id != product_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.lines.is_empty();
        self.lines.clear();
        changed
    }

    /// Sum of `unit_price * quantity` over all lines.
    pub fn total(&self) -> BigDecimal {
        self.lines
            .iter()
            .fold(BigDecimal::zero(), |acc, line| acc + line.line_total())
    }

    /// Sum of quantities, as shown on a cart badge.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.position(product_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.lines.iter().position(|l| &l.product_id == product_id)
    }
}
