use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use super::cart::ProductId;

pub const PLACEHOLDER_IMAGE_URL: &str = "/placeholder-product.png";

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: BigDecimal,
    pub stock: i64,
    pub sku: String,
    /// First entry of `images`, or [`PLACEHOLDER_IMAGE_URL`].
    pub image_url: String,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Display image for a product: its first image, else the placeholder.
pub fn primary_image(images: &[String]) -> String {
    images
        .iter()
        .find(|url| !url.is_empty())
        .cloned()
        .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: i64,
    pub total_pages: i64,
    pub number: i64,
    pub size: i64,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
            first: self.first,
            last: self.last,
        }
    }
}

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub const MAX_SIZE: u32 = 100;

    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.clamp(1, Self::MAX_SIZE),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: 20 }
    }
}
