//! Products Data

use crate::domain::products::records::ProductUuid;

/// New Product Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub stock: u32,
    pub category: String,
    pub image_url: String,
    pub featured: bool,
}

/// Product Update Data
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub stock: Option<u32>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub featured: Option<bool>,
}

/// Catalog listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductListing {
    /// Only return products in this category.
    pub category: Option<String>,

    /// Case-insensitive match against name or description.
    pub search: Option<String>,

    /// Include archived products (admin views).
    pub include_inactive: bool,
}
