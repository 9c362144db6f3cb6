//! Product Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,

    /// Unit price in minor currency units.
    pub price: u64,

    /// Units currently available for purchase.
    pub stock: u32,

    pub category: String,
    pub image_url: String,

    /// Archived products keep their row (orders reference it) but leave the catalog.
    pub is_active: bool,

    pub featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
