//! Admin

pub(crate) mod products;
pub(crate) mod stats;
