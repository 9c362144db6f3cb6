//! Users

pub mod codes;
pub mod data;
pub mod email;
pub mod errors;
pub mod password;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::UsersServiceError;
pub use service::*;
