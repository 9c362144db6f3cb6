//! Admin Product Handlers

pub(crate) mod archive;
pub(crate) mod create;
pub(crate) mod index;
pub(crate) mod restore;
pub(crate) mod update;
