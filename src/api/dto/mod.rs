//! Data Transfer Objects for REST response serialization.

pub mod memecoin_dto;

pub use memecoin_dto::*;
