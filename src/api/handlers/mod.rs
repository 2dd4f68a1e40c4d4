//! REST endpoint handlers organized by resource.

pub mod memecoins;
pub mod system;
