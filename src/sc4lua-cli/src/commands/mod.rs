//! Command handlers for the sc4lua CLI

pub mod extract;
pub mod hash;
pub mod list;
