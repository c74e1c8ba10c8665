//! Terminal input helpers.

pub mod input;
pub mod keys;
