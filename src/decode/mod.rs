//! Response decoder module
//!
//! Decodes search-result bundles into the in-memory page model.

mod bundle;

pub use bundle::{decode_page, try_decode_page};

#[cfg(test)]
mod tests;
