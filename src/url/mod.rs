//! URL handling module
//!
//! Normalization and domain-scope helpers used by the frontier to decide
//! which discovered links are the same page and the same site.

mod domain;
mod normalize;

pub use domain::{registrable_domain, same_site};
pub use normalize::normalize_url;
