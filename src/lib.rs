//! Promo Depth
//!
//! Promo depth infers the discount a retail promotion represents from the
//! free-form promo cells of price-list spreadsheets, e.g. `400 - Save 33%`,
//! `200 - Buy 2 & Get 1 Free` or `SGD 60 ANY 2 BOTTLES`.

pub mod batch;
pub mod candidates;
pub mod cell;
pub mod engine;
pub mod fixtures;
pub mod normalize;
pub mod prelude;
pub mod report;
pub mod rules;

pub use engine::{compute_depth, evaluate};
