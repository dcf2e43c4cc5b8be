//! Canonical price handling
//!
//! Every price the crate reads (listing text, detail text, saved result files,
//! query budgets) goes through [`PriceNormalizer`], and every price it writes
//! is rendered by [`PriceNormalizer::format`].

mod normalize;

pub use normalize::{fold_digits, PriceNormalizer};
