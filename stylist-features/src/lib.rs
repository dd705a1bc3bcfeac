//! # stylist-features
//!
//! Builds the 21-slot feature vector every model bundle is trained against.
//! Construction never fails: each feature group falls back to its own
//! defaults on bad input, and a vector that still comes out non-finite is
//! replaced wholesale by the all-purpose default.
//!
//! ## Feature groups
//!
//! | Slots | Group | Signals |
//! |-------|-------|---------|
//! | 0–3 | Temporal | hour-of-day and day-of-year as sine/cosine pairs |
//! | 4–8 | Device | normalized viewport, aspect ratio, log area, touch |
//! | 9 | Preference | dark mode (falls back to the social prior) |
//! | 10–14 | Historical | session duration, interactions, scroll depth, error rate, engagement |
//! | 15–20 | Derived | pixel density, interaction speed, density tier, locale, accessibility, network |

pub mod groups;
pub mod history;
pub mod processor;
pub mod schema;
pub mod vector;

pub use groups::derived::{DensityTier, LocaleBucket};
pub use processor::FeatureProcessor;
pub use schema::{FEATURE_NAMES, DEFAULT_FEATURES};
pub use vector::FeatureVector;
