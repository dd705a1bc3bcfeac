//! Request-side inputs: the visitor context, past-session history, and
//! population-level social priors. All three are produced upstream and are
//! treated as untrusted and possibly partial.

pub mod history;
pub mod lenient;
pub mod social;
pub mod user_context;

pub use history::HistoricalEvent;
pub use social::SocialAggregate;
pub use user_context::{AccessibilityHints, ColorScheme, NetworkHints, UserContext};
