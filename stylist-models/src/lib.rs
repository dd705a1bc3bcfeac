//! # stylist-models
//!
//! Model bundle formats and the [`ModelManager`] that serves them.
//!
//! A bundle is loaded through an ordered list of [`BundleLoader`] strategies
//! (dual → individual → default mapping → emergency). The first tier that
//! loads is swapped in as a whole; predictions only ever read an immutable
//! [`LoadedBundle`] behind an `Arc`.

pub mod artifacts;
pub mod bundle;
pub mod classifier;
pub mod ensemble;
pub mod fallback;
pub mod loaders;
pub mod manager;
pub mod metadata;
pub mod regressor;
pub mod reports;
pub mod transforms;
pub mod variables;

pub use bundle::{ComponentStatus, LoadedBundle};
pub use classifier::{ClassPrediction, ClassifierModel};
pub use ensemble::{Node, Tree, TreeEnsemble};
pub use fallback::{DefaultMapping, TierTokens};
pub use loaders::{default_loaders, BundleLoader, LoadLimits, LoadOutcome};
pub use manager::ModelManager;
pub use metadata::{BundleMetadata, TrainingMetrics};
pub use regressor::{RegressorModel, ValuePrediction};
pub use reports::{
    ComponentCheck, ComponentRecovery, DualPrediction, LoadReport, RecoveryReport, TierFailure,
    ValidationReport,
};
pub use transforms::{LabelCodec, StandardScaler};

use stylist_core::errors::ModelError;

pub type ModelResult<T> = Result<T, ModelError>;
