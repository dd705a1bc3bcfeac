pub mod confidence;
pub mod degradation_event;
pub mod design_tokens;
pub mod health_report;
pub mod model_health;
pub mod prediction;

pub use confidence::{Confidence, ConfidenceBreakdown, ConfidenceQuality};
pub use degradation_event::DegradationEvent;
pub use design_tokens::DesignTokenSet;
pub use health_report::{HealthMetrics, HealthReport, HealthStatus, SubsystemHealth};
pub use model_health::{BundleTier, ModelHealth, ModelState};
pub use prediction::{PredictionRequest, PredictionResponse};
