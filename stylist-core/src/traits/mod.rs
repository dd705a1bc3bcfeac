pub mod clock;
pub mod health_reporter;
pub mod predictor;

pub use clock::{Clock, ManualClock, SystemClock};
pub use health_reporter::IHealthReporter;
pub use predictor::IPredictor;
