//! Message intake orchestration.

pub mod pipeline;
pub mod silence;
pub mod telemetry;
pub mod violations;

pub use pipeline::{ChatPipeline, Delivery, MessageOutcome};
pub use silence::{Silence, SilenceDetector, SilencePrompt, SilenceTrigger, topic_templates};
pub use telemetry::init_tracing;
pub use violations::{Penalty, ViolationHistory, ViolationRecord};
