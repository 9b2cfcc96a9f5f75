mod engine;
mod idle;
mod momentum;
mod policy;

pub use engine::{validate_subject, CurrentSession, DistractionCause, FocusEngine, FocusStatus};
pub use idle::{IdleConfig, IdleMonitor, IdleSignal, PromptOutcome};
pub use momentum::{Momentum, MomentumConfig, MomentumDelta};
pub use policy::TrackerPolicy;
