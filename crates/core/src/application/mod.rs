// Application Layer - The measurement loop

pub mod alert;
pub mod constants;
pub mod report;
pub mod sampler;
pub mod scheduler;

// Re-exports
pub use alert::AlertDispatcher;
pub use report::TracingReporter;
pub use sampler::Sampler;
pub use scheduler::{shutdown_channel, RoundOutcome, Scheduler, ShutdownSender, ShutdownToken};
