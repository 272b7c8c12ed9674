// Skewer Infrastructure - System Adapters
// Implements: AlertAction (subprocess)

pub mod subprocess_alert;

pub use subprocess_alert::SubprocessAlert;
