// Monitor constants (no magic values in the loop)

/// Command run on every host each round; prints epoch seconds
pub const REMOTE_TIME_COMMAND: &str = "/bin/date +%s";

/// Sleep between rounds when none is configured
pub const DEFAULT_INTERVAL: &str = "1m";

/// Environment variable carrying the measured skew to the alert action
pub const MAXSKEW_ENV: &str = "MAXSKEW";

/// Environment variables passed through to the alert action (everything else is cleared)
pub const ALERT_ENV_ALLOWLIST: &[&str] = &["PATH", "HOME", "USER", "LANG"];
