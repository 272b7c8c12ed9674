//! Command line flags

use clap::{Parser, ValueEnum};
use skewer_core::application::constants::DEFAULT_INTERVAL;
use skewer_infra_ssh::KnownHostsPolicy;

#[derive(Parser, Debug)]
#[command(name = "skewer")]
#[command(about = "Watch a fleet of hosts for clock skew over ssh", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Comma separated list of hostnames (host or host:port)
    #[arg(long, env = "SKEWER_HOSTS", default_value = "")]
    pub hosts: String,

    /// Remote username
    #[arg(long, env = "USER", default_value = "")]
    pub user: String,

    /// Duration to sleep between runs (e.g. 30s, 1m, 1h 30m)
    #[arg(long, default_value = DEFAULT_INTERVAL)]
    pub sleep: String,

    /// If set, command to run when skew is encountered; $MAXSKEW will be set to the max skew
    #[arg(long, default_value = "")]
    pub alert: String,

    /// Host key policy for unknown hosts
    #[arg(long, default_value_t = KnownHostsPolicy::Add)]
    pub known_hosts: KnownHostsPolicy,

    /// Bound on the initial ssh handshake per host
    #[arg(long)]
    pub connect_timeout: Option<humantime::Duration>,

    /// Log output format
    #[arg(long, env = "SKEWER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["skewer", "--hosts", "a,b", "--user", "ops"]).unwrap();

        assert_eq!(cli.hosts, "a,b");
        assert_eq!(cli.user, "ops");
        assert_eq!(cli.sleep, "1m");
        assert_eq!(cli.alert, "");
        assert_eq!(cli.known_hosts, KnownHostsPolicy::Add);
        assert!(cli.connect_timeout.is_none());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "skewer",
            "--hosts",
            "a",
            "--user",
            "ops",
            "--sleep",
            "30s",
            "--alert",
            "~/bin/page",
            "--known-hosts",
            "strict",
            "--connect-timeout",
            "10s",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.sleep, "30s");
        assert_eq!(cli.alert, "~/bin/page");
        assert_eq!(cli.known_hosts, KnownHostsPolicy::Strict);
        assert_eq!(
            cli.connect_timeout.map(std::time::Duration::from),
            Some(std::time::Duration::from_secs(10))
        );
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(Cli::try_parse_from(["skewer", "--known-hosts", "yolo"]).is_err());
    }
}
