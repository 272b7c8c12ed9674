// Startup connection of the whole fleet

use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tracing::info;

use crate::options::SshOptions;
use crate::session::OpenSshSession;
use skewer_core::domain::{Host, HostSet};
use skewer_core::error::{AppError, Result};
use skewer_core::port::{HostSession, SessionPool};

/// Connect every host over ssh and build the session pool
pub async fn connect_pool(hosts: &HostSet, options: &SshOptions) -> Result<SessionPool> {
    connect_all(hosts, |host| {
        let host = host.clone();
        let options = options.clone();
        async move {
            OpenSshSession::connect(&host, &options)
                .await
                .map_err(|e| e.to_string())
        }
    })
    .await
}

/// Connect every host concurrently with the given connector
///
/// All attempts run to completion; if any failed, the first failing host in
/// sorted order is reported and no pool is returned.
pub async fn connect_all<F, Fut, S>(hosts: &HostSet, connect: F) -> Result<SessionPool>
where
    F: Fn(&Host) -> Fut,
    Fut: Future<Output = std::result::Result<S, String>>,
    S: HostSession + 'static,
{
    let attempts = hosts.iter().map(|host| {
        let attempt = connect(host);
        async move { (host, attempt.await) }
    });
    let results = join_all(attempts).await;

    let mut pool = SessionPool::new();
    for (host, result) in results {
        let session = result.map_err(|reason| AppError::Connect {
            host: host.clone(),
            reason,
        })?;
        info!(host = %host, "Connected");
        pool.insert(host.clone(), Arc::new(session));
    }
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skewer_core::port::host_session::mocks::MockHostSession;

    #[tokio::test]
    async fn test_connect_all_builds_pool_for_every_host() {
        let hosts = HostSet::parse("b,a,c").unwrap();

        let pool = connect_all(&hosts, |_| async { Ok(MockHostSession::with_time(1)) })
            .await
            .unwrap();

        assert_eq!(pool.len(), 3);
        let names: Vec<&str> = pool.hosts().map(Host::name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_connect_all_reports_first_failure_in_sorted_order() {
        let hosts = HostSet::parse("c,b,a").unwrap();

        let err = connect_all(&hosts, |host| {
            let fails = host.name() != "a";
            let name = host.name().to_string();
            async move {
                if fails {
                    Err(format!("{}: connection refused", name))
                } else {
                    Ok(MockHostSession::with_time(1))
                }
            }
        })
        .await
        .err().unwrap();

        match err {
            AppError::Connect { host, reason } => {
                assert_eq!(host.name(), "b");
                assert_eq!(reason, "b: connection refused");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
