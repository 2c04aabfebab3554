//! Knowledge service reachability.
//!
//! The session opener only needs a yes/no answer, but the probe reports
//! *why* so tests can pin the ambiguous case.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

pub const DEFAULT_HEALTH_URL: &str = "http://localhost:5100/api/knowledge/health";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Outcome of a reachability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    Reachable,
    Unreachable,
    /// The probe itself could not run.
    Ambiguous,
}

impl Reachability {
    /// Only a definite `Unreachable` counts as unavailable.
    pub fn is_available(self) -> bool {
        !matches!(self, Reachability::Unreachable)
    }
}

/// Capability to check whether the knowledge service is up.
#[async_trait]
pub trait ServiceProbe: Send + Sync {
    async fn check(&self) -> Reachability;
}

/// Probe with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct StaticProbe(pub Reachability);

impl StaticProbe {
    pub fn reachable() -> Self {
        Self(Reachability::Reachable)
    }

    pub fn unreachable() -> Self {
        Self(Reachability::Unreachable)
    }
}

#[async_trait]
impl ServiceProbe for StaticProbe {
    async fn check(&self) -> Reachability {
        self.0
    }
}

/// Probe that GETs a health endpoint and expects `200 OK`.
pub struct HttpProbe {
    url: String,
    http_client: Option<reqwest::Client>,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("context-guard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| warn!(error = %e, "health probe client unavailable"))
            .ok();

        HttpProbe {
            url: url.into(),
            http_client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ServiceProbe for HttpProbe {
    async fn check(&self) -> Reachability {
        let Some(client) = &self.http_client else {
            return Reachability::Ambiguous;
        };

        match client.get(&self.url).send().await {
            Ok(response) if response.status() == reqwest::StatusCode::OK => {
                Reachability::Reachable
            }
            Ok(response) => {
                debug!(url = %self.url, status = %response.status(), "health check not OK");
                Reachability::Unreachable
            }
            Err(e) => {
                debug!(url = %self.url, error = %e, "health check failed");
                Reachability::Unreachable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and return the URL to hit.
    async fn serve_once(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok"
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}/api/knowledge/health")
    }

    #[test]
    fn ambiguous_counts_as_available() {
        assert!(Reachability::Reachable.is_available());
        assert!(Reachability::Ambiguous.is_available());
        assert!(!Reachability::Unreachable.is_available());
    }

    #[tokio::test]
    async fn static_probe_answers() {
        assert_eq!(StaticProbe::reachable().check().await, Reachability::Reachable);
        assert_eq!(StaticProbe::unreachable().check().await, Reachability::Unreachable);
    }

    #[tokio::test]
    async fn http_probe_ok() {
        let url = serve_once("200 OK").await;
        let probe = HttpProbe::new(url, DEFAULT_PROBE_TIMEOUT);
        assert_eq!(probe.check().await, Reachability::Reachable);
    }

    #[tokio::test]
    async fn http_probe_non_ok_status() {
        let url = serve_once("503 Service Unavailable").await;
        let probe = HttpProbe::new(url, DEFAULT_PROBE_TIMEOUT);
        assert_eq!(probe.check().await, Reachability::Unreachable);
    }

    #[tokio::test]
    async fn http_probe_closed_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let probe = HttpProbe::new(format!("http://{addr}/health"), DEFAULT_PROBE_TIMEOUT);
        assert_eq!(probe.check().await, Reachability::Unreachable);
    }

    #[tokio::test]
    async fn http_probe_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            // Hold the connection open without answering.
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        });

        let timeout = Duration::from_millis(200);
        let probe = HttpProbe::new(format!("http://{addr}/health"), timeout);
        let started = std::time::Instant::now();
        assert_eq!(probe.check().await, Reachability::Unreachable);
        assert!(started.elapsed() < timeout * 10, "took {:?}", started.elapsed());
        server.abort();
    }

    #[tokio::test]
    async fn http_probe_bad_url() {
        let probe = HttpProbe::new("not a url", DEFAULT_PROBE_TIMEOUT);
        assert_eq!(probe.check().await, Reachability::Unreachable);
    }
}
