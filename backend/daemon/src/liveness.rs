//! Liveness probe: can we open a TCP connection to the gateway address?

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

pub const PROBE_TIMEOUT: Duration = Duration::from_millis(600);

/// `true` if something accepts connections on `addr` within `limit`.
///
/// A successful connect is all that is checked; the connection is dropped
/// immediately.
pub async fn is_up(addr: &str, limit: Duration) -> bool {
    match timeout(limit, TcpStream::connect(addr)).await {
        Ok(Ok(_stream)) => true,
        Ok(Err(e)) => {
            trace!(addr, error = %e, "Probe refused");
            false
        }
        Err(_) => {
            trace!(addr, "Probe timed out");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sees_a_bound_listener() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        assert!(is_up(&addr, PROBE_TIMEOUT).await);
    }

    #[tokio::test]
    async fn closed_port_is_down() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().to_string()
        };
        assert!(!is_up(&addr, PROBE_TIMEOUT).await);
    }
}
