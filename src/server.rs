use std::future::{Future, IntoFuture};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::api::{self, AppState};

/// Default time allowed for in-flight requests to finish at shutdown
const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP server
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    state: AppState,
    shutdown_timeout: Duration,
}

impl Server {
    /// Create and bind HTTP server to specified address
    pub async fn bind(addr: &str, state: AppState) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!("HTTP server bound to {}", local_addr);

        Ok(Self {
            listener,
            local_addr,
            state,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        })
    }

    /// Set the upper bound on draining in-flight requests at shutdown
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Get local listening address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve requests until `shutdown` resolves, then drain in-flight requests
    pub async fn run<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        info!("Server started, listening on {}", self.local_addr);

        let app = api::router(self.state);
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let mut serving = tokio::spawn(
            axum::serve(self.listener, app)
                .with_graceful_shutdown(async move {
                    let _ = stop_rx.await;
                })
                .into_future(),
        );

        tokio::select! {
            res = &mut serving => {
                // Serving ended on its own, which only happens on error
                return res.map_err(io::Error::other)?;
            }
            () = shutdown => {
                info!("Shutdown signal received, draining in-flight requests");
            }
        }

        let _ = stop_tx.send(());
        match tokio::time::timeout(self.shutdown_timeout, &mut serving).await {
            Ok(res) => {
                res.map_err(io::Error::other)??;
                info!("Server shutdown completed gracefully");
            }
            Err(_) => {
                warn!(
                    "In-flight requests still running after {:?}, aborting",
                    self.shutdown_timeout
                );
                serving.abort();
            }
        }
        Ok(())
    }
}

/// Resolve on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C signal"),
        () = terminate => info!("Received SIGTERM signal"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ResultStore;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn http_request(addr: SocketAddr, request: String) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        String::from_utf8(response).unwrap()
    }

    fn post(path: &str, body: &str) -> String {
        format!(
            "POST {} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            path,
            body.len(),
            body
        )
    }

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let server = Server::bind("127.0.0.1:0", AppState::new(Arc::new(ResultStore::new())))
            .await
            .unwrap();
        assert_ne!(server.local_addr().port(), 0);
    }

    #[tokio::test]
    async fn test_serve_and_shutdown() {
        let store = Arc::new(ResultStore::new());
        let server = Server::bind("127.0.0.1:0", AppState::new(Arc::clone(&store)))
            .await
            .unwrap()
            .with_shutdown_timeout(Duration::from_secs(1));
        let addr = server.local_addr();

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.run(async move {
            let _ = rx.await;
        }));

        let response = http_request(addr, post("/sum", r#"{"token":"abc123","values":[2.0,3.0]}"#)).await;
        assert!(response.starts_with("HTTP/1.1 200 OK"), "{}", response);
        assert!(response.contains(r#""sum":5.0"#), "{}", response);
        assert!(response.to_ascii_lowercase().contains("x-request-id: "), "{}", response);

        let request =
            "GET /results?token=abc123 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n".to_string();
        let response = http_request(addr, request).await;
        assert!(response.contains(r#""sum_1":5.0"#), "{}", response);

        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
        assert_eq!(store.get_all_by_token("abc123").len(), 1);
    }

    #[tokio::test]
    async fn test_bad_request_over_the_wire() {
        let server = Server::bind("127.0.0.1:0", AppState::new(Arc::new(ResultStore::new())))
            .await
            .unwrap();
        let addr = server.local_addr();

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.run(async move {
            let _ = rx.await;
        }));

        let response = http_request(addr, post("/multiply", r#"{"token":"","values":[1]}"#)).await;
        assert!(response.starts_with("HTTP/1.1 400 Bad Request"), "{}", response);
        assert!(response.contains("Token is required"), "{}", response);

        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
