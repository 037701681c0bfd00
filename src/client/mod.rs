//! Recommendation service clients.

pub mod api;
pub mod fallback;
pub mod legacy;
pub mod models;

pub use api::RecommendationClient;
pub use fallback::FallbackPolicy;
pub use legacy::LegacyTvClient;

use models::Recommendation;

/// How a recommendation request ended, as seen by the wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The service answered with a list
    Fresh(Vec<Recommendation>),

    /// The request failed; `fallback` holds whatever the policy substitutes
    ServiceUnavailable {
        reason: String,
        fallback: Vec<Recommendation>,
    },

    /// The request failed and the flow has no fallback (legacy TV)
    Failed { reason: String },
}

#[cfg(test)]
pub(crate) mod test_server {
    //! One-shot HTTP responder for client tests.

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve a single canned response. Returns the base URL and a handle that
    /// resolves to the raw request the client sent.
    pub async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        (format!("http://{}", addr), handle)
    }

    /// A base URL nothing is listening on.
    pub async fn closed_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        String::from_utf8_lossy(&buf).into_owned()
    }
}
