//! HTTP transport for the device's `/command` endpoint.
//!
//! Async client using `reqwest`. One POST per command; the envelope
//! travels as the JSON body and the response body is parsed as JSON.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use devlink_protocol::{CommandRequest, CommandResponse};
use tracing::debug;

use crate::{CommandTransport, TransportError};

/// `reqwest`-backed transport posting one JSON envelope per command.
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Creates a transport for the device at `host`, e.g.
    /// `http://192.168.0.31`.
    pub fn new(host: &str) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/command", host.trim_end_matches('/')),
        })
    }

    async fn post(
        &self,
        request: CommandRequest,
        timeout: Duration,
    ) -> Result<CommandResponse, TransportError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(&request)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await.map_err(|e| classify(e, timeout))?;
        let body = serde_json::from_str(&text)?;
        debug!(command = %request.command, "command round trip complete");
        Ok(CommandResponse::from_body(body))
    }
}

/// Maps reqwest failures onto the transport error taxonomy: timeouts
/// are reported distinctly so logs show the configured bound.
fn classify(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout)
    } else {
        TransportError::Http(err)
    }
}

impl CommandTransport for HttpTransport {
    fn send(
        &self,
        request: &CommandRequest,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<CommandResponse, TransportError>> + Send + '_>> {
        let request = request.clone();
        Box::pin(self.post(request, timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Starts a mock HTTP server answering one request with `status`
    /// and `body`, and returns the captured request bytes.
    async fn mock_server(
        status: &str,
        body: &str,
    ) -> (String, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");
        let status = status.to_string();
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let mut captured = Vec::new();
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                if let Ok(n) = stream.read(&mut buf).await {
                    captured.extend_from_slice(&buf[..n]);
                }

                let resp = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
            captured
        });

        (url, handle)
    }

    #[tokio::test]
    async fn posts_envelope_and_parses_response() {
        let (url, handle) = mock_server("200 OK", r#"{"response":"5\r\n"}"#).await;
        let transport = HttpTransport::new(&url).unwrap();

        let req = CommandRequest::bare("fcr a.bin 10 -o -v 1.0.0 -t 0xFE -c 0x1");
        let resp = transport
            .send(&req, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(resp.session_token(), Some(5));

        let captured = handle.await.unwrap();
        let captured = String::from_utf8_lossy(&captured);
        assert!(captured.starts_with("POST /command"));
        assert!(captured.contains(r#""command":"fcr a.bin 10 -o -v 1.0.0 -t 0xFE -c 0x1""#));
        assert!(captured.contains(r#""flags":0"#));
    }

    #[tokio::test]
    async fn write_envelope_carries_data_field() {
        let (url, handle) = mock_server("200 OK", r#"{"response":"Success\r\n"}"#).await;
        let transport = HttpTransport::new(&url).unwrap();

        let req = CommandRequest::with_data("write 5 4", "AAECAw==".to_string());
        let resp = transport
            .send(&req, Duration::from_secs(5))
            .await
            .unwrap();
        assert!(!resp.is_command_failed());

        let captured = handle.await.unwrap();
        let captured = String::from_utf8_lossy(&captured);
        assert!(captured.contains(r#""flags":4"#));
        assert!(captured.contains(r#""data":"AAECAw==""#));
    }

    #[tokio::test]
    async fn non_success_status_is_transport_error() {
        let (url, _handle) = mock_server("500 Internal Server Error", "boom").await;
        let transport = HttpTransport::new(&url).unwrap();

        let req = CommandRequest::bare("fcr a.bin 1 -o -v 1.0.0 -t 0xFE -c 0x1");
        let err = transport
            .send(&req, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn non_json_body_is_transport_error() {
        let (url, _handle) = mock_server("200 OK", "not json at all").await;
        let transport = HttpTransport::new(&url).unwrap();

        let req = CommandRequest::bare("fcr a.bin 1 -o -v 1.0.0 -t 0xFE -c 0x1");
        let err = transport
            .send(&req, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Body(_)));
    }

    #[tokio::test]
    async fn unanswered_request_times_out() {
        // Accept the connection but never respond.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");
        let _server = tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                let _ = stream.read(&mut buf).await;
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
        });

        let transport = HttpTransport::new(&url).unwrap();
        let req = CommandRequest::bare("fcr a.bin 1 -o -v 1.0.0 -t 0xFE -c 0x1");
        let err = transport
            .send(&req, Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Timeout(_)));
    }
}
