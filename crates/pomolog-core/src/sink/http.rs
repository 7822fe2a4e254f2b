//! HTTP event sink against the pomolog backend.
//!
//! Submissions are spawned onto a small background runtime so a slow or
//! unreachable backend never stalls the tick loop; the in-flight request
//! overlaps subsequent ticks and its outcome is only ever logged.
//! Dropping the sink grants pending submissions a short grace period.

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::error::SinkError;
use crate::events::SessionEvent;
use crate::sink::{EventSink, HistorySource};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Client for the backend's `/log_session` and `/sessions` endpoints.
pub struct HttpEventSink {
    client: Client,
    base: Url,
    /// Taken only in Drop.
    runtime: Option<tokio::runtime::Runtime>,
}

impl HttpEventSink {
    /// Build a sink against `base_url` (e.g. `http://127.0.0.1:5000`).
    ///
    /// # Errors
    /// Returns an error if the URL does not parse or the background
    /// runtime cannot start.
    pub fn new(base_url: &str) -> Result<Self, SinkError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;
        Ok(Self {
            client,
            base,
            runtime: Some(runtime),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SinkError> {
        Ok(self.base.join(path)?)
    }
}

async fn post_event(client: &Client, url: Url, event: &SessionEvent) -> Result<(), SinkError> {
    let resp = client.post(url).json(event).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(SinkError::Http {
            status: status.as_u16(),
            body: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(())
}

impl EventSink for HttpEventSink {
    fn submit(&self, event: &SessionEvent) {
        let url = match self.endpoint("log_session") {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("failed to build backend URL: {e}");
                return;
            }
        };
        let client = self.client.clone();
        let event = event.clone();
        if let Some(rt) = &self.runtime {
            rt.spawn(async move {
                if let Err(e) = post_event(&client, url, &event).await {
                    tracing::warn!("failed to log session event: {e}");
                }
            });
        }
    }
}

impl HistorySource for HttpEventSink {
    fn fetch_history(&self) -> Result<Vec<SessionEvent>, SinkError> {
        let url = self.endpoint("sessions")?;
        let client = self.client.clone();
        let fetch = async move {
            let resp = client.get(url).send().await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(SinkError::Http {
                    status: status.as_u16(),
                    body: resp.text().await.unwrap_or_default(),
                });
            }
            Ok(resp.json::<Vec<SessionEvent>>().await?)
        };
        match &self.runtime {
            Some(rt) => rt.block_on(fetch),
            None => unreachable!("runtime taken only in Drop"),
        }
    }
}

impl Drop for HttpEventSink {
    fn drop(&mut self) {
        if let Some(rt) = self.runtime.take() {
            rt.shutdown_timeout(SHUTDOWN_GRACE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{SessionAction, SessionType};
    use chrono::Utc;
    use serde_json::json;

    fn event() -> SessionEvent {
        SessionEvent {
            session_type: SessionType::Work,
            action: SessionAction::Start,
            timestamp: Utc::now(),
            duration: 0,
            cycle_count: 1,
            session_count: 1,
        }
    }

    #[test]
    fn submit_posts_the_record_shape() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/log_session")
            .match_body(mockito::Matcher::PartialJson(json!({
                "session_type": "work",
                "action": "start",
                "duration": 0,
                "cycle_count": 1,
                "session_count": 1,
            })))
            .with_status(200)
            .with_body(r#"{"success": true, "message": "Session logged successfully"}"#)
            .create();

        let sink = HttpEventSink::new(&server.url()).unwrap();
        sink.submit(&event());
        drop(sink); // waits out the spawned request

        mock.assert();
    }

    #[test]
    fn submit_survives_server_errors() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/log_session")
            .with_status(500)
            .with_body(r#"{"error": "disk full"}"#)
            .create();

        let sink = HttpEventSink::new(&server.url()).unwrap();
        sink.submit(&event());
        drop(sink);

        mock.assert(); // delivered, failure logged and dropped
    }

    #[test]
    fn fetch_history_parses_the_array() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/sessions")
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{
                    "session_type": "work",
                    "action": "complete",
                    "timestamp": "2026-03-01T09:30:00Z",
                    "duration": 1500,
                    "cycle_count": 1,
                    "session_count": 1
                }]"#,
            )
            .create();

        let sink = HttpEventSink::new(&server.url()).unwrap();
        let events = sink.fetch_history().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, SessionAction::Complete);
        assert_eq!(events[0].duration, 1500);
    }

    #[test]
    fn fetch_history_surfaces_http_errors() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/sessions").with_status(500).create();

        let sink = HttpEventSink::new(&server.url()).unwrap();
        assert!(matches!(
            sink.fetch_history(),
            Err(SinkError::Http { status: 500, .. })
        ));
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(HttpEventSink::new("not a url").is_err());
    }
}
