//! Tests for the run module.

use super::*;
use ci_webhook::webhook::{Delivery, HttpRequest, HttpResponse};
use std::sync::Mutex;

/// Client answering every request with the same status.
struct StatusClient {
    status: http::StatusCode,
    urls: Mutex<Vec<String>>,
}

impl StatusClient {
    fn new(status: http::StatusCode) -> Self {
        Self {
            status,
            urls: Mutex::new(Vec::new()),
        }
    }
}

impl HttpClient for &StatusClient {
    type Body = Vec<u8>;

    async fn request(&self, req: HttpRequest) -> Result<HttpResponse<Vec<u8>>, HttpError> {
        self.urls.lock().unwrap().push(req.url.to_string());
        Ok(HttpResponse::new(
            self.status,
            http::HeaderMap::new(),
            b"body".to_vec(),
        ))
    }
}

#[derive(Default)]
struct CountingReporter {
    count: usize,
}

impl Reporter for CountingReporter {
    fn report(&mut self, _delivery: &Delivery<'_>, _debug: bool) {
        self.count += 1;
    }
}

fn config(targets: &[&str]) -> Configuration {
    Configuration {
        targets: targets.iter().map(ToString::to_string).collect(),
        ..Configuration::default()
    }
}

mod run_error {
    use super::*;

    #[test]
    fn payload_error_keeps_stage_message() {
        let error = RunError::from(PayloadError::Template("bad".to_string()));

        assert_eq!(error.to_string(), "executing content template: bad");
    }

    #[test]
    fn delivery_error_keeps_stage_message() {
        let error = RunError::from(DeliveryError::Transport(HttpError::Timeout));

        assert_eq!(
            error.to_string(),
            "executing http request: Request timed out"
        );
    }

    #[test]
    fn incomplete_displays_counts() {
        let error = RunError::Incomplete {
            failed: 1,
            total: 3,
        };

        assert_eq!(error.to_string(), "delivering webhooks: 1 of 3 failed");
    }
}

mod delivery {
    use super::*;
    use ci_webhook::webhook::FailurePolicy;

    #[tokio::test]
    async fn error_status_is_not_a_run_failure() {
        let client = StatusClient::new(http::StatusCode::SERVICE_UNAVAILABLE);
        let mut reporter = CountingReporter::default();
        let config = config(&["https://example.com"]);

        let result = deliver(&client, &config, &Payload::from_bytes(vec![]), &mut reporter).await;

        assert!(result.is_ok());
        assert_eq!(reporter.count, 1);
    }

    #[tokio::test]
    async fn invalid_url_aborts_run() {
        let client = StatusClient::new(http::StatusCode::OK);
        let mut reporter = CountingReporter::default();
        let config = config(&["https://a.example.com", "bad url", "https://c.example.com"]);

        let result = deliver(&client, &config, &Payload::from_bytes(vec![]), &mut reporter).await;

        assert!(matches!(
            result,
            Err(RunError::Delivery(DeliveryError::InvalidUrl { .. }))
        ));
        assert_eq!(client.urls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn continue_policy_reports_incomplete_run() {
        let client = StatusClient::new(http::StatusCode::OK);
        let mut reporter = CountingReporter::default();
        let config = Configuration {
            failure_policy: FailurePolicy::Continue,
            ..config(&["https://a.example.com", "bad url", "https://c.example.com"])
        };

        let result = deliver(&client, &config, &Payload::from_bytes(vec![]), &mut reporter).await;

        assert!(matches!(
            result,
            Err(RunError::Incomplete {
                failed: 1,
                total: 3
            })
        ));
        assert_eq!(client.urls.lock().unwrap().len(), 2);
    }
}
