//! Tests for HTTP request/response types.

use super::{HttpError, HttpRequest, HttpResponse, ResponseBody, is_error_status};

fn test_url() -> url::Url {
    url::Url::parse("https://example.com/api").unwrap()
}

mod http_request {
    use super::*;

    #[test]
    fn new_creates_request_with_method_and_url() {
        let req = HttpRequest::new(http::Method::PUT, test_url());

        assert_eq!(req.method, http::Method::PUT);
        assert_eq!(req.url, test_url());
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn post_creates_post_request() {
        let req = HttpRequest::post(test_url());

        assert_eq!(req.method, http::Method::POST);
    }

    #[test]
    fn with_body_sets_body() {
        let body = b"test body".to_vec();
        let req = HttpRequest::post(test_url()).with_body(body.clone());

        assert_eq!(req.body, Some(body));
    }

    #[test]
    fn with_header_appends_multiple_values_for_same_name() {
        let req = HttpRequest::post(test_url())
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("text/html"),
            )
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("application/json"),
            );

        assert_eq!(req.headers.get_all(http::header::ACCEPT).iter().count(), 2);
    }

    #[test]
    fn set_header_replaces_existing_values() {
        let mut req = HttpRequest::post(test_url())
            .with_header(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("application/json"),
            )
            .with_header(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("text/xml"),
            );

        req.set_header(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("text/plain"),
        );

        let values: Vec<_> = req.headers.get_all(http::header::CONTENT_TYPE).iter().collect();
        assert_eq!(values, ["text/plain"]);
    }

    #[test]
    fn set_basic_auth_encodes_credentials() {
        let mut req = HttpRequest::post(test_url());
        req.set_basic_auth("user", "pass").unwrap();

        // "user:pass" base64 encoded is "dXNlcjpwYXNz"
        assert_eq!(
            req.headers.get(http::header::AUTHORIZATION).unwrap(),
            "Basic dXNlcjpwYXNz"
        );
    }

    #[test]
    fn set_basic_auth_with_empty_password() {
        let mut req = HttpRequest::post(test_url());
        req.set_basic_auth("u", "").unwrap();

        // "u:" base64 encoded is "dTo="
        assert_eq!(
            req.headers.get(http::header::AUTHORIZATION).unwrap(),
            "Basic dTo="
        );
    }

    #[test]
    fn body_text_is_lossy() {
        let req = HttpRequest::post(test_url()).with_body(vec![b'o', b'k', 0xff]);

        assert_eq!(req.body_text(), "ok\u{fffd}");
        assert_eq!(HttpRequest::post(test_url()).body_text(), "");
    }

    #[test]
    fn debug_format_is_readable() {
        let req = HttpRequest::post(test_url());
        let debug = format!("{req:?}");

        assert!(debug.contains("HttpRequest"));
        assert!(debug.contains("POST"));
    }
}

mod http_response {
    use super::*;

    #[test]
    fn new_creates_response_with_all_fields() {
        let resp = HttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            b"response body".to_vec(),
        );

        assert_eq!(resp.status, http::StatusCode::OK);
        assert!(resp.headers.is_empty());
        assert_eq!(resp.body, b"response body".to_vec());
    }

    #[test]
    fn is_error_false_below_400() {
        for status in [
            http::StatusCode::OK,
            http::StatusCode::NO_CONTENT,
            http::StatusCode::MOVED_PERMANENTLY,
        ] {
            let resp = HttpResponse::new(status, http::HeaderMap::new(), ());
            assert!(!resp.is_error(), "Expected {status} not to be an error");
        }
    }

    #[test]
    fn is_error_starts_at_400() {
        for status in [
            http::StatusCode::BAD_REQUEST,
            http::StatusCode::NOT_FOUND,
            http::StatusCode::INTERNAL_SERVER_ERROR,
            http::StatusCode::SERVICE_UNAVAILABLE,
        ] {
            let resp = HttpResponse::new(status, http::HeaderMap::new(), ());
            assert!(resp.is_error(), "Expected {status} to be an error");
        }
    }

    #[test]
    fn non_standard_codes_above_599_are_errors() {
        for code in [600, 799, 999] {
            let status = http::StatusCode::from_u16(code).unwrap();
            assert!(is_error_status(status), "Expected {code} to be an error");
        }
        assert!(!is_error_status(http::StatusCode::from_u16(399).unwrap()));
    }

    #[tokio::test]
    async fn buffered_body_reads_back() {
        let resp = HttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            b"created".to_vec(),
        );

        assert_eq!(resp.body.read().await.unwrap(), b"created".to_vec());
    }
}

mod http_error {
    use super::*;
    use std::error::Error;

    #[test]
    fn connection_error_preserves_source() {
        let source = std::io::Error::other("network unavailable");
        let error = HttpError::Connection(Box::new(source));

        assert!(error.to_string().contains("Connection error"));
        assert!(
            error
                .source()
                .unwrap()
                .to_string()
                .contains("network unavailable")
        );
    }

    #[test]
    fn timeout_displays_message() {
        let error = HttpError::Timeout;

        assert_eq!(error.to_string(), "Request timed out");
        assert!(error.source().is_none());
    }

    #[test]
    fn invalid_request_displays_message() {
        let error = HttpError::InvalidRequest("bad header".to_string());

        assert!(error.to_string().contains("Invalid request"));
        assert!(error.to_string().contains("bad header"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpError>();
    }
}
