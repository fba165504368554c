//! HTTP request/response types and client trait.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use super::HttpError;

/// An HTTP request to be sent.
///
/// This is a value type that can be constructed and passed to any
/// [`HttpClient`] implementation. It uses standard `http` crate types
/// for method and headers, ensuring compatibility with the broader ecosystem.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method (GET, POST, PUT, DELETE, etc.)
    pub method: http::Method,
    /// Target URL
    pub url: url::Url,
    /// HTTP headers to send
    pub headers: http::HeaderMap,
    /// Optional request body
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a new HTTP request with the given method and URL.
    ///
    /// Headers are initialized to an empty map and body is `None`.
    #[must_use]
    pub fn new(method: http::Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: http::HeaderMap::new(),
            body: None,
        }
    }

    /// Creates a POST request to the given URL.
    #[must_use]
    pub fn post(url: url::Url) -> Self {
        Self::new(http::Method::POST, url)
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a header to the request.
    ///
    /// If the header name already exists, the value is appended
    /// (HTTP headers can have multiple values).
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets a header, replacing every existing value for that name.
    pub fn set_header(&mut self, name: http::HeaderName, value: http::HeaderValue) {
        self.headers.insert(name, value);
    }

    /// Sets the `Authorization` header to HTTP Basic credentials.
    ///
    /// The password may be empty; the header is still sent as `user:`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidRequest`] if the encoded credentials
    /// are not a valid header value.
    pub fn set_basic_auth(&mut self, username: &str, password: &str) -> Result<(), HttpError> {
        let encoded = BASE64_STANDARD.encode(format!("{username}:{password}"));
        let value = http::HeaderValue::from_str(&format!("Basic {encoded}"))
            .map_err(|e| HttpError::InvalidRequest(e.to_string()))?;
        self.set_header(http::header::AUTHORIZATION, value);
        Ok(())
    }

    /// Returns the body as UTF-8 text, replacing invalid sequences.
    #[must_use]
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(self.body.as_deref().unwrap_or_default())
    }
}

/// An HTTP response received from a server.
///
/// The body has not been read yet: call [`ResponseBody::read`] to buffer
/// it, or drop the response to release the underlying connection unread.
#[derive(Debug)]
pub struct HttpResponse<B> {
    /// HTTP status code
    pub status: http::StatusCode,
    /// Response headers
    pub headers: http::HeaderMap,
    /// Unread response body
    pub body: B,
}

impl<B> HttpResponse<B> {
    /// Creates a new HTTP response.
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns true if the status code is 400 or above.
    #[must_use]
    pub fn is_error(&self) -> bool {
        is_error_status(self.status)
    }
}

/// Returns true for any status code of 400 or above, including
/// non-standard codes up to 999.
#[must_use]
pub const fn is_error_status(status: http::StatusCode) -> bool {
    status.as_u16() >= 400
}

/// A response body that can be read exactly once.
///
/// Dropping an unread body releases its connection.
pub trait ResponseBody: Send {
    /// Reads the remaining body into memory.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the stream fails mid-read.
    fn read(self) -> impl std::future::Future<Output = Result<Vec<u8>, HttpError>> + Send;
}

impl ResponseBody for Vec<u8> {
    async fn read(self) -> Result<Vec<u8>, HttpError> {
        Ok(self)
    }
}

/// Trait for making HTTP requests.
///
/// # Design
///
/// This trait abstracts the HTTP client implementation, enabling:
/// - Dependency injection for testing with mock clients
/// - Swapping HTTP libraries without changing calling code
///
/// # Example
///
/// ```ignore
/// use ci_webhook::webhook::{HttpClient, HttpRequest, HttpResponse, HttpError};
///
/// struct MockClient;
///
/// impl HttpClient for MockClient {
///     type Body = Vec<u8>;
///
///     async fn request(&self, _req: HttpRequest) -> Result<HttpResponse<Vec<u8>>, HttpError> {
///         Ok(HttpResponse::new(http::StatusCode::OK, http::HeaderMap::new(), Vec::new()))
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Body type of the responses this client returns.
    type Body: ResponseBody;

    /// Sends an HTTP request and returns the response with its body unread.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when:
    /// - Network connection fails ([`HttpError::Connection`])
    /// - Request times out ([`HttpError::Timeout`])
    /// - The request cannot be assembled ([`HttpError::InvalidRequest`])
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse<Self::Body>, HttpError>> + Send;
}
