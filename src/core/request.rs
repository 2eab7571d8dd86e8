//! HTTP Request
//!
//! Immutable request descriptors and the fluent builder that produces them.
//!
//! ```rust,ignore
//! let request = HttpRequest::builder()
//!     .host("oauth.reddit.com")
//!     .path_with_params("/api/{resource}", ["foo"])
//!     .query_param("raw_json", "1")
//!     .build()?;
//!
//! assert_eq!(request.url(), "https://oauth.reddit.com/api/foo?raw_json=1");
//! ```

use std::fmt;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use base64::Engine;
use indexmap::IndexMap;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use url::form_urlencoded;

use crate::core::transport::HttpResponse;
use crate::error::{ConfigurationError, RedditAuthError};

/// Matches a positional path parameter such as `{resource}`.
static PATH_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(.*?)\}").expect("a valid regex"));

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP method.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    /// Any other token, stored uppercase.
    Other(String),
}

impl HttpMethod {
    /// Parse a method name. Case insensitive, surrounding whitespace ignored.
    pub fn parse(method: &str) -> Self {
        let method = method.trim().to_uppercase();
        match method.as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            "HEAD" => Self::Head,
            "OPTIONS" => Self::Options,
            _ => Self::Other(method),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Other(method) => method,
        }
    }
}

impl Default for HttpMethod {
    fn default() -> Self {
        Self::Get
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestBody {
    /// Raw bytes with an optional content type.
    Raw {
        content_type: Option<String>,
        data: Vec<u8>,
    },
    /// Form fields, encoded as `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
}

impl RequestBody {
    pub fn raw(data: impl Into<Vec<u8>>) -> Self {
        Self::Raw {
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(data: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self::Raw {
            content_type: Some(content_type.into()),
            data: data.into(),
        }
    }

    pub fn form<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn content_type(&self) -> Option<&str> {
        match self {
            Self::Raw { content_type, .. } => content_type.as_deref(),
            Self::Form(_) => Some(FORM_CONTENT_TYPE),
        }
    }

    /// Bytes as they go on the wire.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Raw { data, .. } => data.clone(),
            Self::Form(fields) => {
                encode_pairs(fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))).into_bytes()
            }
        }
    }
}

/// HTTP basic authentication credentials.
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: SecretString,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password.into()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password.expose_secret());
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(credentials)
        )
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Called with a 2xx response.
pub type ResponseHandler = Arc<dyn Fn(&HttpResponse) + Send + Sync>;

/// Called when the transport itself fails (connection, timeout, oversized body).
pub type TransportFailureHandler = Arc<dyn Fn(&HttpRequest, &RedditAuthError) + Send + Sync>;

/// Optional callbacks used by [`dispatch`](crate::core::dispatch::dispatch). Direct
/// transport calls ignore them.
#[derive(Clone, Default)]
pub struct Handlers {
    pub(crate) success: Option<ResponseHandler>,
    pub(crate) failure: Option<ResponseHandler>,
    pub(crate) transport_failure: Option<TransportFailureHandler>,
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("success", &self.success.is_some())
            .field("failure", &self.failure.is_some())
            .field("transport_failure", &self.transport_failure.is_some())
            .finish()
    }
}

/// Immutable HTTP request description.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    method: HttpMethod,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<RequestBody>,
    basic_auth: Option<BasicAuth>,
    timeout: Option<Duration>,
    handlers: Handlers,
}

impl HttpRequest {
    pub fn builder() -> HttpRequestBuilder {
        HttpRequestBuilder::new()
    }

    pub fn method(&self) -> &HttpMethod {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Headers in insertion order, duplicates included.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Last value set for a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    pub fn basic_auth(&self) -> Option<&BasicAuth> {
        self.basic_auth.as_ref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }
}

/// Fluent builder for [`HttpRequest`].
///
/// `build` borrows the builder, so one configuration can produce several
/// requests. Each request owns copies of the headers, query and body.
#[derive(Clone)]
pub struct HttpRequestBuilder {
    method: HttpMethod,
    headers: Vec<(String, String)>,
    body: Option<RequestBody>,
    basic_auth: Option<BasicAuth>,
    timeout: Option<Duration>,
    handlers: Handlers,

    url: Option<String>,
    secure: bool,
    host: String,
    path: String,
    path_params: Vec<String>,
    query: IndexMap<String, String>,
}

impl Default for HttpRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpRequestBuilder {
    pub fn new() -> Self {
        Self {
            method: HttpMethod::Get,
            headers: Vec::new(),
            body: None,
            basic_auth: None,
            timeout: None,
            handlers: Handlers::default(),
            url: None,
            secure: true,
            host: String::new(),
            path: String::new(),
            path_params: Vec::new(),
            query: IndexMap::new(),
        }
    }

    /// Set the HTTP method, clearing any body. Defaults to GET. Case insensitive.
    pub fn method(mut self, method: &str) -> Self {
        self.method = HttpMethod::parse(method);
        self.body = None;
        self
    }

    /// Set the HTTP method together with its payload.
    pub fn method_with_body(mut self, method: &str, body: RequestBody) -> Self {
        self.method = HttpMethod::parse(method);
        self.body = Some(body);
        self
    }

    /// Set the HTTP method with a form-encoded payload.
    pub fn method_with_form<I, K, V>(self, method: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.method_with_body(method, RequestBody::form(fields))
    }

    pub fn get(self) -> Self {
        self.method("GET")
    }

    pub fn delete(self) -> Self {
        self.method("DELETE")
    }

    pub fn post(self, body: RequestBody) -> Self {
        self.method_with_body("POST", body)
    }

    pub fn post_form<I, K, V>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.method_with_form("POST", fields)
    }

    pub fn put(self, body: RequestBody) -> Self {
        self.method_with_body("PUT", body)
    }

    pub fn put_form<I, K, V>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.method_with_form("PUT", fields)
    }

    pub fn patch(self, body: RequestBody) -> Self {
        self.method_with_body("PATCH", body)
    }

    pub fn patch_form<I, K, V>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.method_with_form("PATCH", fields)
    }

    /// Use this URL verbatim, ignoring host, path and query.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Add a header. Repeated names are kept in order.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Called on a 2xx status code.
    pub fn success<F>(mut self, handler: F) -> Self
    where
        F: Fn(&HttpResponse) + Send + Sync + 'static,
    {
        self.handlers.success = Some(Arc::new(handler));
        self
    }

    /// Called on a non-2xx status code.
    pub fn failure<F>(mut self, handler: F) -> Self
    where
        F: Fn(&HttpResponse) + Send + Sync + 'static,
    {
        self.handlers.failure = Some(Arc::new(handler));
        self
    }

    /// Called when the transport fails before a response arrives.
    pub fn transport_failure<F>(mut self, handler: F) -> Self
    where
        F: Fn(&HttpRequest, &RedditAuthError) + Send + Sync + 'static,
    {
        self.handlers.transport_failure = Some(Arc::new(handler));
        self
    }

    /// Send HTTP basic authentication.
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some(BasicAuth::new(username, password));
        self
    }

    /// Enable or disable HTTPS (enabled by default).
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Host name, e.g. `"oauth.reddit.com"`.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Path without positional parameters.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self.path_params.clear();
        self
    }

    /// Path with positional parameters. With `"/api/{resource}"` and `["foo"]`
    /// the resulting path is `"/api/foo"`.
    pub fn path_with_params<I, S>(mut self, path: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path = path.into();
        self.path_params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the query parameters.
    pub fn query<I, K, V>(mut self, query: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query = query
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Add or overwrite one query parameter.
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Per-request timeout, overriding the transport default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the request.
    pub fn build(&self) -> Result<HttpRequest, RedditAuthError> {
        Ok(HttpRequest {
            method: self.method.clone(),
            url: self.build_url()?,
            headers: self.headers.clone(),
            body: self.body.clone(),
            basic_auth: self.basic_auth.clone(),
            timeout: self.timeout,
            handlers: self.handlers.clone(),
        })
    }

    fn build_url(&self) -> Result<String, RedditAuthError> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }

        let host = self.host.trim();
        if host.is_empty() {
            return Err(ConfigurationError::EmptyHost.into());
        }

        let mut path = self.path.trim().to_string();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        if !self.path_params.is_empty() {
            path = substitute_path_params(&path, &self.path_params)?;
        }

        let scheme = if self.secure { "https" } else { "http" };
        Ok(format!("{}://{}{}{}", scheme, host, path, build_query(&self.query)))
    }
}

/// Replace `{name}` placeholders left to right with the positional arguments.
fn substitute_path_params(path: &str, args: &[String]) -> Result<String, RedditAuthError> {
    let expected = PATH_PARAM.find_iter(path).count();
    if expected != args.len() {
        return Err(ConfigurationError::PathParameterMismatch {
            expected,
            actual: args.len(),
        }
        .into());
    }

    let mut substituted = String::with_capacity(path.len());
    let mut last = 0;
    for (placeholder, arg) in PATH_PARAM.find_iter(path).zip(args) {
        substituted.push_str(&path[last..placeholder.start()]);
        substituted.push_str(arg);
        last = placeholder.end();
    }
    substituted.push_str(&path[last..]);

    Ok(substituted)
}

fn build_query(query: &IndexMap<String, String>) -> String {
    if query.is_empty() {
        return String::new();
    }
    format!(
        "?{}",
        encode_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    )
}

/// `k=v&k=v` with UTF-8 form encoding (space becomes `+`).
fn encode_pairs<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_url_with_path_params() {
        let request = HttpRequest::builder()
            .host("oauth.reddit.com")
            .path_with_params("/api/{resource}", ["foo"])
            .build()
            .unwrap();

        assert_eq!(request.url(), "https://oauth.reddit.com/api/foo");
        assert_eq!(request.method(), &HttpMethod::Get);
    }

    #[test]
    fn test_path_param_mismatch() {
        let result = HttpRequest::builder()
            .host("oauth.reddit.com")
            .path_with_params("/api/{a}/{b}", ["x"])
            .build();

        assert!(matches!(
            result,
            Err(RedditAuthError::Configuration(
                ConfigurationError::PathParameterMismatch {
                    expected: 2,
                    actual: 1
                }
            ))
        ));
    }

    #[test]
    fn test_path_params_inserted_literally() {
        let request = HttpRequest::builder()
            .host("oauth.reddit.com")
            .path_with_params("/r/{subreddit}/comments/{id}", ["{id}", "$1"])
            .build()
            .unwrap();

        assert_eq!(request.url(), "https://oauth.reddit.com/r/{id}/comments/$1");
    }

    #[test]
    fn test_empty_host() {
        let result = HttpRequest::builder().host("   ").path("/api/v1/me").build();
        assert!(matches!(
            result,
            Err(RedditAuthError::Configuration(ConfigurationError::EmptyHost))
        ));
    }

    #[test]
    fn test_path_normalization() {
        let request = HttpRequest::builder()
            .host("oauth.reddit.com")
            .path("  api/v1/me ")
            .build()
            .unwrap();
        assert_eq!(request.url(), "https://oauth.reddit.com/api/v1/me");

        let request = HttpRequest::builder()
            .host("oauth.reddit.com")
            .build()
            .unwrap();
        assert_eq!(request.url(), "https://oauth.reddit.com/");
    }

    #[test]
    fn test_query_is_joined_and_encoded() {
        let request = HttpRequest::builder()
            .host("oauth.reddit.com")
            .path("/search")
            .query([("q", "rust lang"), ("sort", "new"), ("after", "t3_a&b=c")])
            .build()
            .unwrap();

        assert_eq!(
            request.url(),
            "https://oauth.reddit.com/search?q=rust+lang&sort=new&after=t3_a%26b%3Dc"
        );
    }

    #[test]
    fn test_insecure_scheme() {
        let request = HttpRequest::builder()
            .host("localhost:8080")
            .path("/x")
            .secure(false)
            .build()
            .unwrap();
        assert_eq!(request.url(), "http://localhost:8080/x");
    }

    #[test]
    fn test_explicit_url_wins() {
        let request = HttpRequest::builder()
            .url("https://www.reddit.com/api/v1/access_token")
            .path_with_params("/{a}/{b}", ["only-one"])
            .build()
            .unwrap();
        assert_eq!(request.url(), "https://www.reddit.com/api/v1/access_token");
    }

    #[test]
    fn test_method_normalization() {
        let builder = HttpRequest::builder().url("https://example.com");

        assert_eq!(builder.clone().method(" delete ").build().unwrap().method(), &HttpMethod::Delete);
        assert_eq!(
            builder.clone().method("purge").build().unwrap().method().as_str(),
            "PURGE"
        );
        let request = builder
            .method_with_form("post", [("a", "1")])
            .build()
            .unwrap();
        assert_eq!(request.method(), &HttpMethod::Post);
    }

    #[test]
    fn test_method_clears_body() {
        let request = HttpRequest::builder()
            .url("https://example.com")
            .post_form([("a", "1")])
            .get()
            .build()
            .unwrap();
        assert!(request.body().is_none());
    }

    #[test]
    fn test_form_body_encoding() {
        let request = HttpRequest::builder()
            .url("https://www.reddit.com/api/v1/access_token")
            .post_form([("grant_type", "refresh_token"), ("refresh_token", "a b/c")])
            .build()
            .unwrap();

        let body = request.body().unwrap();
        assert_eq!(body.content_type(), Some(FORM_CONTENT_TYPE));
        assert_eq!(
            body.to_bytes(),
            b"grant_type=refresh_token&refresh_token=a+b%2Fc".to_vec()
        );
    }

    #[test]
    fn test_raw_body() {
        let request = HttpRequest::builder()
            .url("https://example.com")
            .patch(RequestBody::with_content_type("{}", "application/json"))
            .build()
            .unwrap();
        assert_eq!(request.method(), &HttpMethod::Patch);
        assert_eq!(request.body().unwrap().content_type(), Some("application/json"));
        assert_eq!(request.body().unwrap().to_bytes(), b"{}".to_vec());
    }

    #[test]
    fn test_headers_keep_duplicates_in_order() {
        let request = HttpRequest::builder()
            .url("https://example.com")
            .header("Accept", "text/plain")
            .header("X-Trace", "1")
            .header("accept", "application/json")
            .build()
            .unwrap();

        assert_eq!(request.headers().len(), 3);
        assert_eq!(request.header("ACCEPT"), Some("application/json"));
        assert_eq!(request.header("missing"), None);
    }

    #[test]
    fn test_basic_auth_header_value() {
        let request = HttpRequest::builder()
            .url("https://example.com")
            .basic_auth("client", "secret")
            .build()
            .unwrap();

        let auth = request.basic_auth().unwrap();
        assert_eq!(auth.username(), "client");
        assert_eq!(auth.header_value(), "Basic Y2xpZW50OnNlY3JldA==");
        assert!(!format!("{:?}", auth).contains("secret"));
    }

    #[test]
    fn test_build_is_isolated_from_later_mutation() {
        let builder = HttpRequest::builder()
            .host("oauth.reddit.com")
            .path("/api/v1/me")
            .header("X-One", "1")
            .query_param("a", "1");

        let first = builder.build().unwrap();

        let builder = builder.header("X-Two", "2").query_param("b", "2").path("/other");
        let second = builder.build().unwrap();

        assert_eq!(first.url(), "https://oauth.reddit.com/api/v1/me?a=1");
        assert_eq!(first.headers().len(), 1);
        assert_eq!(second.url(), "https://oauth.reddit.com/other?a=1&b=2");
        assert_eq!(second.headers().len(), 2);
    }

    #[test]
    fn test_handlers_are_carried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let request = HttpRequest::builder()
            .url("https://example.com")
            .success(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        assert!(request.handlers().failure.is_none());
        assert!(request.handlers().transport_failure.is_none());

        let success = request.handlers().success.clone().unwrap();
        success(&HttpResponse::new(200, ""));
        request.clone().handlers().success.as_ref().unwrap()(&HttpResponse::new(204, ""));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
