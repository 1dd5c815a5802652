//! Request/response values and the [`Transport`] trait.
//!
//! Requests are plain data so that the sign-in flow and the portal client can
//! be exercised against a scripted transport in tests.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use url::Url;

use crate::cookies::Cookie;
use crate::error::FetchError;

// ============================================================================
// Method / Body
// ============================================================================

/// HTTP methods used by the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
}

impl Method {
    /// Returns the method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        }
    }
}

/// Request body.
#[derive(Clone, Default, PartialEq)]
pub enum Body {
    /// No body.
    #[default]
    Empty,
    /// `application/x-www-form-urlencoded` fields.
    Form(Vec<(String, String)>),
    /// JSON document.
    Json(Value),
}

impl Body {
    fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Form(_) => "form",
            Self::Json(_) => "json",
        }
    }
}

// Form fields carry SAML blobs; only their names are shown.
impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Form(fields) => f
                .debug_tuple("Form")
                .field(&fields.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>())
                .finish(),
            other => f.write_str(other.kind()),
        }
    }
}

// ============================================================================
// Request
// ============================================================================

/// An HTTP request.
///
/// `Debug` output lists parameter, header and cookie names only.
#[derive(Clone, PartialEq)]
pub struct HttpRequest {
    /// Method.
    pub method: Method,
    /// URL without the query parameters below.
    pub url: String,
    /// Query parameters, appended to `url` in order.
    pub query: Vec<(String, String)>,
    /// Extra headers.
    pub headers: Vec<(String, String)>,
    /// Cookies to send with the first request of the redirect chain.
    pub cookies: Vec<Cookie>,
    /// Body.
    pub body: Body,
}

impl HttpRequest {
    /// Creates a request with no parameters.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            cookies: Vec::new(),
            body: Body::Empty,
        }
    }

    /// Creates a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Creates a POST request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    /// Creates a PUT request.
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the cookies to send.
    #[must_use]
    pub fn cookies(mut self, cookies: Vec<Cookie>) -> Self {
        self.cookies = cookies;
        self
    }

    /// Appends a form field, switching the body to a form.
    #[must_use]
    pub fn form_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let field = (name.into(), value.into());
        match &mut self.body {
            Body::Form(fields) => fields.push(field),
            body => *body = Body::Form(vec![field]),
        }
        self
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, value: Value) -> Self {
        self.body = Body::Json(value);
        self
    }

    /// Looks up a header (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        lookup(&self.headers, name, true)
    }

    /// Looks up a query parameter.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        lookup(&self.query, name, false)
    }

    /// Looks up a form field.
    pub fn form_value(&self, name: &str) -> Option<&str> {
        match &self.body {
            Body::Form(fields) => lookup(fields, name, false),
            _ => None,
        }
    }

    /// Names of the cookies attached to this request.
    pub fn cookie_names(&self) -> Vec<&str> {
        self.cookies.iter().map(|c| c.name.as_str()).collect()
    }

    /// Host of the request URL, if it parses.
    pub fn host(&self) -> Option<String> {
        Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], name: &str, ignore_case: bool) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| {
            if ignore_case {
                k.eq_ignore_ascii_case(name)
            } else {
                k == name
            }
        })
        .map(|(_, v)| v.as_str())
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |pairs: &[(String, String)]| pairs.iter().map(|(k, _)| k.clone()).collect::<Vec<_>>();
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &loggable_url(&self.url))
            .field("query", &names(&self.query))
            .field("headers", &names(&self.headers))
            .field("cookies", &self.cookie_names())
            .field("body", &self.body.kind())
            .finish()
    }
}

// ============================================================================
// Response
// ============================================================================

/// An HTTP response after all redirects were followed.
#[derive(Clone, PartialEq)]
pub struct HttpResponse {
    /// Status code of the last response.
    pub status: u16,
    /// URL of the last response, including any fragment from a redirect.
    pub final_url: String,
    /// Body of the last response.
    pub body: String,
    /// Every cookie set along the redirect chain, in order.
    pub set_cookies: Vec<Cookie>,
}

impl HttpResponse {
    /// Creates a response without cookies.
    pub fn new(status: u16, final_url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            final_url: final_url.into(),
            body: body.into(),
            set_cookies: Vec::new(),
        }
    }

    /// Adds a cookie set by this response.
    #[must_use]
    pub fn with_cookie(mut self, cookie: Cookie) -> Self {
        self.set_cookies.push(cookie);
        self
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Json` if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("final_url", &loggable_url(&self.final_url))
            .field("body_len", &self.body.len())
            .field("set_cookies", &self.set_cookies)
            .finish()
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Sends requests to the portal.
///
/// Implementations follow redirects and report every cookie set along the
/// way in [`HttpResponse::set_cookies`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a request and returns the final response.
    ///
    /// Non-2xx statuses are returned as responses, not errors.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError>;
}

/// Strips query and fragment from a URL so it can be logged.
///
/// Sign-in URLs carry credentials and tokens in both.
pub fn loggable_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => raw
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loggable_url_drops_secrets() {
        assert_eq!(
            loggable_url("https://conext.authenticatie.ru.nl/login.php?username=s1&password=hunter2"),
            "https://conext.authenticatie.ru.nl/login.php"
        );
        assert_eq!(
            loggable_url("https://ru.osiris-student.nl/#access_token=abc"),
            "https://ru.osiris-student.nl/"
        );
        assert_eq!(loggable_url("not a url?password=x"), "not a url");
    }

    #[test]
    fn test_request_builder() {
        let req = HttpRequest::post("https://engine.surfconext.nl/consume")
            .header("Taal", "EN")
            .query("submit", "Login")
            .form_field("SAMLResponse", "blob")
            .form_field("RelayState", "relay")
            .cookies(vec![Cookie::new("main", "m", "engine.surfconext.nl")]);

        assert_eq!(req.method, Method::Post);
        assert_eq!(req.header_value("taal"), Some("EN"));
        assert_eq!(req.query_value("submit"), Some("Login"));
        assert_eq!(req.form_value("RelayState"), Some("relay"));
        assert_eq!(req.cookie_names(), vec!["main"]);
        assert_eq!(req.host().as_deref(), Some("engine.surfconext.nl"));
    }

    #[test]
    fn test_request_debug_is_redacted() {
        let req = HttpRequest::post("https://conext.authenticatie.ru.nl/login")
            .query("password", "hunter2")
            .header("Authorization", "Bearer secret-token")
            .form_field("SAMLResponse", "blob-value");
        let rendered = format!("{req:?}");
        assert!(rendered.contains("password"));
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("secret-token"));
        assert!(!rendered.contains("blob-value"));
    }

    #[test]
    fn test_response_json() {
        let resp = HttpResponse::new(200, "https://x/", r#"{"items": [1, 2]}"#);
        assert!(resp.is_success());
        let v: Value = resp.json().unwrap();
        assert_eq!(v["items"][1], 2);

        let resp = HttpResponse::new(302, "https://x/", "not json");
        assert!(!resp.is_success());
        assert!(matches!(resp.json::<Value>(), Err(FetchError::Json(_))));
    }
}
