//! reqwest-backed [`Transport`].
//!
//! reqwest's own redirect handling hides the intermediate responses, and the
//! sign-in flow needs the cookies those responses set. This transport turns
//! automatic redirects off and walks the chain itself:
//! - every `Set-Cookie` along the chain is reported in the response
//! - cookies from earlier in the chain are sent on to matching hosts
//! - a `Location` fragment is carried through later redirects that have none
//! - credentials are not sent on once the chain leaves the first origin
//! - the whole chain shares one timeout
//! - only hosts in the allowlist (if set) are contacted

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header, redirect::Policy};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::cookies::{Cookie, CookieJar, header_value};
use crate::error::FetchError;
use crate::transport::{Body, HttpRequest, HttpResponse, Method, Transport, loggable_url};

/// Default timeout for one request including its redirects.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum redirects followed for one request.
const MAX_REDIRECTS: usize = 10;

/// Headers dropped when a redirect leaves the first origin.
const SENSITIVE_HEADERS: [&str; 5] = [
    "authorization",
    "proxy-authorization",
    "cookie",
    "cookie2",
    "www-authenticate",
];

/// User agent string for Osiris.
const USER_AGENT: &str = concat!("osiris/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Transport
// ============================================================================

/// HTTP transport with manual redirect handling and domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: Client,
    timeout: Duration,
    allowed_domains: Option<Vec<String>>,
}

impl HttpTransport {
    /// Creates a transport with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a transport with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .redirect(Policy::none())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner: client,
            timeout,
            allowed_domains: None,
        })
    }

    /// Restricts requests (and redirect targets) to these domains and their
    /// subdomains.
    #[must_use]
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Returns the timeout applied to each request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &Url) -> Result<(), FetchError> {
        let Some(ref allowed) = self.allowed_domains else {
            return Ok(()); // No restrictions
        };

        let host = url
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(FetchError::DomainNotAllowed(host.to_string()))
        }
    }

    async fn follow(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let mut url = build_url(&request)?;
        let mut method = request.method;
        let mut body = request.body;
        let mut headers = request.headers;

        // Cookies visible to the chain: the caller's first, then whatever the
        // chain sets. Only the caller's cookies go on the first request.
        let mut chain = CookieJar::new();
        chain.absorb(request.cookies.iter().cloned());
        let mut cookie_header = header_value(&request.cookies);
        let mut set_cookies = Vec::new();

        for redirect in 0..=MAX_REDIRECTS {
            self.is_domain_allowed(&url)?;
            debug!(method = %method, url = %loggable_url(url.as_str()), redirect, "Sending request");

            let mut builder = self.inner.request(method.into(), url.clone());
            for (name, value) in &headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(cookies) = &cookie_header {
                builder = builder.header(header::COOKIE, cookies.as_str());
            }
            builder = match &body {
                Body::Empty => builder,
                Body::Form(fields) => builder.form(fields),
                Body::Json(value) => builder.json(value),
            };

            let response = builder.send().await?;
            let status = response.status();
            let host = url.host_str().unwrap_or_default().to_string();

            let issued: Vec<Cookie> = response
                .headers()
                .get_all(header::SET_COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .filter_map(|v| Cookie::parse_set_cookie(v, &host))
                .collect();
            debug!(status = %status, cookies = issued.len(), "Response received");
            chain.absorb(issued.iter().cloned());
            set_cookies.extend(issued);

            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok());

            if let (true, Some(location)) = (status.is_redirection(), location) {
                let mut next = url
                    .join(location)
                    .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
                if next.fragment().is_none() {
                    next.set_fragment(url.fragment());
                }
                if !same_origin(&url, &next) {
                    headers.retain(|(name, _)| !is_sensitive_header(name));
                }
                let (next_method, keep_body) = redirect_method(status, method);
                method = next_method;
                if !keep_body {
                    body = Body::Empty;
                }
                let next_host = next.host_str().unwrap_or_default();
                cookie_header = header_value(&chain.for_host(next_host));
                url = next;
                continue;
            }

            let text = response.text().await?;
            return Ok(HttpResponse {
                status: status.as_u16(),
                final_url: url.to_string(),
                body: text,
                set_cookies,
            });
        }

        Err(FetchError::TooManyRedirects(MAX_REDIRECTS))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %loggable_url(&request.url)))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let secs = self.timeout.as_secs();
        tokio::time::timeout(self.timeout, self.follow(request))
            .await
            .map_err(|_| FetchError::Timeout(secs))?
    }
}

/// Parses the request URL and appends its query parameters.
fn build_url(request: &HttpRequest) -> Result<Url, FetchError> {
    let mut url = Url::parse(&request.url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
    if !request.query.is_empty() {
        url.query_pairs_mut().extend_pairs(&request.query);
    }
    Ok(url)
}

/// Method for the next request of a redirect chain, and whether the body is
/// sent again.
///
/// 307 and 308 repeat the request as is. 301, 302 and 303 turn a POST or PUT
/// into a body-less GET, as browsers do.
fn redirect_method(status: StatusCode, method: Method) -> (Method, bool) {
    match status {
        StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT => (method, true),
        _ => (Method::Get, false),
    }
}

/// Host and port match, as reqwest decides when to strip credentials.
fn same_origin(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str() && a.port_or_known_default() == b.port_or_known_default()
}

fn is_sensitive_header(name: &str) -> bool {
    SENSITIVE_HEADERS
        .iter()
        .any(|sensitive| name.eq_ignore_ascii_case(sensitive))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_allowlist() {
        let transport = HttpTransport::new().unwrap().with_allowed_domains(vec![
            "surfconext.nl".to_string(),
            "ru.nl".to_string(),
        ]);

        let ok = Url::parse("https://engine.surfconext.nl/authentication").unwrap();
        let ok_sub = Url::parse("https://conext.authenticatie.ru.nl/simplesaml").unwrap();
        let bad = Url::parse("https://evil.com/steal").unwrap();
        let lookalike = Url::parse("https://notru.nl/").unwrap();

        assert!(transport.is_domain_allowed(&ok).is_ok());
        assert!(transport.is_domain_allowed(&ok_sub).is_ok());
        assert!(matches!(
            transport.is_domain_allowed(&bad),
            Err(FetchError::DomainNotAllowed(host)) if host == "evil.com"
        ));
        assert!(transport.is_domain_allowed(&lookalike).is_err());
    }

    #[test]
    fn test_no_domain_restrictions() {
        let transport = HttpTransport::new().unwrap();
        let url = Url::parse("https://any.domain.com").unwrap();
        assert!(transport.is_domain_allowed(&url).is_ok());
        assert_eq!(transport.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_build_url_appends_query() {
        let request = HttpRequest::post("https://conext.authenticatie.ru.nl/login.php?")
            .query("username", "s1234567")
            .query("AuthState", "_a:b/c");
        let url = build_url(&request).unwrap();
        assert_eq!(url.query_pairs().count(), 2);
        assert!(url.as_str().contains("AuthState=_a%3Ab%2Fc"));
    }

    #[test]
    fn test_redirect_method() {
        assert_eq!(redirect_method(StatusCode::FOUND, Method::Post), (Method::Get, false));
        assert_eq!(redirect_method(StatusCode::SEE_OTHER, Method::Put), (Method::Get, false));
        assert_eq!(
            redirect_method(StatusCode::TEMPORARY_REDIRECT, Method::Post),
            (Method::Post, true)
        );
    }

    #[test]
    fn test_sensitive_headers() {
        assert!(is_sensitive_header("Authorization"));
        assert!(is_sensitive_header("cookie"));
        assert!(!is_sensitive_header("Taal"));

        let a = Url::parse("https://ru.osiris-student.nl/student").unwrap();
        let b = Url::parse("https://ru.osiris-student.nl:443/other").unwrap();
        let c = Url::parse("https://engine.surfconext.nl/").unwrap();
        assert!(same_origin(&a, &b));
        assert!(!same_origin(&a, &c));
    }

    #[test]
    fn test_location_join_keeps_fragment() {
        let base = Url::parse("https://auth-app-ruprd-ruprd.xpaas.caci.nl/oauth2/authorize").unwrap();
        let next = base
            .join("https://ru.osiris-student.nl/#access_token=abc&token_type=bearer")
            .unwrap();
        assert_eq!(next.fragment(), Some("access_token=abc&token_type=bearer"));

        let relative = base.join("/login?AuthState=x").unwrap();
        assert_eq!(relative.host_str(), Some("auth-app-ruprd-ruprd.xpaas.caci.nl"));
    }
}
