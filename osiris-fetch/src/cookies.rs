//! Cookies collected during a sign-in.
//!
//! The sign-in hops cross four hosts. A [`CookieJar`] keeps the latest value
//! of every cookie seen so far, keyed by name, together with the host that
//! issued it. Each hop then picks what it needs: the cookies for its target
//! host, or a fixed set of names.
//!
//! Cookie values are session secrets. Neither [`Cookie`] nor [`CookieJar`]
//! prints them in `Debug` output.

use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Cookie
// ============================================================================

/// A single cookie and the domain it belongs to.
#[derive(Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Domain the cookie belongs to, without a leading dot.
    pub domain: String,
}

impl Cookie {
    /// Creates a cookie owned by `domain`.
    pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: normalize_domain(&domain.into()),
        }
    }

    /// Parses a `Set-Cookie` header value.
    ///
    /// The owning domain is the `Domain` attribute when present, otherwise the
    /// host that sent the header. Returns `None` for headers without a
    /// `name=value` pair.
    pub fn parse_set_cookie(header: &str, request_host: &str) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut domain = request_host.to_string();
        for attr in parts {
            let (key, val) = attr.split_once('=').unwrap_or((attr, ""));
            if key.trim().eq_ignore_ascii_case("domain") && !val.trim().is_empty() {
                domain = val.trim().to_string();
            }
        }

        Some(Self::new(name, value.trim().trim_matches('"'), domain))
    }

    /// Returns true if this cookie should be sent to `host`.
    pub fn matches_domain(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        host == self.domain || host.ends_with(&format!(".{}", self.domain))
    }
}

impl fmt::Debug for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cookie")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .field("domain", &self.domain)
            .finish()
    }
}

fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Renders cookies as a `Cookie` header value (`a=1; b=2`).
///
/// Returns `None` when there is nothing to send.
pub fn header_value<'a>(cookies: impl IntoIterator<Item = &'a Cookie>) -> Option<String> {
    let rendered: Vec<String> = cookies
        .into_iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect();
    if rendered.is_empty() {
        None
    } else {
        Some(rendered.join("; "))
    }
}

// ============================================================================
// Cookie Jar
// ============================================================================

/// Cookies accumulated across the requests of one sign-in attempt.
///
/// Later cookies replace earlier ones with the same name, whatever host
/// issued them.
#[derive(Clone, Default)]
pub struct CookieJar {
    cookies: BTreeMap<String, Cookie>,
}

impl CookieJar {
    /// Creates an empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds cookies, replacing any earlier cookie with the same name.
    pub fn absorb<I>(&mut self, cookies: I)
    where
        I: IntoIterator<Item = Cookie>,
    {
        for cookie in cookies {
            self.cookies.insert(cookie.name.clone(), cookie);
        }
    }

    /// Returns the cookies that belong to `host`.
    pub fn for_host(&self, host: &str) -> Vec<Cookie> {
        self.cookies
            .values()
            .filter(|c| c.matches_domain(host))
            .cloned()
            .collect()
    }

    /// Returns the cookies with the given names, whatever their host.
    pub fn named(&self, names: &[&str]) -> Vec<Cookie> {
        names
            .iter()
            .filter_map(|name| self.cookies.get(*name))
            .cloned()
            .collect()
    }

    /// Looks up a cookie by name.
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.get(name)
    }

    /// Number of cookies held.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Returns true if the jar holds no cookies.
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

impl fmt::Debug for CookieJar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.cookies.values().map(|c| format!("{}@{}", c.name, c.domain)))
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn jar() -> CookieJar {
        let mut jar = CookieJar::new();
        jar.absorb([
            Cookie::new("main", "m1", "engine.surfconext.nl"),
            Cookie::new("HTTPSERVERID", "srv1", "engine.surfconext.nl"),
            Cookie::new("SimpleSAMLSessionID", "sess", "conext.authenticatie.ru.nl"),
            Cookie::new("JSESSIONID", "j", "auth-app-ruprd-ruprd.xpaas.caci.nl"),
        ]);
        jar
    }

    #[test]
    fn test_parse_set_cookie_host_default() {
        let c = Cookie::parse_set_cookie("main=abc123; Path=/; Secure; HttpOnly", "engine.surfconext.nl")
            .unwrap();
        assert_eq!(c.name, "main");
        assert_eq!(c.value, "abc123");
        assert_eq!(c.domain, "engine.surfconext.nl");
    }

    #[test]
    fn test_parse_set_cookie_domain_attribute() {
        let c = Cookie::parse_set_cookie("lang=en; domain=.SurfConext.nl; path=/", "engine.surfconext.nl")
            .unwrap();
        assert_eq!(c.domain, "surfconext.nl");
        assert!(c.matches_domain("engine.surfconext.nl"));
        assert!(!c.matches_domain("evilsurfconext.nl"));
    }

    #[test]
    fn test_parse_set_cookie_rejects_garbage() {
        assert!(Cookie::parse_set_cookie("novalue", "a.nl").is_none());
        assert!(Cookie::parse_set_cookie("=x", "a.nl").is_none());
        // Values may contain '='
        let c = Cookie::parse_set_cookie("t=a=b", "a.nl").unwrap();
        assert_eq!(c.value, "a=b");
    }

    #[test]
    fn test_for_host() {
        let names: Vec<_> = jar()
            .for_host("conext.authenticatie.ru.nl")
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["SimpleSAMLSessionID"]);
    }

    #[test]
    fn test_named_keeps_order_and_skips_missing() {
        let names: Vec<_> = jar()
            .named(&["main", "HTTPSERVERID", "absent"])
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["main", "HTTPSERVERID"]);
    }

    #[test]
    fn test_later_cookie_replaces_earlier() {
        let mut jar = jar();
        jar.absorb([Cookie::new("main", "m2", "engine.surfconext.nl")]);
        assert_eq!(jar.len(), 4);
        assert_eq!(jar.get("main").unwrap().value, "m2");
    }

    #[test]
    fn test_header_value() {
        let jar = jar();
        let cookies = jar.named(&["main", "HTTPSERVERID"]);
        assert_eq!(header_value(&cookies).as_deref(), Some("main=m1; HTTPSERVERID=srv1"));
        assert!(header_value(&Vec::<Cookie>::new()).is_none());
    }

    #[test]
    fn test_debug_hides_values() {
        let jar = jar();
        let rendered = format!("{jar:?} {:?}", jar.get("main").unwrap());
        assert!(rendered.contains("main@engine.surfconext.nl"));
        assert!(!rendered.contains("m1"));
        assert!(!rendered.contains("srv1"));
    }
}
