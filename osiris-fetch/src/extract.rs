//! Marker-based extraction of values from response bodies and URLs.
//!
//! The sign-in pages carry their state in two places: query parameters of a
//! redirect target (`AuthState=...&`, `access_token=...&`) and hidden form
//! inputs (`<input type="hidden" name="SAMLResponse" value="..."/>`). An
//! [`Extraction`] names the marker to look for, an optional opener that must
//! follow it, and the character that ends the value.

use percent_encoding::percent_decode_str;

use crate::error::ExtractError;

/// How to find one value in a text blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extraction {
    /// Field name used in errors.
    pub field: &'static str,
    /// Literal that precedes the value.
    pub marker: &'static str,
    /// Literal between the marker and the value, searched within the same tag.
    pub opener: Option<&'static str>,
    /// Character that ends the value.
    pub delimiter: char,
    /// Whether the value may run to the end of the input.
    pub allow_end: bool,
}

/// `AuthState` query parameter of the login page URL.
pub const AUTH_STATE: Extraction = Extraction {
    field: "AuthState",
    marker: "AuthState=",
    opener: None,
    delimiter: '&',
    allow_end: true,
};

/// Hidden `SAMLResponse` form input.
pub const SAML_RESPONSE: Extraction = Extraction {
    field: "SAMLResponse",
    marker: "name=\"SAMLResponse\"",
    opener: Some("value=\""),
    delimiter: '"',
    allow_end: false,
};

/// Hidden `RelayState` form input.
pub const RELAY_STATE: Extraction = Extraction {
    field: "RelayState",
    marker: "name=\"RelayState\"",
    opener: Some("value=\""),
    delimiter: '"',
    allow_end: false,
};

/// `access_token` parameter of the final redirect URL.
pub const ACCESS_TOKEN: Extraction = Extraction {
    field: "access_token",
    marker: "access_token=",
    opener: None,
    delimiter: '&',
    allow_end: true,
};

impl Extraction {
    /// Extracts the value from `text`.
    ///
    /// Only the first occurrence of the marker is considered.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker or opener is missing, if the value has
    /// no delimiter and may not run to the end, or if the value is empty.
    pub fn extract<'a>(&self, text: &'a str) -> Result<&'a str, ExtractError> {
        let field = self.field;
        let start = text
            .find(self.marker)
            .ok_or(ExtractError::NotFound { field })?
            + self.marker.len();
        let mut rest = &text[start..];

        if let Some(opener) = self.opener {
            // The opener has to be inside the tag that holds the marker
            let tag = rest.find('>').map_or(rest, |end| &rest[..end]);
            let at = tag.find(opener).ok_or(ExtractError::NotFound { field })?;
            rest = &rest[at + opener.len()..];
        }

        let value = match rest.find(self.delimiter) {
            Some(end) => &rest[..end],
            None if self.allow_end => rest,
            None => return Err(ExtractError::Unterminated { field }),
        };

        if value.is_empty() {
            return Err(ExtractError::Empty { field });
        }
        Ok(value)
    }

    /// Like [`extract`](Self::extract), but returns `None` on any failure.
    pub fn find<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.extract(text).ok()
    }

    /// Extracts the value and percent-decodes it.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`extract`](Self::extract), or
    /// `ExtractError::Decode` if the decoded bytes are not UTF-8.
    pub fn extract_decoded(&self, text: &str) -> Result<String, ExtractError> {
        let raw = self.extract(text)?;
        percent_decode_str(raw)
            .decode_utf8()
            .map(|s| s.into_owned())
            .map_err(|_| ExtractError::Decode { field: self.field })
    }
}
