// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Osiris Fetch
//!
//! HTTP plumbing for the Osiris portal client.
//!
//! ## Transport
//!
//! - [`Transport`] - The seam every portal request goes through
//! - [`HttpRequest`], [`HttpResponse`] - Plain request/response values
//! - [`host::http::HttpTransport`] - reqwest-backed transport that follows
//!   redirects itself so cookies from every hop of a redirect chain are seen
//!
//! ## Sign-in helpers
//!
//! - [`CookieJar`] - Cookies collected across the requests of one sign-in
//! - [`extract`] - Marker-based extraction of values from HTML and URLs
//!
//! ## Example
//!
//! ```ignore
//! use osiris_fetch::{HttpRequest, HttpTransport, Transport};
//!
//! let transport = HttpTransport::new()?;
//! let response = transport
//!     .send(HttpRequest::get("https://ru.osiris-student.nl/").query("limit", "10"))
//!     .await?;
//! println!("{}", response.status);
//! ```

pub mod cookies;
pub mod error;
pub mod extract;
pub mod host;
pub mod transport;

pub use cookies::{Cookie, CookieJar};
pub use error::{ExtractError, FetchError};
pub use extract::Extraction;
pub use host::http::HttpTransport;
pub use transport::{Body, HttpRequest, HttpResponse, Method, Transport, loggable_url};
