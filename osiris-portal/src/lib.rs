// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Osiris Portal
//!
//! Talks to the Radboud Osiris student portal.
//!
//! - [`auth`] - The four-hop SAML/OAuth sign-in that yields a bearer token
//! - [`client::PortalClient`] - Token-gated access to the student API
//! - [`search::CourseQuery`] - Course search request bodies
//! - [`endpoints`] - Fixed URLs of the deployment
//!
//! ## Usage
//!
//! ```ignore
//! use osiris_core::Credentials;
//! use osiris_fetch::HttpTransport;
//! use osiris_portal::{PortalClient, auth::sign_in};
//!
//! let transport = HttpTransport::new()?;
//! let token = sign_in(&transport, &Credentials::new("s1234567", password)).await?;
//!
//! let client = PortalClient::new(transport, Some(token));
//! for grade in client.grades(100).await? {
//!     println!("{} {:?}", grade.course_code, grade.result);
//! }
//! ```

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod search;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{HandshakeFailure, HandshakeState, HandshakeStep, sign_in};
pub use client::{PortalClient, RegistrationOutcome};
pub use error::PortalError;
pub use search::CourseQuery;
