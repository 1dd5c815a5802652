//! Host implementations of [`Transport`](crate::Transport).
//!
//! - [`http`] - Real network access through reqwest

pub mod http;

#[cfg(test)]
mod http_tests;
