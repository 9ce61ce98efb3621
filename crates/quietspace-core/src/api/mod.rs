//! HTTP clients for the portfolio content backend and the Codeforces API.
//!
//! `ApiClient` fetches JSON arrays and Markdown documents from the content
//! backend (or through a proxy). `CodeforcesClient` talks to the public
//! Codeforces API for the stats dashboard.

pub mod client;
pub mod codeforces;
pub mod error;

pub use client::ApiClient;
pub use codeforces::CodeforcesClient;
pub use error::{AttemptFailure, LoadError};
