//! REST API client module for the subscription portal backend.
//!
//! This module provides the `ApiClient` for fetching subscription listings,
//! nearby infrastructure, deal price summaries and member data, and for the
//! member actions (like/unlike, interest region add/remove).
//!
//! Member endpoints use bearer token authentication.

pub mod client;
pub mod error;

pub use client::{ApiClient, DetailPage};
pub use error::ApiError;
