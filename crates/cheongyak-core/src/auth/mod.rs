//! Authentication module for managing the member session.
//!
//! The portal issues bearer tokens for member endpoints (my page, likes,
//! interest regions). `Session` persists the token to the cache directory
//! and drops it once it expires.

pub mod session;

pub use session::{Session, SessionData};
