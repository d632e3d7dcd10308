//! Core library for cheongyak.
//!
//! Fetches housing subscription (청약) listings and member data from the
//! portal's REST API and derives the values the portal displays:
//!
//! - `timeline`: milestone status (대기 / 진행중 / 종료) for the six schedule steps
//! - `supply`: listing-wide special supply totals
//! - `deadline`: D-day countdown for the reception period
//! - `price`: price rows and the real-transaction chart series
//! - `region`: interest region parsing and the add-region form state
//! - `detail`: the assembled detail page view model
//!
//! All derivations are pure functions over already-fetched data.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod deadline;
pub mod detail;
pub mod models;
pub mod price;
pub mod region;
pub mod supply;
pub mod timeline;
pub mod utils;

pub use api::{ApiClient, ApiError, DetailPage};
pub use config::Config;
pub use deadline::Deadline;
pub use detail::{DetailTab, LikeAction, SubscriptionDetailView};
pub use region::{InterestRegion, RegionForm};
pub use supply::{aggregate, SupplySummary};
pub use timeline::{build_schedule, classify, Milestone, MilestoneStatus};
