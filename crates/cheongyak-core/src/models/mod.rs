//! Data models for the subscription API.
//!
//! This module contains the structures used to represent API payloads:
//!
//! - `SubscriptionDetail` with its `PriceInfo`, `SupplyTarget` and
//!   `SupplyTargetRecord` rows
//! - `Infra`, `School`, `Station`: nearby infrastructure
//! - `PriceSummary`: monthly real-transaction statistics
//! - `Mypage`: member profile with interest regions
//! - `ApiResponse`: the `{ data, message }` envelope

pub mod de;
pub mod deal;
pub mod infra;
pub mod member;
pub mod response;
pub mod subscription;

pub use deal::PriceSummary;
pub use infra::{Infra, School, SchoolOwnership, Station};
pub use member::Mypage;
pub use response::ApiResponse;
pub use subscription::{PriceInfo, SubscriptionDetail, SupplyTarget, SupplyTargetRecord, UNDECIDED};
