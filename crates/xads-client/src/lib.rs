//! X Ads API client.
//!
//! Everything a command needs to talk to the Ads API goes through
//! [`AdsClient`]: each attempt is freshly OAuth-signed, retried under an
//! explicit [`RetryPolicy`], paginated through server cursors, and, for
//! media, driven through the chunked upload protocol. Command handlers
//! call the typed resource methods and never touch signing or retry logic
//! directly.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod client;
mod config;
mod error;
mod media;
mod paginate;
mod resources;
mod response;
mod types;

pub use client::AdsClient;
pub use config::{AdsConfig, RateLimitInfo, RetryPolicy};
pub use error::{AdsError, AdsResult};
pub use media::{MediaCategory, UploadedMedia};
pub use resources::{
    CampaignParams, CampaignUpdate, CardUpdate, LineItemParams, LineItemUpdate, StatsQuery,
};
pub use response::{ApiErrorItem, ApiResponse, ErrorCode};
pub use types::*;
