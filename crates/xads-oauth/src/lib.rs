//! OAuth 1.0a support for the X Ads CLI.
//!
//! The X Ads API authenticates every request with an OAuth 1.0a
//! HMAC-SHA1 signature. This crate provides the three pieces the rest of
//! the workspace builds on:
//!
//! - [`OAuth1Signer`]: computes the `Authorization` header for a single
//!   request attempt (fresh nonce and timestamp per attempt).
//! - [`AuthFlow`]: the interactive three-legged handshake that turns
//!   consumer credentials into a durable access token pair.
//! - [`CredentialStore`]: flat-file persistence for the resulting
//!   credentials.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod flow;
mod signer;
mod store;

pub use error::{OauthError, OauthResult};
pub use flow::{AuthFlow, AuthFlowConfig, RequestToken};
pub use signer::{percent_encode, OAuth1Signer, SignedRequest};
pub use store::{Credentials, CredentialStore, StoreError};
