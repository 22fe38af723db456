//! Shopify Admin API integration.
//!
//! This crate owns every conversation with the commerce platform:
//! - `client` - typed Admin REST client with tagged failure modes
//! - `rest` - wire payload envelopes and their domain-record conversions
//! - `mock` - deterministic synthetic data for degraded mode
//! - `oauth` - authorization URL construction and code-for-token exchange
//! - `resolve` - the `DataSource` implementation that tries the live API and
//!   substitutes mock data on any failure
//!
//! # Degradation Principle
//!
//! Transport, credential, and decode failures never leave this crate as
//! errors. The `Resolver` converts all of them into mock-origin result sets
//! so the analysis pipeline always produces an answer.

pub mod client;
pub mod mock;
pub mod oauth;
pub mod resolve;
pub mod rest;

pub use client::{AdminClient, ClientError};
pub use resolve::Resolver;
