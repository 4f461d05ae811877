//! HTTP client module
//!
//! Client for the Dynatrace log ingest API.
//!
//! # Features
//!
//! - **Api-Token auth**: `Authorization: Api-Token {token}` on every request
//! - **Reply classification**: 204, 2xx with a success body, and failures
//! - **Transport seam**: [`LogIngest`] lets the uploader run against any sink

mod client;

pub use client::{
    IngestClient, IngestClientConfig, IngestResponse, LogIngest, INGEST_PATH, NO_CONTENT_MESSAGE,
};
