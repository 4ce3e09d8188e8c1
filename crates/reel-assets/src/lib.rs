//! Generative asset client boundary.
//!
//! This crate is the only place external generative services are
//! consulted. The pipeline talks to an [`AssetClient`] and never sees
//! provider-specific protocol details. Two implementations ship:
//!
//! - [`HttpAssetClient`] for HTTP narration/image endpoints
//! - [`MockAssetClient`] for deterministic offline generation, selected
//!   when no endpoints are configured

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod placeholder;
pub mod wav;

pub use client::{AssetClient, ImageRequest, NarrationRequest};
pub use config::AssetConfig;
pub use error::{AssetError, AssetResult};
pub use http::HttpAssetClient;
pub use mock::MockAssetClient;
pub use placeholder::placeholder_image;
