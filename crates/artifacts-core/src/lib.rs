//! Lifecycle management for a single artifact on an Artifactory-compatible
//! binary store: upload, checksum-based drift detection and removal.

pub mod config;
pub mod logging;

pub mod checksum;
pub mod client;
pub mod resource;
pub mod store;

pub use client::{Checksums, Client, ClientError, Connection};
pub use store::ArtifactStore;
