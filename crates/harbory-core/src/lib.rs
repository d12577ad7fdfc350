//! # harbory-core
//!
//! Core types and utilities for talking to a Harbory backend.
//!
//! This crate holds everything the HTTP client builds on but that does not
//! itself perform I/O over the network.
//!
//! ## Modules
//!
//! - [`error`] - Error type, stable error codes and the closed [`ErrorKind`] set
//! - [`response`] - The canonical `{status, data?, error?}` envelope and normalization
//! - [`config`] - Endpoint resolution and validated client configuration
//! - [`credentials`] - Session credential storage abstraction
//! - [`ids`] - Strongly-typed identifiers for Docker resources

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod credentials;
pub mod error;
pub mod ids;
pub mod response;

// Re-export commonly used types
pub use config::{ApiConfig, EndpointResolver, PageOrigin};
pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use error::{Error, ErrorKind, Result};
pub use response::{ApiResponse, EnvelopePolicy};
