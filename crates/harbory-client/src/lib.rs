//! Typed asynchronous client for the Harbory container dashboard backend.
//!
//! Every call goes through one pipeline that attaches the session credential,
//! classifies the HTTP outcome and normalizes the body into an
//! [`ApiResponse`]. Callers branch on `status`; nothing is returned as `Err`.

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod accessors;
pub mod client;
pub mod models;

pub use accessors::{Auth, Containers, Health, Images, Networks, Nodes, System, Volumes};
pub use client::{HarboryClient, HarboryClientBuilder, RequestOptions, UnauthorizedHandler};
pub use harbory_core::{
    ApiConfig, ApiResponse, CredentialStore, EndpointResolver, EnvelopePolicy, ErrorKind,
    FileCredentialStore, MemoryCredentialStore, PageOrigin,
};
pub use models::{
    ComponentCheck, ContainerDetails, ContainerState, ContainerSummary, HealthReport,
    ImageDetails, ImagePruneReport, ImageSummary, LoginResponse, MessageResponse, Network,
    NetworkEndpoint, Node, Port, SystemStats, Volume, VolumeList,
};

/// Convenient result alias sharing the `harbory-core` error type.
pub type Result<T> = harbory_core::Result<T>;
