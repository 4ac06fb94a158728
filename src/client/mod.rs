// ABOUTME: Client side of the deploy server: API seam, REST client and connection cache.
// ABOUTME: Credentials resolve per invocation; handles are cached per site profile.

mod api;
mod cache;
mod connection;
mod credentials;
mod error;
mod rest;

pub use api::{
    ComponentVersion, DeployApi, DeployTarget, NewComponent, NewProcess, NewSnapshot, NewVersion,
    ProcessRequest, RequestStatus, SnapshotMembership, VersionFile, VersionImport,
};
pub use cache::ConnectionCache;
pub use connection::{ConnectionHandle, Connector, HandleId, HttpConnector};
pub use credentials::{CredentialOverride, ResolvedCredentials, resolve};
pub use error::ClientError;
pub use rest::{DEFAULT_TIMEOUT, RestClient};
