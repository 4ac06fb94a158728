// ABOUTME: Opaque connection handles and the connector that builds them.
// ABOUTME: Handles carry a process-local id for identity checks and log tracing.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::api::DeployApi;
use super::rest::{DEFAULT_TIMEOUT, RestClient};
use super::ClientError;
use crate::config::SiteProfile;
use crate::types::Secret;

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque reference to a handle; safe to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId(u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A reusable client bound to one (user, password, trust) triple.
#[derive(Clone)]
pub struct ConnectionHandle {
    id: HandleId,
    api: Arc<dyn DeployApi>,
}

impl ConnectionHandle {
    pub fn new(api: Arc<dyn DeployApi>) -> Self {
        Self {
            id: HandleId(NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed)),
            api,
        }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn api(&self) -> &dyn DeployApi {
        self.api.as_ref()
    }

    /// True when both refer to the same underlying client.
    pub fn same_as(&self, other: &ConnectionHandle) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Builds connection handles for a site.
pub trait Connector: Send + Sync {
    fn connect(
        &self,
        site: &SiteProfile,
        user: &str,
        password: &Secret,
    ) -> Result<ConnectionHandle, ClientError>;
}

/// Connector producing reqwest-backed REST clients.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    timeout: Duration,
}

impl Default for HttpConnector {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl HttpConnector {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Connector for HttpConnector {
    fn connect(
        &self,
        site: &SiteProfile,
        user: &str,
        password: &Secret,
    ) -> Result<ConnectionHandle, ClientError> {
        let client = RestClient::new(
            site.url.clone(),
            user,
            password.clone(),
            site.trust_all_certs,
            self.timeout,
        )?;
        Ok(ConnectionHandle::new(Arc::new(client)))
    }
}
