// ABOUTME: Per-site connection registry shared by concurrent invocations.
// ABOUTME: One cached handle per site profile, guarded per site by its own mutex.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use super::connection::{ConnectionHandle, Connector, HandleId, HttpConnector};
use super::credentials::{CredentialOverride, resolve};
use super::ClientError;
use crate::config::SiteProfile;
use crate::types::Secret;

/// The credential triple a cached handle was built for.
#[derive(PartialEq, Eq)]
struct CredentialKey {
    user: String,
    password: Secret,
    trust_all_certs: bool,
}

impl CredentialKey {
    fn for_site(site: &SiteProfile) -> Self {
        Self {
            user: site.user.clone(),
            password: site.password.clone(),
            trust_all_certs: site.trust_all_certs,
        }
    }
}

struct CachedConnection {
    key: CredentialKey,
    handle: ConnectionHandle,
}

type Slot = Arc<Mutex<Option<CachedConnection>>>;

/// Keyed registry of long-lived connections, one per site profile.
pub struct ConnectionCache {
    connector: Arc<dyn Connector>,
    slots: Mutex<HashMap<String, Slot>>,
}

impl std::fmt::Debug for ConnectionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionCache")
            .field("sites", &self.slots.lock().len())
            .finish_non_exhaustive()
    }
}

impl ConnectionCache {
    pub fn new(connector: impl Connector + 'static) -> Self {
        Self {
            connector: Arc::new(connector),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Process-wide cache backed by the HTTP connector, created on first use.
    pub fn global() -> Arc<ConnectionCache> {
        static GLOBAL: OnceLock<Arc<ConnectionCache>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| Arc::new(ConnectionCache::new(HttpConnector::default())))
            .clone()
    }

    fn slot(&self, site: &SiteProfile) -> Slot {
        self.slots
            .lock()
            .entry(site.display_name().to_string())
            .or_default()
            .clone()
    }

    /// Cached handle for the site, built on first use.
    ///
    /// Sites marked `always_create_new_client` get a fresh handle every time and
    /// leave the cache untouched. A cached handle built for different
    /// credentials is replaced.
    pub fn get_connection(&self, site: &SiteProfile) -> Result<ConnectionHandle, ClientError> {
        if site.always_create_new_client {
            let handle = self.connector.connect(site, &site.user, &site.password)?;
            tracing::debug!(
                site = site.display_name(),
                handle = %handle.id(),
                "created new client"
            );
            return Ok(handle);
        }

        let slot = self.slot(site);
        // Held across construction so concurrent callers wait for one build.
        let mut cached = slot.lock();
        let key = CredentialKey::for_site(site);

        if let Some(existing) = cached.as_ref() {
            if existing.key == key {
                tracing::debug!(
                    site = site.display_name(),
                    handle = %existing.handle.id(),
                    "reusing cached client"
                );
                return Ok(existing.handle.clone());
            }
            tracing::debug!(
                site = site.display_name(),
                "site credentials changed, replacing cached client"
            );
        }

        let handle = self.connector.connect(site, &site.user, &site.password)?;
        tracing::debug!(site = site.display_name(), handle = %handle.id(), "cached new client");
        *cached = Some(CachedConnection {
            key,
            handle: handle.clone(),
        });
        Ok(handle)
    }

    /// Private, uncached handle bound to the given credentials.
    pub fn get_temporary_connection(
        &self,
        site: &SiteProfile,
        username: &str,
        password: &Secret,
    ) -> Result<ConnectionHandle, ClientError> {
        let handle = self.connector.connect(site, username, password)?;
        tracing::debug!(
            site = site.display_name(),
            handle = %handle.id(),
            "created temporary client"
        );
        Ok(handle)
    }

    /// Handle for one invocation: temporary when an override is present.
    pub fn connection_for(
        &self,
        site: &SiteProfile,
        over: Option<&CredentialOverride>,
    ) -> Result<ConnectionHandle, ClientError> {
        let creds = resolve(site, over);
        if creds.use_override {
            self.get_temporary_connection(site, &creds.username, &creds.password)
        } else {
            self.get_connection(site)
        }
    }

    /// Id of the currently cached handle, if any.
    pub fn cached(&self, site: &SiteProfile) -> Option<HandleId> {
        let slot = self.slots.lock().get(site.display_name()).cloned()?;
        let cached = slot.lock();
        cached.as_ref().map(|c| c.handle.id())
    }

    /// Forget the cached handle, e.g. after the site profile was edited.
    pub fn invalidate(&self, site: &SiteProfile) -> bool {
        self.slots.lock().remove(site.display_name()).is_some()
    }

    /// Probe the site's state endpoint with the cached connection.
    pub async fn verify_connection(&self, site: &SiteProfile) -> Result<(), ClientError> {
        let handle = self.get_connection(site)?;
        handle.api().check_state().await
    }
}
