// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Provisioning must precede the trigger, which must precede polling.

use crate::types::RequestId;

/// Request resolved, nothing sent yet.
/// Available actions: `provision()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Planned;

/// Supporting objects exist on the server.
/// Available actions: `trigger()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Provisioned;

/// Application process request accepted by the server.
/// Available actions: `await_outcome()`
#[derive(Debug, Clone)]
pub struct Triggered {
    pub(crate) request_id: RequestId,
}

impl Triggered {
    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }
}
