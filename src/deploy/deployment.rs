// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: The triggered state carries the server's request id.

use super::request::DeploymentRequest;
use super::state::{Planned, Triggered};
use crate::types::RequestId;

/// A deployment in progress, parameterized by its current state.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) request: DeploymentRequest,
    pub(crate) state: S,
}

impl Deployment<Planned> {
    pub fn new(request: DeploymentRequest) -> Self {
        Deployment {
            request,
            state: Planned,
        }
    }
}

impl<S> Deployment<S> {
    pub fn request(&self) -> &DeploymentRequest {
        &self.request
    }

    /// Move to the next state, keeping the request.
    pub(crate) fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            request: self.request,
            state,
        }
    }
}

impl Deployment<Triggered> {
    pub fn request_id(&self) -> &RequestId {
        self.state.request_id()
    }
}
