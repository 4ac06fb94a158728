// ABOUTME: Executes publish work on the deploy server: versions, provisioning, deployments.
// ABOUTME: Deployments move through type states so steps cannot run out of order.

mod deployment;
mod error;
mod executor;
mod outcome;
mod provisioning;
mod request;
mod state;
mod transitions;

pub use deployment::Deployment;
pub use error::{DeployError, PollError};
pub use executor::{CreatedVersion, create_version};
pub use outcome::{DeploymentOutcome, OutcomeState, RemoteState};
pub use provisioning::{
    ProvisioningPlan, ProvisioningStep, apply_provisioning, build_provisioning_plan,
};
pub use request::{DeploymentRequest, PollSettings, build_deployment_request};
pub use state::{Planned, Provisioned, Triggered};
pub use transitions::trigger_deployment;
