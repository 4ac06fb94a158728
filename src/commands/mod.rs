// ABOUTME: Command module aggregator for the ucdeploy CLI.
// ABOUTME: Re-exports publish, verify and sites command handlers.

mod publish;
mod sites;
mod verify;

pub use publish::{PublishArgs, publish};
pub use sites::sites;
pub use verify::verify;
