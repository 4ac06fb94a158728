// ABOUTME: Publish command implementation.
// ABOUTME: Builds the invocation context from the process and reports the outcome.

use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use ucdeploy::build::{BuildContext, BuildEnv, Provenance, UpstreamResult};
use ucdeploy::config::Config;
use ucdeploy::deploy::CreatedVersion;
use ucdeploy::error::Result;
use ucdeploy::output::Output;
use ucdeploy::publish::{PublishReport, Publisher};

pub struct PublishArgs {
    pub workspace: PathBuf,
    pub provenance: Provenance,
    pub upstream: UpstreamResult,
}

/// Run the configured publish step once.
pub async fn publish(
    config: Config,
    args: PublishArgs,
    cancel: CancellationToken,
    mut output: Output,
) -> Result<()> {
    output.start_timer();
    let build = BuildContext {
        upstream: args.upstream,
        env: BuildEnv::from_process(),
        provenance: args.provenance,
        workspace: args.workspace,
    };

    let site = config
        .publish
        .site
        .clone()
        .unwrap_or_else(|| config.sites.first().display_name().to_string());
    output.progress(&format!("Publishing to {site}"));

    let publisher = Publisher::new(config).cancellation(cancel);
    match publisher.perform(&build).await? {
        Some(report) => {
            print_report(&report, &output);
            output.result(&report);
            output.success("Publish complete");
        }
        None => output.success(&format!(
            "Skipped: upstream build result is {}",
            build.upstream
        )),
    }
    Ok(())
}

fn print_report(report: &PublishReport, output: &Output) {
    for warning in &report.warnings {
        output.warning(warning);
    }
    if let Some(id) = report.version.as_ref().and_then(CreatedVersion::created_component) {
        output.progress(&format!("  ✓ Created component ({id})"));
    }
    match &report.version {
        Some(CreatedVersion::Pushed {
            component,
            version,
            files,
            ..
        }) => output.progress(&format!(
            "  ✓ Created {component} {version} ({} file(s))",
            files.len()
        )),
        Some(CreatedVersion::Imported { component, .. }) => {
            output.progress(&format!("  ✓ Requested version import for {component}"))
        }
        None => {}
    }
    if let Some(outcome) = &report.deployment {
        output.progress(&format!(
            "  ✓ Deployment {} {}",
            outcome.request_id, outcome.state
        ));
    }
}
