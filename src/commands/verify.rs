// ABOUTME: Verify command implementation.
// ABOUTME: Probes a site's state endpoint with its configured credentials.

use ucdeploy::client::ConnectionCache;
use ucdeploy::config::Config;
use ucdeploy::error::Result;

pub async fn verify(config: &Config, site: Option<&str>) -> Result<()> {
    let profile = config.site(site)?;
    println!("Checking {} ({})...", profile.display_name(), profile.url);
    ConnectionCache::global().verify_connection(&profile).await?;
    println!("  ✓ Connected as {}", profile.user);
    Ok(())
}
