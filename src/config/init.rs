// ABOUTME: Config scaffolding for new build jobs.
// ABOUTME: Creates a commented ucdeploy.yml template.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::SiteUrl;

use super::CONFIG_FILENAME;

pub fn init_config(dir: &Path, url: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let url = SiteUrl::parse(url.unwrap_or("https://ucd.example.com:8443"))?;

    std::fs::write(&config_path, template_yaml(&url))?;

    Ok(())
}

fn template_yaml(url: &SiteUrl) -> String {
    format!(
        r#"sites:
  - profile_name: default
    url: {url}
    user: admin
    password:
      env: UCD_PASSWORD
    # Accept self-signed server certificates
    # trust_all_certs: true
    # Build a new HTTP client for every run instead of reusing one
    # always_create_new_client: true

publish:
  site: default
  component:
    name: my-component
    delivery:
      push:
        version: "1.0.${{BUILD_NUMBER}}"
        base_dir: dist
        include: "**/*"
  deploy:
    application: my-application
    environment: DEV
    process: Deploy
    versions: "my-component:1.0.${{BUILD_NUMBER}}"
"#
    )
}
