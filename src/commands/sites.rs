// ABOUTME: Sites command implementation.
// ABOUTME: Lists configured site profiles without resolving or printing secrets.

use ucdeploy::config::Config;

pub fn sites(config: &Config) {
    for site in config.sites.iter() {
        let mut flags = Vec::new();
        if site.trust_all_certs {
            flags.push("trust-all-certs");
        }
        if site.skip_props {
            flags.push("skip-props");
        }
        if site.always_create_new_client {
            flags.push("always-new-client");
        }
        if flags.is_empty() {
            println!("{}\t{}", site.display_name(), site.url);
        } else {
            println!("{}\t{}\t[{}]", site.display_name(), site.url, flags.join(", "));
        }
    }
}
