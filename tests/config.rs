// ABOUTME: Integration tests for configuration parsing and validation.
// ABOUTME: Tests YAML parsing, env var interpolation, site lookup and step blocks.

use std::fs;
use std::time::Duration;
use ucdeploy::config::*;
use ucdeploy::error::Error;

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let yaml = r#"
sites:
  - https://ucd.example.com:8443/
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.sites.len(), 1);
        let site = config.site(None).unwrap();
        assert_eq!(site.display_name(), "https://ucd.example.com:8443");
        assert!(config.publish.component.is_none());
        assert!(config.publish.deploy.is_none());
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
sites:
  - profile_name: prod
    url: https://ucd.example.com:8443
    user: admin
    password: secret
    trust_all_certs: true
    skip_props: true
    always_create_new_client: true

publish:
  site: prod
  alt_user:
    username: deployer
    password: alt
  component:
    name: web
    create_component:
      template: java-app
      application: shop
    delivery:
      push:
        version: "1.0.${BUILD_NUMBER}"
        base_dir: dist
        include: "**/*.jar"
        exclude: "**/test/**"
        extensions: jar, war
        charset: UTF-8
        incremental: true
  deploy:
    application: shop
    environment: DEV
    process: Deploy
    versions: |
      web:1.0.${BUILD_NUMBER}
    only_changed: true
    skip_wait: false
    create_process:
      component: web
    create_snapshot:
      name: rc
      deploy_with_snapshot: true
    snapshot_component:
      snapshot: nightly
    poll_interval: 2s
    timeout: 10m
    poll_retries: 5
"#;
        let config = Config::from_yaml(yaml).unwrap();
        let site = config.publish_site().unwrap();
        assert!(site.trust_all_certs && site.skip_props && site.always_create_new_client);
        assert_eq!(site.password.expose(), "secret");

        let component = config.publish.component.as_ref().unwrap();
        let push = component.delivery.push.as_ref().unwrap();
        assert_eq!(push.include, "**/*.jar");
        assert!(push.incremental);
        assert!(component.delivery.pull.is_none());

        let deploy = config.publish.deploy.as_ref().unwrap();
        assert_eq!(deploy.poll_interval, Duration::from_secs(2));
        assert_eq!(deploy.timeout, Duration::from_secs(600));
        assert_eq!(deploy.poll_retries, 5);
        assert!(deploy.create_snapshot.as_ref().unwrap().deploy_with_snapshot);
    }

    #[test]
    fn deploy_defaults() {
        let yaml = r#"
sites:
  - https://ucd.example.com
publish:
  deploy:
    application: shop
    environment: DEV
    process: Deploy
"#;
        let config = Config::from_yaml(yaml).unwrap();
        let deploy = config.publish.deploy.unwrap();
        assert_eq!(deploy.poll_interval, Duration::from_secs(5));
        assert_eq!(deploy.timeout, Duration::from_secs(3600));
        assert_eq!(deploy.poll_retries, 3);
        assert!(!deploy.skip_wait);
        assert!(deploy.create_process.is_none());
    }

    #[test]
    fn push_include_defaults_to_everything() {
        let yaml = r#"
sites:
  - https://ucd.example.com
publish:
  component:
    name: web
    delivery:
      push:
        version: "1.0"
"#;
        let config = Config::from_yaml(yaml).unwrap();
        let push = config.publish.component.unwrap().delivery.push.unwrap();
        assert_eq!(push.include, "**/*");
    }
}

mod validation {
    use super::*;

    #[test]
    fn empty_site_list_is_rejected() {
        assert!(Config::from_yaml("sites: []\n").is_err());
    }

    #[test]
    fn malformed_url_is_rejected() {
        let err = Config::from_yaml("sites:\n  - not a url\n").unwrap_err();
        assert!(err.to_string().contains("malformed"), "{err}");
    }

    #[test]
    fn unsupported_scheme_is_rejected() {
        assert!(Config::from_yaml("sites:\n  - ftp://ucd.example.com\n").is_err());
    }

    #[test]
    fn backslashes_and_trailing_slashes_are_normalised() {
        let yaml = r#"
sites:
  - profile_name: win
    url: 'https://ucd.example.com\ucd\\'
"#;
        let config = Config::from_yaml(yaml).unwrap();
        let site = config.site(Some("win")).unwrap();
        assert_eq!(site.url.as_str(), "https://ucd.example.com/ucd");
    }

    #[test]
    fn unknown_site_name() {
        let config = Config::from_yaml("sites:\n  - https://ucd.example.com\n").unwrap();
        match config.site(Some("staging")) {
            Err(Error::UnknownSite(name)) => assert_eq!(name, "staging"),
            other => panic!("expected unknown site, got {other:?}"),
        }
    }

    #[test]
    fn sites_are_looked_up_by_display_name() {
        let yaml = r#"
sites:
  - profile_name: dev
    url: https://dev.example.com
  - https://prod.example.com
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.site(None).unwrap().display_name(), "dev");
        assert_eq!(
            config.site(Some("https://prod.example.com")).unwrap().url.as_str(),
            "https://prod.example.com"
        );
    }
}

mod env_values {
    use super::*;

    const YAML: &str = r#"
sites:
  - profile_name: prod
    url: https://ucd.example.com
    user: admin
    password:
      env: UCDEPLOY_TEST_PASSWORD
  - profile_name: fallback
    url: https://ucd.example.com
    password:
      env: UCDEPLOY_TEST_UNSET
      default: from-default
"#;

    #[test]
    fn password_comes_from_environment() {
        temp_env::with_var("UCDEPLOY_TEST_PASSWORD", Some("from-env"), || {
            let config = Config::from_yaml(YAML).unwrap();
            let site = config.site(Some("prod")).unwrap();
            assert_eq!(site.password.expose(), "from-env");
            assert!(!format!("{site:?}").contains("from-env"));
        });
    }

    #[test]
    fn missing_variable_is_an_error() {
        temp_env::with_var_unset("UCDEPLOY_TEST_PASSWORD", || {
            let config = Config::from_yaml(YAML).unwrap();
            match config.site(Some("prod")) {
                Err(Error::MissingEnvVar(var)) => assert_eq!(var, "UCDEPLOY_TEST_PASSWORD"),
                other => panic!("expected missing env var, got {other:?}"),
            }
        });
    }

    #[test]
    fn default_used_when_unset() {
        temp_env::with_var_unset("UCDEPLOY_TEST_UNSET", || {
            let config = Config::from_yaml(YAML).unwrap();
            let site = config.site(Some("fallback")).unwrap();
            assert_eq!(site.password.expose(), "from-default");
        });
    }
}

mod discovery {
    use super::*;

    #[test]
    fn finds_alternate_file_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".ucdeploy")).unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME_DIR),
            "sites:\n  - https://ucd.example.com\n",
        )
        .unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.sites.len(), 1);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::discover(dir.path()),
            Err(Error::ConfigNotFound(_))
        ));
    }

    #[test]
    fn init_then_discover() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), Some("https://ucd.internal:8443/"), false).unwrap();

        let content = fs::read_to_string(dir.path().join(CONFIG_FILENAME)).unwrap();
        assert!(content.contains("url: https://ucd.internal:8443\n"));
        assert!(content.contains("${BUILD_NUMBER}"));
        assert!(Config::discover(dir.path()).is_ok());

        assert!(matches!(
            init_config(dir.path(), None, false),
            Err(Error::AlreadyExists(_))
        ));
        init_config(dir.path(), None, true).unwrap();
    }
}
