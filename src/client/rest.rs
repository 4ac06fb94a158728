// ABOUTME: reqwest-based DeployApi implementation for the deploy server's CLI REST endpoints.
// ABOUTME: Basic auth on every call; status codes are classified into ClientError.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::time::Duration;

use super::ClientError;
use super::api::{
    DeployApi, DeployTarget, NewComponent, NewProcess, NewSnapshot, NewVersion, ProcessRequest,
    RequestStatus, SnapshotMembership, VersionFile, VersionImport,
};
use crate::types::{ComponentId, RequestId, Secret, SiteUrl, VersionId};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// HTTP client bound to one base URL and one set of credentials.
pub struct RestClient {
    base: SiteUrl,
    user: String,
    password: Secret,
    http: reqwest::Client,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base", &self.base)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct Created {
    id: String,
}

#[derive(Deserialize)]
struct RequestCreated {
    #[serde(rename = "requestId")]
    request_id: String,
}

impl RestClient {
    pub fn new(
        base: SiteUrl,
        user: impl Into<String>,
        password: Secret,
        trust_all_certs: bool,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(trust_all_certs)
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Tls(e.to_string()))?;

        Ok(Self {
            base,
            user: user.into(),
            password,
            http,
        })
    }

    /// Build an absolute URL with percent-encoded query parameters.
    fn url(&self, path: &str, query: &[(&str, &str)]) -> String {
        let mut url = self.base.join(path);
        for (i, (name, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.user, Some(self.password.expose()))
    }

    async fn send(&self, builder: RequestBuilder, url: &str) -> Result<Response, ClientError> {
        builder.send().await.map_err(|e| ClientError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// Send and require a 2xx answer.
    async fn call(&self, builder: RequestBuilder, url: &str) -> Result<Response, ClientError> {
        let response = self.send(builder, url).await?;
        check_status(response, url, StatusCode::is_success).await
    }

    async fn call_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        url: &str,
    ) -> Result<T, ClientError> {
        let response = self.call(builder, url).await?;
        response.json::<T>().await.map_err(|e| ClientError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

async fn check_status(
    response: Response,
    url: &str,
    accept: impl Fn(&StatusCode) -> bool,
) -> Result<Response, ClientError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::Unauthorized {
            url: url.to_string(),
        });
    }
    if !accept(&status) {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            url: url.to_string(),
            body,
        });
    }
    Ok(response)
}

fn versions_json(versions: &[super::ComponentVersion]) -> Vec<Value> {
    versions
        .iter()
        .map(|v| json!({ "component": v.component, "version": v.version }))
        .collect()
}

fn version_type(incremental: bool) -> &'static str {
    if incremental { "INCREMENTAL" } else { "FULL" }
}

#[async_trait]
impl DeployApi for RestClient {
    async fn check_state(&self) -> Result<(), ClientError> {
        let url = self.url("rest/state", &[]);
        let response = self.send(self.request(Method::GET, &url), &url).await?;
        let response = check_status(response, &url, |s| *s == StatusCode::OK).await?;
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(%url, bytes = body.len(), "state endpoint answered");
        Ok(())
    }

    async fn component_exists(&self, name: &str) -> Result<bool, ClientError> {
        let url = self.url("cli/component/info", &[("component", name)]);
        match self.call(self.request(Method::GET, &url), &url).await {
            Ok(_) => Ok(true),
            Err(ClientError::Status { status, .. }) if status == 404 || status == 400 => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create_component(&self, component: &NewComponent) -> Result<ComponentId, ClientError> {
        let url = self.url("cli/component/create", &[]);
        let body = json!({
            "name": component.name,
            "description": component.description,
            "templateName": component.template,
            "importAutomatically": false,
            "useVfs": true,
            "defaultVersionType": "FULL",
            "properties": {},
        });
        let created: Created = self
            .call_json(self.request(Method::PUT, &url).json(&body), &url)
            .await?;
        Ok(ComponentId::new(created.id))
    }

    async fn add_component_to_application(
        &self,
        component: &str,
        application: &str,
    ) -> Result<(), ClientError> {
        let url = self.url(
            "cli/application/addComponentToApp",
            &[("component", component), ("application", application)],
        );
        self.call(self.request(Method::PUT, &url), &url).await?;
        Ok(())
    }

    async fn create_version(&self, version: &NewVersion) -> Result<VersionId, ClientError> {
        let url = self.url(
            "cli/version/createVersion",
            &[
                ("component", version.component.as_str()),
                ("name", version.name.as_str()),
                ("description", version.description.as_str()),
                ("type", version_type(version.incremental)),
            ],
        );
        let created: Created = self.call_json(self.request(Method::POST, &url), &url).await?;
        Ok(VersionId::new(created.id))
    }

    async fn upload_file(
        &self,
        version: &VersionId,
        file: &VersionFile,
    ) -> Result<(), ClientError> {
        let mut query = vec![("version", version.as_str()), ("path", file.path.as_str())];
        if let Some(charset) = &file.charset {
            query.push(("charset", charset.as_str()));
        }
        let url = self.url("cli/version/addFile", &query);
        let builder = self
            .request(Method::PUT, &url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(file.content.clone());
        self.call(builder, &url).await?;
        Ok(())
    }

    async fn set_version_property(
        &self,
        component: &str,
        version: &str,
        name: &str,
        value: &str,
    ) -> Result<(), ClientError> {
        let url = self.url(
            "cli/version/versionProperties",
            &[
                ("component", component),
                ("version", version),
                ("name", name),
                ("value", value),
            ],
        );
        self.call(self.request(Method::PUT, &url), &url).await?;
        Ok(())
    }

    async fn add_version_link(
        &self,
        component: &str,
        version: &str,
        title: &str,
        link: &str,
    ) -> Result<(), ClientError> {
        let url = self.url(
            "cli/version/addLink",
            &[
                ("component", component),
                ("version", version),
                ("linkName", title),
                ("link", link),
            ],
        );
        self.call(self.request(Method::PUT, &url), &url).await?;
        Ok(())
    }

    async fn import_versions(&self, import: &VersionImport) -> Result<(), ClientError> {
        let url = self.url("cli/component/integrate", &[]);
        let mut body = json!({
            "component": import.component,
            "properties": import.source_properties,
            "versionProperties": import.version_properties,
            "versionType": version_type(import.incremental),
        });
        if !import.source_type.is_empty() {
            body["sourceConfigPlugin"] = Value::from(import.source_type.clone());
        }
        self.call(self.request(Method::PUT, &url).json(&body), &url).await?;
        Ok(())
    }

    async fn create_process(&self, process: &NewProcess) -> Result<(), ClientError> {
        let url = self.url("cli/applicationProcess/create", &[]);
        let body = json!({
            "application": process.application,
            "name": process.name,
            "description": format!("Installs {}", process.component),
            "inventoryManagementType": "AUTOMATIC",
            "offlineAgentHandling": "PRE_EXECUTION_CHECK",
            "rootActivity": {
                "type": "graph",
                "children": [{
                    "type": "componentEnvironmentIterator",
                    "componentName": process.component,
                    "children": [{
                        "type": "inventoryVersionDiff",
                        "componentName": process.component,
                        "children": [{
                            "type": "componentProcess",
                            "componentName": process.component,
                            "componentProcessName": "Deploy",
                        }],
                    }],
                }],
            },
        });
        self.call(self.request(Method::PUT, &url).json(&body), &url).await?;
        Ok(())
    }

    async fn create_snapshot(&self, snapshot: &NewSnapshot) -> Result<(), ClientError> {
        let url = match &snapshot.from_environment {
            Some(environment) => self.url(
                "cli/snapshot/createSnapshotOfEnvironment",
                &[
                    ("application", snapshot.application.as_str()),
                    ("environment", environment.as_str()),
                    ("name", snapshot.name.as_str()),
                    ("description", snapshot.description.as_str()),
                ],
            ),
            None => self.url("cli/snapshot/createSnapshot", &[]),
        };
        let body = json!({
            "application": snapshot.application,
            "name": snapshot.name,
            "description": snapshot.description,
            "versions": versions_json(&snapshot.versions),
            "updateExisting": snapshot.update_existing,
        });
        self.call(self.request(Method::PUT, &url).json(&body), &url).await?;
        Ok(())
    }

    async fn add_versions_to_snapshot(
        &self,
        membership: &SnapshotMembership,
    ) -> Result<(), ClientError> {
        for version in &membership.versions {
            let url = self.url(
                "cli/snapshot/addVersionToSnapshot",
                &[
                    ("application", membership.application.as_str()),
                    ("snapshot", membership.snapshot.as_str()),
                    ("component", version.component.as_str()),
                    ("version", version.version.as_str()),
                ],
            );
            self.call(self.request(Method::PUT, &url), &url).await?;
        }
        Ok(())
    }

    async fn request_process(&self, request: &ProcessRequest) -> Result<RequestId, ClientError> {
        let url = self.url("cli/applicationProcessRequest/request", &[]);
        let properties: &BTreeMap<String, String> = &request.properties;
        let mut body = json!({
            "application": request.application,
            "applicationProcess": request.process,
            "environment": request.environment,
            "onlyChanged": request.only_changed,
            "description": request.description,
            "properties": properties,
        });
        match &request.target {
            DeployTarget::Snapshot(name) => body["snapshot"] = Value::from(name.clone()),
            DeployTarget::Versions(versions) => {
                body["versions"] = Value::from(versions_json(versions))
            }
        }
        let created: RequestCreated = self
            .call_json(self.request(Method::PUT, &url).json(&body), &url)
            .await?;
        Ok(RequestId::new(created.request_id))
    }

    async fn request_status(&self, id: &RequestId) -> Result<RequestStatus, ClientError> {
        let url = self.url(
            "cli/applicationProcessRequest/requestStatus",
            &[("request", id.as_str())],
        );
        self.call_json(self.request(Method::GET, &url), &url).await
    }
}
