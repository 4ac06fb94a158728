// ABOUTME: Creates component versions on the server, by upload (push) or import (pull).
// ABOUTME: Files are selected and read before anything is uploaded.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::DeployError;
use crate::build::Provenance;
use crate::client::{ConnectionHandle, NewComponent, NewVersion, VersionFile, VersionImport};
use crate::delivery::{
    ArtifactFile, CreateComponent, Delivery, PullDelivery, PushDelivery, VersionRequest,
    collect_files,
};
use crate::types::{ComponentId, VersionId};

/// What `create_version` produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "delivery", rename_all = "snake_case")]
pub enum CreatedVersion {
    Pushed {
        component: String,
        version: String,
        id: VersionId,
        /// Uploaded paths, relative to the base directory.
        files: Vec<String>,
        /// Set when this invocation created the component.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        created_component: Option<ComponentId>,
    },
    /// The server imports versions itself; their labels are not known here.
    Imported {
        component: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        created_component: Option<ComponentId>,
    },
}

impl CreatedVersion {
    /// Server id of the component, when this invocation had to create it.
    pub fn created_component(&self) -> Option<&ComponentId> {
        match self {
            CreatedVersion::Pushed {
                created_component, ..
            }
            | CreatedVersion::Imported {
                created_component, ..
            } => created_component.as_ref(),
        }
    }
}

/// Create one component version as described by `request`.
///
/// Relative push directories resolve against `workspace`.
pub async fn create_version(
    request: &VersionRequest,
    conn: &ConnectionHandle,
    provenance: &Provenance,
    workspace: &Path,
) -> Result<CreatedVersion, DeployError> {
    let created_component = match &request.create_component {
        Some(create) => ensure_component(&request.component, create, conn).await?,
        None => None,
    };

    let created = match &request.delivery {
        Delivery::Push(push) => {
            let (id, files) =
                push_version(&request.component, push, conn, provenance, workspace).await?;
            CreatedVersion::Pushed {
                component: request.component.clone(),
                version: push.version.clone(),
                id,
                files,
                created_component,
            }
        }
        Delivery::Pull(pull) => {
            pull_versions(&request.component, pull, conn).await?;
            CreatedVersion::Imported {
                component: request.component.clone(),
                created_component,
            }
        }
    };
    Ok(created)
}

/// Create the component unless it exists; returns the id of a new component.
async fn ensure_component(
    component: &str,
    create: &CreateComponent,
    conn: &ConnectionHandle,
) -> Result<Option<ComponentId>, DeployError> {
    let api = conn.api();
    let exists = api
        .component_exists(component)
        .await
        .map_err(|source| DeployError::ComponentLookup {
            component: component.to_string(),
            source,
        })?;
    if exists {
        tracing::debug!(component, "component already exists");
        return Ok(None);
    }

    tracing::info!(component, template = %create.template, "creating component");
    let id = api
        .create_component(&NewComponent {
            name: component.to_string(),
            description: String::new(),
            template: create.template.clone(),
        })
        .await
        .map_err(|source| DeployError::ComponentCreate {
            component: component.to_string(),
            source,
        })?;
    tracing::info!(component, id = %id, "component created");

    if let Some(application) = &create.application {
        api.add_component_to_application(component, application)
            .await
            .map_err(|source| DeployError::ComponentAttach {
                component: component.to_string(),
                application: application.clone(),
                source,
            })?;
    }
    Ok(Some(id))
}

async fn select_files(
    base: PathBuf,
    push: &PushDelivery,
) -> Result<Vec<ArtifactFile>, DeployError> {
    let filter = push.filter.clone();
    let dir = base.clone();
    tokio::task::spawn_blocking(move || collect_files(&dir, &filter))
        .await
        .map_err(|e| DeployError::Artifacts {
            path: base.clone(),
            source: std::io::Error::other(e),
        })?
        .map_err(|source| DeployError::Artifacts { path: base, source })
}

fn looks_like_text(content: &[u8]) -> bool {
    !content.contains(&0) && std::str::from_utf8(content).is_ok()
}

async fn push_version(
    component: &str,
    push: &PushDelivery,
    conn: &ConnectionHandle,
    provenance: &Provenance,
    workspace: &Path,
) -> Result<(VersionId, Vec<String>), DeployError> {
    let api = conn.api();
    let base = workspace.join(&push.base_dir);
    let files = select_files(base.clone(), push).await?;
    tracing::info!(
        component,
        version = %push.version,
        files = files.len(),
        base = %base.display(),
        "pushing version"
    );

    let id = api
        .create_version(&NewVersion {
            component: component.to_string(),
            name: push.version.clone(),
            description: push.description.clone(),
            incremental: push.incremental,
        })
        .await
        .map_err(|source| DeployError::VersionCreate {
            component: component.to_string(),
            version: push.version.clone(),
            source,
        })?;

    for file in &files {
        let content = tokio::fs::read(&file.absolute)
            .await
            .map_err(|source| DeployError::Artifacts {
                path: file.absolute.clone(),
                source,
            })?;
        let charset = push.charset.clone().filter(|_| looks_like_text(&content));
        tracing::debug!(path = %file.relative, bytes = content.len(), "uploading");
        api.upload_file(
            &id,
            &VersionFile {
                path: file.relative.clone(),
                content,
                charset,
            },
        )
        .await
        .map_err(|source| DeployError::Upload {
            path: file.relative.clone(),
            source,
        })?;
    }

    for (name, value) in &push.properties {
        api.set_version_property(component, &push.version, name, value)
            .await
            .map_err(|source| DeployError::VersionProperty {
                name: name.clone(),
                source,
            })?;
    }

    if !provenance.build_url.is_empty() {
        api.add_version_link(
            component,
            &push.version,
            &provenance.link_title(),
            &provenance.build_url,
        )
        .await
        .map_err(DeployError::VersionLink)?;
    }

    Ok((id, files.into_iter().map(|f| f.relative).collect()))
}

async fn pull_versions(
    component: &str,
    pull: &PullDelivery,
    conn: &ConnectionHandle,
) -> Result<(), DeployError> {
    tracing::info!(component, source_type = %pull.source_type, "importing versions");
    conn.api()
        .import_versions(&VersionImport {
            component: component.to_string(),
            source_type: pull.source_type.clone(),
            source_properties: pull.source_properties.clone(),
            version_properties: pull.properties.clone(),
            incremental: pull.incremental,
        })
        .await
        .map_err(|source| DeployError::Import {
            component: component.to_string(),
            source,
        })?;
    Ok(())
}
