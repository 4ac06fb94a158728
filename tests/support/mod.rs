// ABOUTME: Test support utilities.
// ABOUTME: Recording fake deploy server API, fake connector and a canned-response HTTP server.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::thread;
use std::time::Duration;

use ucdeploy::client::{
    ClientError, ConnectionHandle, Connector, DeployApi, NewComponent, NewProcess, NewSnapshot,
    NewVersion, ProcessRequest, RequestStatus, SnapshotMembership, VersionFile, VersionImport,
};
use ucdeploy::config::SiteProfile;
use ucdeploy::types::{ComponentId, RequestId, Secret, SiteUrl, VersionId};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("ucdeploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn site(name: &str) -> SiteProfile {
    SiteProfile::new(
        name,
        SiteUrl::parse("https://ucd.example.com:8443").unwrap(),
        "admin",
        "site-pass",
    )
}

pub fn transport_error() -> ClientError {
    ClientError::Transport {
        url: "https://ucd.example.com:8443/cli/applicationProcessRequest/requestStatus".to_string(),
        message: "connection reset by peer".to_string(),
    }
}

pub fn status_error(status: u16) -> ClientError {
    ClientError::Status {
        status,
        url: "https://ucd.example.com:8443/cli".to_string(),
        body: "rejected".to_string(),
    }
}

/// One recorded remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CheckState,
    ComponentExists(String),
    CreateComponent(NewComponent),
    AddComponentToApplication(String, String),
    CreateVersion(NewVersion),
    UploadFile(VersionFile),
    SetVersionProperty(String, String),
    AddVersionLink(String, String),
    ImportVersions(VersionImport),
    CreateProcess(NewProcess),
    CreateSnapshot(NewSnapshot),
    AddVersionsToSnapshot(SnapshotMembership),
    RequestProcess(ProcessRequest),
    RequestStatus(String),
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Call::CheckState => "check_state",
            Call::ComponentExists(_) => "component_exists",
            Call::CreateComponent(_) => "create_component",
            Call::AddComponentToApplication(..) => "add_component_to_application",
            Call::CreateVersion(_) => "create_version",
            Call::UploadFile(_) => "upload_file",
            Call::SetVersionProperty(..) => "set_version_property",
            Call::AddVersionLink(..) => "add_version_link",
            Call::ImportVersions(_) => "import_versions",
            Call::CreateProcess(_) => "create_process",
            Call::CreateSnapshot(_) => "create_snapshot",
            Call::AddVersionsToSnapshot(_) => "add_versions_to_snapshot",
            Call::RequestProcess(_) => "request_process",
            Call::RequestStatus(_) => "request_status",
        }
    }
}

/// In-memory deploy server that records every call.
#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<Call>>,
    statuses: Mutex<VecDeque<Result<RequestStatus, ClientError>>>,
    existing_components: Mutex<Vec<String>>,
    fail_on: Mutex<Option<&'static str>>,
    status_delay: Mutex<Option<Duration>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue responses for successive status polls; an empty queue keeps answering EXECUTING.
    pub fn script_statuses(&self, statuses: Vec<Result<RequestStatus, ClientError>>) {
        self.statuses.lock().extend(statuses);
    }

    pub fn add_component(&self, name: &str) {
        self.existing_components.lock().push(name.to_string());
    }

    /// Make every status poll hang for `delay` before answering.
    pub fn stall_status(&self, delay: Duration) {
        *self.status_delay.lock() = Some(delay);
    }

    /// Make the named call answer HTTP 500.
    pub fn fail_on(&self, call: &'static str) {
        *self.fail_on.lock() = Some(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls.lock().iter().map(Call::name).collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.name() == name).count()
    }

    fn record(&self, call: Call) -> Result<(), ClientError> {
        let name = call.name();
        self.calls.lock().push(call);
        if *self.fail_on.lock() == Some(name) {
            return Err(status_error(500));
        }
        Ok(())
    }
}

#[async_trait]
impl DeployApi for FakeApi {
    async fn check_state(&self) -> Result<(), ClientError> {
        self.record(Call::CheckState)
    }

    async fn component_exists(&self, name: &str) -> Result<bool, ClientError> {
        self.record(Call::ComponentExists(name.to_string()))?;
        Ok(self.existing_components.lock().iter().any(|c| c == name))
    }

    async fn create_component(&self, component: &NewComponent) -> Result<ComponentId, ClientError> {
        self.record(Call::CreateComponent(component.clone()))?;
        self.add_component(&component.name);
        Ok(ComponentId::new(format!("component-{}", component.name)))
    }

    async fn add_component_to_application(
        &self,
        component: &str,
        application: &str,
    ) -> Result<(), ClientError> {
        self.record(Call::AddComponentToApplication(
            component.to_string(),
            application.to_string(),
        ))
    }

    async fn create_version(&self, version: &NewVersion) -> Result<VersionId, ClientError> {
        self.record(Call::CreateVersion(version.clone()))?;
        Ok(VersionId::new(format!("version-{}", version.name)))
    }

    async fn upload_file(
        &self,
        _version: &VersionId,
        file: &VersionFile,
    ) -> Result<(), ClientError> {
        self.record(Call::UploadFile(file.clone()))
    }

    async fn set_version_property(
        &self,
        _component: &str,
        _version: &str,
        name: &str,
        value: &str,
    ) -> Result<(), ClientError> {
        self.record(Call::SetVersionProperty(name.to_string(), value.to_string()))
    }

    async fn add_version_link(
        &self,
        _component: &str,
        _version: &str,
        title: &str,
        url: &str,
    ) -> Result<(), ClientError> {
        self.record(Call::AddVersionLink(title.to_string(), url.to_string()))
    }

    async fn import_versions(&self, import: &VersionImport) -> Result<(), ClientError> {
        self.record(Call::ImportVersions(import.clone()))
    }

    async fn create_process(&self, process: &NewProcess) -> Result<(), ClientError> {
        self.record(Call::CreateProcess(process.clone()))
    }

    async fn create_snapshot(&self, snapshot: &NewSnapshot) -> Result<(), ClientError> {
        self.record(Call::CreateSnapshot(snapshot.clone()))
    }

    async fn add_versions_to_snapshot(
        &self,
        membership: &SnapshotMembership,
    ) -> Result<(), ClientError> {
        self.record(Call::AddVersionsToSnapshot(membership.clone()))
    }

    async fn request_process(&self, request: &ProcessRequest) -> Result<RequestId, ClientError> {
        self.record(Call::RequestProcess(request.clone()))?;
        Ok(RequestId::new("request-1"))
    }

    async fn request_status(&self, id: &RequestId) -> Result<RequestStatus, ClientError> {
        self.record(Call::RequestStatus(id.as_str().to_string()))?;
        let delay = *self.status_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.statuses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(RequestStatus::new("EXECUTING", None)))
    }
}

/// Connector handing out handles to one shared fake API.
pub struct FakeConnector {
    api: Arc<FakeApi>,
    connects: Arc<AtomicUsize>,
    users: Arc<Mutex<Vec<String>>>,
}

impl FakeConnector {
    pub fn new(api: Arc<FakeApi>) -> Self {
        Self {
            api,
            connects: Arc::new(AtomicUsize::new(0)),
            users: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Counter of handles built so far, readable after the connector moves into a cache.
    pub fn connects(&self) -> Arc<AtomicUsize> {
        self.connects.clone()
    }

    /// Users handles were built for.
    pub fn users(&self) -> Arc<Mutex<Vec<String>>> {
        self.users.clone()
    }
}

impl Connector for FakeConnector {
    fn connect(
        &self,
        _site: &SiteProfile,
        user: &str,
        _password: &Secret,
    ) -> Result<ConnectionHandle, ClientError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.users.lock().push(user.to_string());
        Ok(ConnectionHandle::new(self.api.clone()))
    }
}

/// A request captured by [`CannedServer`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub authorization: Option<String>,
    pub body: Vec<u8>,
}

/// Minimal HTTP server that answers every request with the same response.
pub struct CannedServer {
    pub url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl CannedServer {
    pub fn start(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let captured = requests.clone();
        let body = body.to_string();

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let mut reader = BufReader::new(stream.try_clone().unwrap());

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                let mut authorization = None;
                let mut length = 0usize;
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).is_err() || line == "\r\n" || line.is_empty() {
                        break;
                    }
                    if let Some((name, value)) = line.split_once(':') {
                        let value = value.trim().to_string();
                        match name.to_ascii_lowercase().as_str() {
                            "authorization" => authorization = Some(value),
                            "content-length" => length = value.parse().unwrap_or(0),
                            _ => {}
                        }
                    }
                }
                let mut request_body = vec![0; length];
                let _ = reader.read_exact(&mut request_body);

                captured.lock().push(CapturedRequest {
                    request_line: request_line.trim().to_string(),
                    authorization,
                    body: request_body,
                });

                let response = format!(
                    "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    reason(status),
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self { url, requests }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().clone()
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
