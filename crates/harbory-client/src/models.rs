//! Payload models for the Harbory backend.
//!
//! Container, image, volume, network and node payloads are the Docker Engine
//! objects the backend forwards verbatim, so they use Docker's PascalCase keys
//! and keep every field this crate does not model in `extra`. The remaining
//! models are the backend's own snake_case types.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Entry of `GET /containers`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerSummary {
    /// Full container ID.
    pub id: String,
    /// Container names, each prefixed with `/`.
    #[serde(default)]
    pub names: Vec<String>,
    /// Image reference the container was created from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Image ID.
    #[serde(rename = "ImageID", default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    /// Command run in the container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Creation time as a Unix timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    /// Machine-readable state (`running`, `exited`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Human-readable status (`Up 2 hours`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Published ports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<Port>>,
    /// Container labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
    /// Unmodelled fields.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl ContainerSummary {
    /// Primary name without the leading slash.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.names
            .first()
            .map(|name| name.strip_prefix('/').unwrap_or(name))
    }

    /// Returns true if the container is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.as_deref() == Some("running")
    }
}

/// Port mapping of a container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Port {
    /// Host IP the port is bound to.
    #[serde(rename = "IP", default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Port inside the container.
    pub private_port: u16,
    /// Port on the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_port: Option<u16>,
    /// `tcp`, `udp` or `sctp`.
    #[serde(rename = "Type")]
    pub protocol: String,
}

/// Result of `GET /containers/:id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerDetails {
    /// Full container ID.
    pub id: String,
    /// Container name, prefixed with `/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Creation time (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Entrypoint path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Entrypoint arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    /// Runtime state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ContainerState>,
    /// Image ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Number of restarts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_count: Option<i64>,
    /// Platform (`linux`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Unmodelled fields (`Config`, `HostConfig`, `NetworkSettings`, ...).
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Runtime state block of a container inspect.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerState {
    /// `created`, `running`, `paused`, `restarting`, `removing`, `exited` or `dead`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Main process is running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,
    /// Container is paused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    /// Container is restarting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restarting: Option<bool>,
    /// Killed by the OOM killer.
    #[serde(rename = "OOMKilled", default, skip_serializing_if = "Option::is_none")]
    pub oom_killed: Option<bool>,
    /// Container is dead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dead: Option<bool>,
    /// Main process ID (0 when stopped).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<i64>,
    /// Exit code of the last run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i64>,
    /// Last runtime error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Last start time (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    /// Last exit time (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
}

/// Entry of `GET /images`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ImageSummary {
    /// Image ID (`sha256:...`).
    pub id: String,
    /// Parent image ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Tags pointing at this image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_tags: Option<Vec<String>>,
    /// Content-addressable digests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_digests: Option<Vec<String>>,
    /// Creation time as a Unix timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    /// Total size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    /// Size shared with other images (-1 if not computed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_size: Option<i64>,
    /// Image labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
    /// Number of containers using the image (-1 if not computed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containers: Option<i64>,
    /// Unmodelled fields.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl ImageSummary {
    /// Returns true if the image has no tag.
    #[must_use]
    pub fn is_dangling(&self) -> bool {
        match self.repo_tags.as_deref() {
            None | Some([]) => true,
            Some(tags) => tags.iter().all(|tag| tag == "<none>:<none>"),
        }
    }
}

/// Result of `GET /images/:id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ImageDetails {
    /// Image ID (`sha256:...`).
    pub id: String,
    /// Tags pointing at this image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_tags: Option<Vec<String>>,
    /// Content-addressable digests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_digests: Option<Vec<String>>,
    /// Parent image ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Commit message of the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Creation time (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Image author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// CPU architecture (`amd64`, `arm64`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    /// Operating system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    /// Unmodelled fields (`Config`, `RootFS`, ...).
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Result of `POST /images/prune`.
///
/// The backend answers with its own `status` string next to the report, so
/// this model carries it too.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImagePruneReport {
    /// Backend status (`success`).
    pub status: String,
    /// Untagged image references; `null` when nothing was pruned.
    #[serde(default)]
    pub pruned_images: Option<Vec<String>>,
    /// Number of deleted layers.
    #[serde(default)]
    pub deleted_layers_count: u64,
    /// Reclaimed space in MiB.
    #[serde(default)]
    pub space_reclaimed_mb: u64,
}

/// Result of `GET /volumes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct VolumeList {
    /// Volumes known to the daemon.
    #[serde(default)]
    pub volumes: Option<Vec<Volume>>,
    /// Warnings raised while listing.
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
}

impl VolumeList {
    /// Iterate the volumes, treating `null` as empty.
    pub fn iter(&self) -> impl Iterator<Item = &Volume> {
        self.volumes.iter().flatten()
    }
}

/// A Docker volume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Volume {
    /// Volume name.
    pub name: String,
    /// Volume driver (`local`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    /// Mount path on the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mountpoint: Option<String>,
    /// Creation time (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Driver-specific status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<HashMap<String, Value>>,
    /// User labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
    /// `local` or `global`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Driver options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<HashMap<String, String>>,
    /// Unmodelled fields.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// A Docker network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Network {
    /// Network name.
    pub name: String,
    /// Network ID.
    pub id: String,
    /// Creation time (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// `local`, `global` or `swarm`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Network driver (`bridge`, `overlay`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    /// IPv6 enabled.
    #[serde(rename = "EnableIPv6", default, skip_serializing_if = "Option::is_none")]
    pub enable_ipv6: Option<bool>,
    /// Network is isolated from the outside.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal: Option<bool>,
    /// Standalone containers may attach.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachable: Option<bool>,
    /// Swarm routing-mesh network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress: Option<bool>,
    /// IP address management settings.
    #[serde(rename = "IPAM", default, skip_serializing_if = "Option::is_none")]
    pub ipam: Option<Value>,
    /// Attached endpoints keyed by container ID (inspect only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containers: Option<HashMap<String, NetworkEndpoint>>,
    /// Driver options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<HashMap<String, String>>,
    /// User labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
    /// Unmodelled fields.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Container endpoint attached to a network.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkEndpoint {
    /// Container name.
    #[serde(default)]
    pub name: Option<String>,
    /// Endpoint ID.
    #[serde(rename = "EndpointID", default)]
    pub endpoint_id: Option<String>,
    /// Endpoint MAC address.
    #[serde(default)]
    pub mac_address: Option<String>,
    /// IPv4 address in CIDR form.
    #[serde(rename = "IPv4Address", default)]
    pub ipv4_address: Option<String>,
    /// IPv6 address in CIDR form.
    #[serde(rename = "IPv6Address", default)]
    pub ipv6_address: Option<String>,
}

/// A swarm node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Node {
    /// Node ID.
    #[serde(rename = "ID")]
    pub id: String,
    /// Object version used for optimistic updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<ObjectVersion>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// User-defined node spec.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<NodeSpec>,
    /// Properties reported by the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<NodeDescription>,
    /// Node health.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
    /// Present on manager nodes only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_status: Option<ManagerStatus>,
    /// Unmodelled fields.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Node {
    /// Hostname reported by the node.
    #[must_use]
    pub fn hostname(&self) -> Option<&str> {
        self.description.as_ref()?.hostname.as_deref()
    }

    /// Returns true if this node is the swarm leader.
    #[must_use]
    pub fn is_leader(&self) -> bool {
        self.manager_status
            .as_ref()
            .and_then(|status| status.leader)
            .unwrap_or(false)
    }
}

/// Swarm object version.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectVersion {
    /// Monotonic version index.
    pub index: u64,
}

/// User-defined node settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct NodeSpec {
    /// Node name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// User labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
    /// `worker` or `manager`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// `active`, `pause` or `drain`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
}

/// Properties a node reports about itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct NodeDescription {
    /// Hostname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Architecture and OS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Value>,
    /// `NanoCPUs` and `MemoryBytes`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Value>,
    /// Engine version and plugins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<Value>,
}

/// Node health as seen by the swarm.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct NodeStatus {
    /// `unknown`, `down`, `ready` or `disconnected`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Node IP address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addr: Option<String>,
}

/// Raft status of a manager node.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ManagerStatus {
    /// Node is the raft leader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader: Option<bool>,
    /// `unknown`, `unreachable` or `reachable`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reachability: Option<String>,
    /// Raft address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addr: Option<String>,
}

/// Result of `GET /system/stats`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemStats {
    /// CPU usage.
    pub cpu: CpuStats,
    /// Memory usage.
    pub memory: MemoryStats,
    /// Root filesystem usage.
    pub disk: DiskStats,
    /// Docker daemon counters.
    pub docker: DockerStats,
    /// Host platform.
    pub system: SystemInfo,
}

/// CPU section of [`SystemStats`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CpuStats {
    /// Logical CPU count.
    pub cores: u32,
    /// Goroutines running in the backend process.
    pub goroutines: u64,
    /// Used share in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_percent: Option<f64>,
}

/// Memory section of [`SystemStats`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryStats {
    /// Total bytes.
    pub total_bytes: u64,
    /// Used bytes.
    pub used_bytes: u64,
    /// Free bytes.
    pub free_bytes: u64,
    /// Used share in percent.
    pub usage_percent: f64,
    /// Total MiB.
    pub total_mb: u64,
    /// Used MiB.
    pub used_mb: u64,
    /// Free MiB.
    pub free_mb: u64,
}

/// Disk section of [`SystemStats`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiskStats {
    /// Total bytes.
    pub total_bytes: u64,
    /// Used bytes.
    pub used_bytes: u64,
    /// Free bytes.
    pub free_bytes: u64,
    /// Used share in percent.
    pub usage_percent: f64,
    /// Total GiB.
    pub total_gb: u64,
    /// Used GiB.
    pub used_gb: u64,
    /// Free GiB.
    pub free_gb: u64,
}

/// Docker section of [`SystemStats`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DockerStats {
    /// All containers.
    pub containers_total: u64,
    /// Running containers.
    pub containers_running: u64,
    /// Image count.
    pub images: u64,
    /// Engine version.
    pub version: String,
    /// Engine API version.
    pub server_version: String,
}

/// Host section of [`SystemStats`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemInfo {
    /// Operating system.
    pub os: String,
    /// CPU architecture.
    pub architecture: String,
    /// Hostname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

/// Result of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthReport {
    /// `ok` or `down`.
    pub status: String,
    /// Time the report was produced.
    pub timestamp: DateTime<Utc>,
    /// Backend uptime as a Go duration string (`1h2m3s`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<String>,
    /// Per-component checks.
    #[serde(default)]
    pub checks: HashMap<String, ComponentCheck>,
}

impl HealthReport {
    /// Returns true if the backend reports itself healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// One component check of a [`HealthReport`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComponentCheck {
    /// Component status.
    pub status: String,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Check latency in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<i64>,
}

/// Body of `POST /auth/login`.
#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub(crate) password: &'a str,
}

/// Body of `POST /auth/change-password`.
#[derive(Serialize)]
pub(crate) struct ChangePasswordRequest<'a> {
    pub(crate) old_password: &'a str,
    pub(crate) new_password: &'a str,
}

/// Result of `POST /auth/login`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

impl LoginResponse {
    /// Take the token as a secret, ready for a credential store.
    #[must_use]
    pub fn into_token(self) -> SecretString {
        SecretString::from(self.token)
    }
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"[REDACTED]")
            .field("message", &self.message)
            .finish()
    }
}

/// `{message}` body returned by logout, verify and change-password.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}
