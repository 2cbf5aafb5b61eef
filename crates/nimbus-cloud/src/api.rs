//! Management API surface and wire types
//!
//! The capability surface the reconciler consumes, plus the typed
//! records the console reports. Keeping the trait here lets the sync
//! passes run against a recording mock in tests.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Capability surface of the cloud-management console.
///
/// Every listing is a fresh fetch. The console is the authority for
/// existence, and callers are expected to re-fetch before diffing
/// rather than hold on to earlier results.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    /// Fetch the current backend set, keyed by title.
    async fn list_backends(&self) -> Result<HashMap<String, BackendInfo>>;

    /// Register a new backend.
    async fn create_backend(&self, request: &CreateBackendRequest) -> Result<()>;

    /// Fetch the current key set, keyed by name.
    async fn list_keys(&self) -> Result<HashMap<String, KeyInfo>>;

    /// Upload a new SSH key.
    async fn create_key(&self, name: &str, private: &str) -> Result<()>;

    /// Mark an existing key as the account default.
    async fn set_default_key(&self, name: &str) -> Result<()>;

    /// Resolve a backend by its console id.
    async fn lookup_backend(&self, backend_id: &str) -> Result<BackendInfo>;

    /// Fetch a backend's machine list. Always hits the wire.
    async fn list_machines(&self, backend_id: &str) -> Result<Vec<MachineInfo>>;

    /// Bind a key to a machine.
    async fn associate_key(&self, request: &AssociateKeyRequest) -> Result<()>;
}

/// Backend as reported by the console
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendInfo {
    pub id: String,
    pub title: String,
    pub provider: String,
    #[serde(default)]
    pub state: Option<String>,
}

/// SSH key as reported by the console
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyInfo {
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Machine as reported by the console
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub public_ips: Option<Vec<String>>,
}

impl MachineInfo {
    /// First public IP, if the machine has any.
    pub fn first_public_ip(&self) -> Option<&str> {
        self.public_ips.as_ref()?.first().map(String::as_str)
    }
}

/// Payload for backend registration.
///
/// All provider fields are forwarded as named fields. Absent
/// credential fields stay empty strings; absent endpoint/machine
/// fields serialize as null. The console ignores fields that do not
/// apply to the given provider.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateBackendRequest {
    pub title: String,
    pub provider: String,
    pub apikey: String,
    pub apisecret: String,
    pub tenant_name: String,
    pub region: String,
    pub apiurl: String,
    pub compute_endpoint: Option<String>,
    pub machine_ip: Option<String>,
    pub machine_key: Option<String>,
    pub machine_user: Option<String>,
    pub machine_port: Option<u16>,
}

/// Payload for a key-machine association
#[derive(Debug, Clone, Serialize)]
pub struct AssociateKeyRequest {
    pub key_name: String,
    pub backend_id: String,
    pub machine_id: String,
    /// First public IP of the machine, empty when it has none.
    pub host: String,
    pub ssh_user: String,
    pub ssh_port: String,
}
