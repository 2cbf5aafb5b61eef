//! テスト用のモックコンソールと記録Notifier

use async_trait::async_trait;
use nimbus_cloud::{
    AssociateKeyRequest, BackendInfo, CloudError, CreateBackendRequest, KeyInfo, MachineInfo,
    ManagementApi, Result,
};
use nimbus_sync::Notifier;
use std::collections::HashMap;
use std::sync::Mutex;

/// コンソールへの呼び出し履歴
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListBackends,
    CreateBackend(String),
    ListKeys,
    CreateKey(String),
    SetDefaultKey(String),
    LookupBackend(String),
    ListMachines(String),
    AssociateKey {
        key: String,
        backend_id: String,
        machine_id: String,
        host: String,
        ssh_user: String,
        ssh_port: String,
    },
}

#[derive(Default)]
pub struct RemoteState {
    pub backends: Vec<BackendInfo>,
    pub keys: HashMap<String, KeyInfo>,
    /// backend_id → マシン一覧
    pub machines: HashMap<String, Vec<MachineInfo>>,
}

/// インメモリのコンソール。全呼び出しを記録する。
#[derive(Default)]
pub struct MockConsole {
    pub state: Mutex<RemoteState>,
    pub calls: Mutex<Vec<Call>>,
    pub fail_create_key: bool,
    pub fail_create_backend: bool,
}

impl MockConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(self, id: &str, title: &str) -> Self {
        self.state.lock().unwrap().backends.push(BackendInfo {
            id: id.to_string(),
            title: title.to_string(),
            provider: "ec2".to_string(),
            state: Some("online".to_string()),
        });
        self
    }

    pub fn with_key(self, name: &str) -> Self {
        self.state.lock().unwrap().keys.insert(
            name.to_string(),
            KeyInfo {
                name: name.to_string(),
                is_default: false,
            },
        );
        self
    }

    pub fn with_machine(self, backend_id: &str, id: &str, public_ips: Option<Vec<&str>>) -> Self {
        self.state
            .lock()
            .unwrap()
            .machines
            .entry(backend_id.to_string())
            .or_default()
            .push(MachineInfo {
                id: id.to_string(),
                name: format!("machine-{id}"),
                public_ips: public_ips.map(|ips| ips.into_iter().map(str::to_string).collect()),
            });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn api_error(message: &str) -> CloudError {
        CloudError::ApiError {
            status: 500,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl ManagementApi for MockConsole {
    async fn list_backends(&self) -> Result<HashMap<String, BackendInfo>> {
        self.record(Call::ListBackends);
        let state = self.state.lock().unwrap();
        Ok(state
            .backends
            .iter()
            .map(|b| (b.title.clone(), b.clone()))
            .collect())
    }

    async fn create_backend(&self, request: &CreateBackendRequest) -> Result<()> {
        self.record(Call::CreateBackend(request.title.clone()));
        if self.fail_create_backend {
            return Err(Self::api_error("backend creation rejected"));
        }
        let mut state = self.state.lock().unwrap();
        let id = format!("id-{}", request.title);
        state.backends.push(BackendInfo {
            id,
            title: request.title.clone(),
            provider: request.provider.clone(),
            state: Some("online".to_string()),
        });
        Ok(())
    }

    async fn list_keys(&self) -> Result<HashMap<String, KeyInfo>> {
        self.record(Call::ListKeys);
        Ok(self.state.lock().unwrap().keys.clone())
    }

    async fn create_key(&self, name: &str, _private: &str) -> Result<()> {
        self.record(Call::CreateKey(name.to_string()));
        if self.fail_create_key {
            return Err(Self::api_error("key creation rejected"));
        }
        self.state.lock().unwrap().keys.insert(
            name.to_string(),
            KeyInfo {
                name: name.to_string(),
                is_default: false,
            },
        );
        Ok(())
    }

    async fn set_default_key(&self, name: &str) -> Result<()> {
        self.record(Call::SetDefaultKey(name.to_string()));
        let mut state = self.state.lock().unwrap();
        if !state.keys.contains_key(name) {
            return Err(CloudError::KeyNotFound(name.to_string()));
        }
        for key in state.keys.values_mut() {
            key.is_default = key.name == name;
        }
        Ok(())
    }

    async fn lookup_backend(&self, backend_id: &str) -> Result<BackendInfo> {
        self.record(Call::LookupBackend(backend_id.to_string()));
        self.state
            .lock()
            .unwrap()
            .backends
            .iter()
            .find(|b| b.id == backend_id)
            .cloned()
            .ok_or_else(|| CloudError::BackendNotFound(backend_id.to_string()))
    }

    async fn list_machines(&self, backend_id: &str) -> Result<Vec<MachineInfo>> {
        self.record(Call::ListMachines(backend_id.to_string()));
        Ok(self
            .state
            .lock()
            .unwrap()
            .machines
            .get(backend_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn associate_key(&self, request: &AssociateKeyRequest) -> Result<()> {
        self.record(Call::AssociateKey {
            key: request.key_name.clone(),
            backend_id: request.backend_id.clone(),
            machine_id: request.machine_id.clone(),
            host: request.host.clone(),
            ssh_user: request.ssh_user.clone(),
            ssh_port: request.ssh_port.clone(),
        });
        Ok(())
    }
}

/// 通知を溜め込むNotifier
#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
