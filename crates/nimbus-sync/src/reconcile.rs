//! The reconciliation passes
//!
//! Pass order is fixed: keys, then backends, then associations. No
//! pass retries a prior one, and nothing already created is rolled
//! back when a later pass fails.

use crate::notify::Notifier;
use crate::report::{
    AssociationFailure, AssociationReport, BackendSyncReport, KeyAssociationOutcome,
    KeySyncReport, SyncReport,
};
use nimbus_cloud::{
    AssociateKeyRequest, CloudError, CreateBackendRequest, KeyInfo, ManagementApi, Result,
};
use nimbus_core::{AssociationTuple, BackendSpec, Descriptor};
use std::collections::HashMap;
use tracing::debug;

/// Run all three passes against the console.
pub async fn run(
    api: &dyn ManagementApi,
    notifier: &dyn Notifier,
    descriptor: &Descriptor,
) -> Result<SyncReport> {
    let keys = sync_keys(api, notifier, descriptor).await?;
    let backends = sync_backends(api, notifier, descriptor).await?;
    let associations = associate_keys(api, notifier, descriptor).await?;

    Ok(SyncReport {
        keys,
        backends,
        associations: associations.outcomes,
        remote_key_count: associations.remote_key_count,
    })
}

/// Sync the descriptor's keypairs into the console.
///
/// A key whose name already exists remotely is left untouched. A key
/// marked `default` is re-resolved against a fresh key listing after
/// its creation call returns, then marked; when several specs claim
/// the default, the last mark wins. Any console error aborts the run.
pub async fn sync_keys(
    api: &dyn ManagementApi,
    notifier: &dyn Notifier,
    descriptor: &Descriptor,
) -> Result<KeySyncReport> {
    let remote = api.list_keys().await?;
    let mut report = KeySyncReport::default();

    notifier.notify("鍵を同期中");
    for (name, spec) in &descriptor.keypairs {
        if remote.contains_key(name) {
            notifier.notify(&format!("発見: {name}"));
            report.found.push(name.clone());
            continue;
        }

        notifier.notify(&format!("鍵 {name} を追加"));
        api.create_key(name, &spec.private).await?;
        report.created.push(name.clone());

        if spec.default {
            // 作成直後の鍵が名前で解決できることを確認してからデフォルト化
            let refreshed = api.list_keys().await?;
            if !refreshed.contains_key(name) {
                return Err(CloudError::KeyNotFound(name.clone()));
            }
            api.set_default_key(name).await?;
            report.defaulted.push(name.clone());
        }
    }

    debug!(
        created = report.created.len(),
        found = report.found.len(),
        "key pass complete"
    );
    Ok(report)
}

/// Sync the descriptor's backends into the console.
///
/// De-duplication is by title, exact case-sensitive match. An existing
/// backend is never updated, even when the spec's credentials differ
/// from the live ones. It only gets a "found" notice.
pub async fn sync_backends(
    api: &dyn ManagementApi,
    notifier: &dyn Notifier,
    descriptor: &Descriptor,
) -> Result<BackendSyncReport> {
    let remote = api.list_backends().await?;
    let mut report = BackendSyncReport::default();

    notifier.notify("バックエンドを同期中");
    for spec in descriptor.backends.values() {
        if remote.contains_key(&spec.title) {
            notifier.notify(&format!("発見: {}", spec.title));
            report.found.push(spec.title.clone());
            continue;
        }

        notifier.notify(&format!("バックエンド {} を追加", spec.title));
        api.create_backend(&backend_request(spec)).await?;
        report.created.push(spec.title.clone());
    }

    debug!(
        created = report.created.len(),
        found = report.found.len(),
        "backend pass complete"
    );
    Ok(report)
}

/// Associate keys to machines per the descriptor's tuples.
///
/// Failure containment is per key spec: the first failed step inside a
/// key's tuple block abandons that key's remaining tuples without a
/// notice, and the loop moves on to the next key. After every key spec
/// is processed the key set is refreshed once, unconditionally.
pub async fn associate_keys(
    api: &dyn ManagementApi,
    notifier: &dyn Notifier,
    descriptor: &Descriptor,
) -> Result<AssociationReport> {
    let remote_keys = api.list_keys().await?;
    let mut report = AssociationReport::default();

    notifier.notify("鍵とマシンの関連付けを更新中");
    for (name, spec) in &descriptor.keypairs {
        if spec.machines.is_empty() {
            continue;
        }

        let mut outcome = KeyAssociationOutcome {
            key: name.clone(),
            associated: Vec::new(),
            abandoned: None,
        };

        for tuple in &spec.machines {
            match associate_one(api, &remote_keys, name, tuple).await {
                Ok(machine_id) => {
                    notifier.notify(&format!("マシン {machine_id} を関連付けました"));
                    outcome.associated.push(machine_id);
                }
                Err(failure) => {
                    // この鍵の残りは黙って放棄し、次の鍵へ
                    debug!(key = %name, error = %failure.error, "association block abandoned");
                    outcome.abandoned = Some(failure);
                    break;
                }
            }
        }

        report.outcomes.push(outcome);
    }

    // 最終整合ステップ: 結果に関わらず鍵一覧を取り直す
    report.remote_key_count = api.list_keys().await?.len();

    Ok(report)
}

/// Resolve and associate a single tuple. Any error becomes the
/// failure that abandons the rest of the key's block.
async fn associate_one(
    api: &dyn ManagementApi,
    remote_keys: &HashMap<String, KeyInfo>,
    key_name: &str,
    tuple: &AssociationTuple,
) -> std::result::Result<String, AssociationFailure> {
    let backend_id = tuple
        .backend_id()
        .map_err(|e| AssociationFailure::new(None, e))?;
    let machine_id = tuple
        .machine_id()
        .map_err(|e| AssociationFailure::new(None, e))?;
    let ssh_user = tuple
        .ssh_user()
        .map_err(|e| AssociationFailure::new(Some(machine_id.as_str()), e))?;
    let ssh_port = tuple
        .ssh_port()
        .map_err(|e| AssociationFailure::new(Some(machine_id.as_str()), e))?;

    if !remote_keys.contains_key(key_name) {
        return Err(AssociationFailure::new(
            Some(machine_id.as_str()),
            CloudError::KeyNotFound(key_name.to_string()),
        ));
    }

    let backend = api
        .lookup_backend(&backend_id)
        .await
        .map_err(|e| AssociationFailure::new(Some(machine_id.as_str()), e))?;

    // マシン一覧をリフレッシュしてから解決する
    let machines = api
        .list_machines(&backend.id)
        .await
        .map_err(|e| AssociationFailure::new(Some(machine_id.as_str()), e))?;
    let machine = machines
        .into_iter()
        .find(|m| m.id == machine_id)
        .ok_or_else(|| {
            AssociationFailure::new(
                Some(machine_id.as_str()),
                CloudError::MachineNotFound {
                    backend_id: backend.id.clone(),
                    machine_id: machine_id.clone(),
                },
            )
        })?;

    let host = machine.first_public_ip().unwrap_or("").to_string();

    api.associate_key(&AssociateKeyRequest {
        key_name: key_name.to_string(),
        backend_id: backend.id,
        machine_id: machine.id.clone(),
        host,
        ssh_user,
        ssh_port,
    })
    .await
    .map_err(|e| AssociationFailure::new(Some(machine_id.as_str()), e))?;

    Ok(machine.id)
}

fn backend_request(spec: &BackendSpec) -> CreateBackendRequest {
    CreateBackendRequest {
        title: spec.title.clone(),
        provider: spec.provider.clone(),
        apikey: spec.apikey.clone(),
        apisecret: spec.apisecret.clone(),
        tenant_name: spec.tenant_name.clone(),
        region: spec.region.clone(),
        apiurl: spec.apiurl.clone(),
        compute_endpoint: spec.compute_endpoint.clone(),
        machine_ip: spec.machine_ip.clone(),
        machine_key: spec.machine_key.clone(),
        machine_user: spec.machine_user.clone(),
        machine_port: spec.machine_port,
    }
}
