//! ディスクリプタローダー

use crate::error::{DescriptorError, Result};
use crate::model::Descriptor;
use std::path::Path;
use tracing::{debug, info};

/// ディスクリプタファイルをロードしてパース
///
/// 空ドキュメント（空ファイルや `---` のみ）は空のディスクリプタとして扱う。
/// パスが存在しない、またはYAMLとして読めない場合はエラー。
pub fn load_descriptor(path: impl AsRef<Path>) -> Result<Descriptor> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(DescriptorError::DescriptorNotFound(path.to_path_buf()));
    }

    debug!("Loading descriptor from {}", path.display());
    let content = std::fs::read_to_string(path)?;

    if content.trim().is_empty() {
        return Ok(Descriptor::default());
    }

    let descriptor = serde_yaml::from_str::<Option<Descriptor>>(&content)?.unwrap_or_default();
    info!(
        backends = descriptor.backends.len(),
        keypairs = descriptor.keypairs.len(),
        "Descriptor loaded"
    );

    Ok(descriptor)
}
