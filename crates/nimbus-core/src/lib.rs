//! nimbus コア
//!
//! 同期ディスクリプタ（db.yaml）のモデルとローダー

pub mod error;
pub mod loader;
pub mod model;

pub use error::{DescriptorError, Result};
pub use loader::load_descriptor;
pub use model::{AssociationTuple, BackendSpec, Descriptor, KeySpec};
