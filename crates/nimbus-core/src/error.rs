use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("ディスクリプタが見つかりません: {}\nヒント: db.yaml のパスを確認してください", .0.display())]
    DescriptorNotFound(PathBuf),

    #[error("ファイル読み込みエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAMLパースエラー: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("関連付けレコードが不正です: {0}")]
    InvalidTuple(String),
}

pub type Result<T> = std::result::Result<T, DescriptorError>;
