mod commands;
mod prompt;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nimbus")]
#[command(about = "書いたとおりの空へ。db.yaml をコンソールに同期する。", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// ディスクリプタをコンソールに同期
    Sync {
        /// db.yaml のパス
        path: PathBuf,
        /// コンソールAPIのURL
        #[arg(
            long,
            env = "NIMBUS_API_URL",
            default_value = "https://console.nimbus.dev/api/v1"
        )]
        api_url: String,
        /// ログインメールアドレス（省略時はプロンプト）
        #[arg(long, env = "NIMBUS_EMAIL")]
        email: Option<String>,
    },
    /// ディスクリプタを検証（リモート呼び出しなし）
    Validate {
        /// db.yaml のパス
        path: PathBuf,
    },
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("nimbus {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Validate { path } => commands::validate::handle(&path),
        Commands::Sync {
            path,
            api_url,
            email,
        } => commands::sync::handle(&path, &api_url, email).await,
    }
}
