use crate::prompt;
use colored::Colorize;
use nimbus_cloud::{ConsoleClient, ConsoleConfig};
use nimbus_sync::Notifier;
use std::path::Path;

/// リコンサイラの通知をそのまま標準出力へ流すNotifier
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        println!("  {message}");
    }
}

pub async fn handle(path: &Path, api_url: &str, email: Option<String>) -> anyhow::Result<()> {
    // 1. ディスクリプタをロード
    println!("{}", format!("{} をロード中...", path.display()).blue());
    let descriptor = match nimbus_core::load_descriptor(path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ ディスクリプタエラー".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!(
        backends = descriptor.backends.len(),
        keypairs = descriptor.keypairs.len(),
        "descriptor loaded"
    );

    // 2. ログイン
    println!();
    println!("{}", "コンソールにログイン".blue());
    let email = match email {
        Some(e) => e,
        None => prompt::read_line("Email: ")?,
    };
    let password = match std::env::var("NIMBUS_PASSWORD") {
        Ok(p) => p,
        Err(_) => prompt::read_line("Password: ")?,
    };

    let config = ConsoleConfig {
        api_url: api_url.to_string(),
        email,
        password,
    };
    let client = match ConsoleClient::login(&config).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ ログインに失敗しました".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };
    println!("{}", "✓ ログイン完了".green());
    println!();

    // 3. リコンサイル（鍵 → バックエンド → 関連付け）
    let report = match nimbus_sync::run(&client, &ConsoleNotifier, &descriptor).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ 同期に失敗しました".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    // 4. サマリー（関連付けの失敗は意図的に表示しない）
    let associated: usize = report.associations.iter().map(|o| o.associated.len()).sum();
    println!();
    println!("{}", "✓ 同期が完了しました！".green().bold());
    println!(
        "  鍵: {}個追加 / {}個既存",
        report.keys.created.len(),
        report.keys.found.len()
    );
    println!(
        "  バックエンド: {}個追加 / {}個既存",
        report.backends.created.len(),
        report.backends.found.len()
    );
    println!("  関連付け: {}件", associated);
    println!("  リモート鍵総数: {}個", report.remote_key_count);

    Ok(())
}
