use colored::Colorize;
use std::path::Path;

pub fn handle(path: &Path) -> anyhow::Result<()> {
    println!("{}", "ディスクリプタを検証中...".blue());

    match nimbus_core::load_descriptor(path) {
        Ok(descriptor) => {
            println!("{}", "✓ ディスクリプタは正常です！".green().bold());
            println!();
            println!("サマリー:");
            println!("  バックエンド: {}個", descriptor.backends.len());
            for spec in descriptor.backends.values() {
                println!("    - {} ({})", spec.title.cyan(), spec.provider);
            }
            println!("  キーペア: {}個", descriptor.keypairs.len());
            for (name, spec) in &descriptor.keypairs {
                let default_mark = if spec.default { "、デフォルト" } else { "" };
                println!(
                    "    - {} ({}個の関連付け{})",
                    name.cyan(),
                    spec.machines.len(),
                    default_mark
                );
            }
            Ok(())
        }
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ ディスクリプタエラー".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
