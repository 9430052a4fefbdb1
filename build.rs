//! Embeds package version, commit and build date for `--version` and `/api/health`.

use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Release builds pin these from the environment
    let commit = env::var("BUILD_COMMIT").ok().unwrap_or_else(|| {
        match git(&["rev-parse", "--short=7", "HEAD"]).filter(|s| !s.is_empty()) {
            Some(hash) => {
                let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
                    .is_some_and(|s| !s.is_empty());
                if dirty {
                    format!("{hash}-dirty")
                } else {
                    hash
                }
            }
            None => "unknown".to_string(),
        }
    });
    let date = env::var("BUILD_DATE")
        .unwrap_or_else(|_| chrono::Utc::now().format("%Y-%m-%d").to_string());
    let version = env::var("CARGO_PKG_VERSION")?;

    let dest = Path::new(&env::var("OUT_DIR")?).join("build_info.rs");
    fs::write(
        dest,
        format!(
            "pub const BUILD_VERSION: &str = {version:?};\n\
             pub const BUILD_COMMIT: &str = {commit:?};\n\
             pub const BUILD_DATE: &str = {date:?};\n"
        ),
    )?;

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    println!("cargo:rerun-if-env-changed=BUILD_COMMIT");
    println!("cargo:rerun-if-env-changed=BUILD_DATE");
    Ok(())
}
