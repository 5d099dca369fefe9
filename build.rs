//! Build script for imexport-rs
//!
//! Stamps the binary with the commit and toolchain it was built from, so a
//! task row can be traced back to the pipeline build that wrote it.

use std::process::Command;

fn main() {
    let build_time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    println!("cargo:rustc-env=IMEXPORT_BUILD_TIME={}", build_time);

    let commit = git_commit().unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=IMEXPORT_GIT_COMMIT={}", commit);

    let rustc = rustc_version().unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=IMEXPORT_RUSTC={}", rustc);

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    println!("cargo:rerun-if-env-changed=IMEXPORT_GIT_COMMIT");
}

/// Short commit hash, suffixed with `-dirty` when the tree has local changes
///
/// `IMEXPORT_GIT_COMMIT` overrides it for builds outside a checkout.
fn git_commit() -> Option<String> {
    if let Ok(commit) = std::env::var("IMEXPORT_GIT_COMMIT") {
        return Some(commit);
    }

    let hash = git(&["rev-parse", "--short", "HEAD"])?;
    let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
        .is_some_and(|status| !status.is_empty());
    Some(if dirty { format!("{}-dirty", hash) } else { hash })
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|out| out.trim().to_string())
}

fn rustc_version() -> Option<String> {
    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let output = Command::new(rustc).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|out| out.trim().to_string())
}
