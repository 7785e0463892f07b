use std::env;
use std::path::Path;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-env-changed=SLATEBOARD_GIT_HASH");

    // Packagers building from a tarball can pin the hash explicitly.
    let hash = env::var("SLATEBOARD_GIT_HASH")
        .ok()
        .filter(|hash| !hash.trim().is_empty())
        .or_else(short_head_hash)
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=SLATEBOARD_GIT_HASH={}", hash.trim());

    for watched in [".git/HEAD", ".git/packed-refs"] {
        if Path::new(watched).exists() {
            println!("cargo:rerun-if-changed={watched}");
        }
    }
}

fn short_head_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    let hash = hash.trim();
    (!hash.is_empty()).then(|| hash.to_string())
}
