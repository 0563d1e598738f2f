use std::process::{Command, Output};

/// Stamps `GIT_HASH` and `ON_RELEASE_TAG` for `--version`.
///
/// `SIMPLE_LANDING_BUILD_ID` replaces the hash for builds outside a git
/// checkout (source tarballs, vendored CI builds).
fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=SIMPLE_LANDING_BUILD_ID");

    let hash = std::env::var("SIMPLE_LANDING_BUILD_ID")
        .ok()
        .filter(|id| !id.trim().is_empty())
        .or_else(|| {
            git(&["rev-parse", "--short", "HEAD"])
                .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        })
        .unwrap_or_default();
    let on_tag = git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some();

    println!("cargo:rustc-env=GIT_HASH={hash}");
    println!("cargo:rustc-env=ON_RELEASE_TAG={on_tag}");
}

/// Successful output of a git command, or `None` when git is missing or fails.
fn git(args: &[&str]) -> Option<Output> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
}
