use std::io::{Result, Error, ErrorKind};

/// Extract the hash of the current commit and expose it as an environment
/// variable for the produced binary
pub fn set_env_git_commit_hash() -> Result<()> {
  let output = std::process::Command::new("git")
    .args(["rev-parse", "HEAD"])
    .output()?;
  let mut git_hash = String::from_utf8(output.stdout).unwrap_or_default();
  if git_hash.is_empty() {
    git_hash = "<unknown>".to_owned();
  }
  println!("cargo:rustc-env=GIT_HASH={git_hash}");
  Ok(())
}

/// Expose the target arch as an environment variable for the produced binary
pub fn set_env_target_arch() -> Result<()> {
  let arch = std::env::var("CARGO_CFG_TARGET_ARCH")
    .map_err(|e| Error::new(ErrorKind::Other, e))?;
  println!("cargo:rustc-env=TARGET_ARCH={arch}");
  Ok(())
}
