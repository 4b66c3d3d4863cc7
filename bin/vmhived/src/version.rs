/// Architecture of the processor the binary was built for
pub const ARCH: &str = env!("TARGET_ARCH");
/// The version of Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// The commit id the binary was built from
pub const COMMIT_ID: &str = env!("GIT_HASH");
