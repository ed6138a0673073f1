//! Version information

/// Crate version as recorded by cargo
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the version string shown in logs and `--version`
pub fn get_version() -> &'static str {
    VERSION
}
