//! `zarrs_fixtures` version information.
//!
//! The fixture generator records these in the root attributes of every native fixture and prints them as a banner.

/// The `zarrs_fixtures` major version.
#[must_use]
pub const fn version_major() -> &'static str {
    env!("CARGO_PKG_VERSION_MAJOR")
}

/// The `zarrs_fixtures` minor version.
#[must_use]
pub const fn version_minor() -> &'static str {
    env!("CARGO_PKG_VERSION_MINOR")
}

/// The `zarrs_fixtures` patch version.
#[must_use]
pub const fn version_patch() -> &'static str {
    env!("CARGO_PKG_VERSION_PATCH")
}

/// A string representation of the `zarrs_fixtures` version.
///
/// Matches the `CARGO_PKG_VERSION`.
#[must_use]
pub const fn version_str() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// The `rustc --version` output of the compiler that built this crate.
#[must_use]
pub const fn rustc_version_str() -> &'static str {
    env!("ZARRS_FIXTURES_RUSTC_VERSION")
}

/// The version banner printed by the fixture generator.
#[must_use]
pub fn banner() -> String {
    format!(
        "{}\nzarrs_fixtures {}",
        rustc_version_str(),
        version_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_components() {
        let version = format!("{}.{}.{}", version_major(), version_minor(), version_patch());
        assert!(version_str().starts_with(&version));
        assert!(banner().contains(version_str()));
    }
}
