//! Platform detection and matching module
//!
//! This module detects the host's default platform and decides which
//! candidate image platforms can run on it, and in what order they should
//! be preferred.

pub mod host;
mod matcher;
mod spec;
mod version_aware;

pub use host::{HostInfo, KernelVersion, RealHost, default_spec, spec_for_host};
pub use matcher::{BaseMatcher, MatchComparer, Matcher};
pub use spec::{Platform, normalize_arch, normalize_os};
pub use version_aware::{RS5_BUILD, VersionAwareMatcher, prefix, revision};

/// Returns a matcher for the current host's default platform.
pub fn default_matcher() -> VersionAwareMatcher {
    VersionAwareMatcher::new(&default_spec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matcher_accepts_default_spec() {
        let matcher = default_matcher();
        let host = default_spec();

        assert!(matcher.matches(&host));
        assert!(!matcher.less(&host, &host));
    }

    #[test]
    fn test_default_matcher_rejects_other_os() {
        let matcher = default_matcher();
        let host = default_spec();
        let other = Platform::new(
            if host.os == "plan9" { "linux" } else { "plan9" },
            host.architecture.clone(),
        );

        assert!(!matcher.matches(&other));
        assert!(matcher.less(&host, &other));
    }
}
