//! OS-version aware matching for Windows hosts.
//!
//! Process-isolated Windows containers need an image built for the host's
//! exact `major.minor.build`. From RS5 on, Hyper-V isolation runs both older
//! and newer images, so hosts at or past that build accept any OS version.

use log::debug;

use super::Platform;
use super::matcher::{BaseMatcher, MatchComparer, Matcher};
use crate::diagnostics::{DiagnosticSink, LogSink};
use crate::error::VersionError;

/// First Windows build (1809, "RS5") whose Hyper-V isolation runs older images.
pub const RS5_BUILD: u16 = 17763;

/// Wraps a base OS/architecture matcher with the Windows build policy.
pub struct VersionAwareMatcher<M = BaseMatcher, S = LogSink> {
    platform: Platform,
    os_version_prefix: String,
    base: M,
    sink: S,
}

impl VersionAwareMatcher {
    /// Matcher for `platform` backed by a [`BaseMatcher`] and the log.
    pub fn new(platform: &Platform) -> Self {
        Self::with_parts(platform, BaseMatcher::new(platform), LogSink)
    }
}

impl<M: Matcher, S: DiagnosticSink> VersionAwareMatcher<M, S> {
    pub fn with_parts(platform: &Platform, base: M, sink: S) -> Self {
        let platform = platform.normalize();
        let os_version_prefix = prefix(&platform.os_version).to_string();
        debug!(
            "Matching against {} with OS version prefix {:?}",
            platform, os_version_prefix
        );
        Self {
            platform,
            os_version_prefix,
            base,
            sink,
        }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn os_version_prefix(&self) -> &str {
        &self.os_version_prefix
    }

    /// Parse the cached prefix and return its build number.
    pub fn build_number(&self) -> Result<u16, VersionError> {
        let version = &self.os_version_prefix;
        let parts: Vec<&str> = version.split('.').collect();
        if parts.len() != 3 {
            return Err(VersionError::ComponentCount {
                version: version.clone(),
                found: parts.len(),
            });
        }

        let build = parts[2];
        if build.is_empty() || !build.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VersionError::NonNumeric {
                version: version.clone(),
                component: build.to_string(),
            });
        }

        build.parse::<u16>().map_err(|source| VersionError::OutOfRange {
            version: version.clone(),
            source,
        })
    }
}

impl<M: Matcher, S: DiagnosticSink> Matcher for VersionAwareMatcher<M, S> {
    /// Matches platforms with the same Windows major, minor and build
    /// version, or any version once the host is at RS5 or later.
    fn matches(&self, platform: &Platform) -> bool {
        if !self.base.matches(platform) {
            return false;
        }
        if self.platform.os != "windows" {
            return true;
        }

        match self.build_number() {
            Ok(build) if build >= RS5_BUILD => return true,
            Ok(_) => {}
            Err(e) => self.sink.malformed_version(&self.os_version_prefix, &e),
        }

        platform.os_version.starts_with(&self.os_version_prefix)
    }
}

impl<M: Matcher, S: DiagnosticSink> MatchComparer for VersionAwareMatcher<M, S> {
    /// Matched platforms sort in front of the rest; among matches the
    /// larger revision goes first.
    fn less(&self, a: &Platform, b: &Platform) -> bool {
        let (m1, m2) = (self.matches(a), self.matches(b));
        if m1 && m2 {
            return revision(&a.os_version) > revision(&b.os_version);
        }
        m1 && !m2
    }
}

/// The 4th dotted component, or 0 when absent or not a number.
pub fn revision(version: &str) -> i64 {
    version
        .split('.')
        .nth(3)
        .and_then(|r| r.parse().ok())
        .unwrap_or(0)
}

/// Strip the revision from a 4-component version.
///
/// Shorter versions are returned unchanged.
pub fn prefix(version: &str) -> &str {
    match version.match_indices('.').nth(2) {
        Some((idx, _)) => &version[..idx],
        None => version,
    }
}
