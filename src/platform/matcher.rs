use std::cmp::Ordering;

use super::Platform;

/// Decides whether a candidate platform can run on a reference platform.
pub trait Matcher: Send + Sync {
    fn matches(&self, platform: &Platform) -> bool;
}

/// A [`Matcher`] that can also rank the candidates it accepts.
pub trait MatchComparer: Matcher {
    /// Returns true if `a` should be preferred over `b`.
    ///
    /// Must be irreflexive: `less(x, x)` is false for every `x`.
    fn less(&self, a: &Platform, b: &Platform) -> bool;

    /// Orders `a` and `b` so that preferred platforms sort first.
    fn compare(&self, a: &Platform, b: &Platform) -> Ordering {
        if self.less(a, b) {
            Ordering::Less
        } else if self.less(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Sort `platforms` by preference, keeping the input order among equals.
    fn sort(&self, platforms: &mut [Platform]) {
        platforms.sort_by(|a, b| self.compare(a, b));
    }

    /// Pick the most preferred matching platform
    ///
    /// Returns `None` if nothing matches
    fn select<'a>(&self, platforms: &'a [Platform]) -> Option<&'a Platform> {
        platforms
            .iter()
            .filter(|p| self.matches(p))
            .min_by(|a, b| self.compare(a, b))
    }
}

/// Matches on OS, architecture and, when the reference sets one, variant.
///
/// Both sides are normalized first, so `x86_64` matches `amd64` and an
/// `arm64/v8` reference matches a plain `arm64` candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseMatcher {
    platform: Platform,
}

impl BaseMatcher {
    pub fn new(platform: &Platform) -> Self {
        Self {
            platform: platform.normalize(),
        }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }
}

impl Matcher for BaseMatcher {
    fn matches(&self, platform: &Platform) -> bool {
        let candidate = platform.normalize();
        self.platform.os == candidate.os
            && self.platform.architecture == candidate.architecture
            && (self.platform.variant.is_empty() || self.platform.variant == candidate.variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_matcher_os_and_arch() {
        // --- Setup ---
        let matcher = BaseMatcher::new(&Platform::new("linux", "amd64"));

        // --- Execute & Verify ---
        assert!(matcher.matches(&Platform::new("linux", "amd64")));
        assert!(matcher.matches(&Platform::new("Linux", "x86_64")));
        assert!(!matcher.matches(&Platform::new("windows", "amd64")));
        assert!(!matcher.matches(&Platform::new("linux", "arm64")));
    }

    #[test]
    fn test_base_matcher_ignores_os_version() {
        let matcher =
            BaseMatcher::new(&Platform::new("linux", "amd64").with_os_version("6.8.0"));

        assert!(matcher.matches(&Platform::new("linux", "amd64").with_os_version("anything")));
        assert!(matcher.matches(&Platform::new("linux", "amd64")));
    }

    #[test]
    fn test_base_matcher_variant_wildcard() {
        // Reference without a variant accepts any variant
        let matcher = BaseMatcher::new(&Platform::new("linux", "amd64"));
        assert!(matcher.matches(&Platform::new("linux", "amd64").with_variant("v3")));

        // Reference with a variant requires the same one
        let matcher = BaseMatcher::new(&Platform::new("linux", "arm").with_variant("v6"));
        assert!(matcher.matches(&Platform::new("linux", "arm").with_variant("6")));
        assert!(!matcher.matches(&Platform::new("linux", "arm").with_variant("v7")));
        assert!(!matcher.matches(&Platform::new("linux", "arm")));
    }

    #[test]
    fn test_base_matcher_arm64_v8_host() {
        // Hosts report arm64/v8; images usually omit the variant
        let matcher = BaseMatcher::new(&Platform::new("linux", "arm64").with_variant("v8"));

        assert!(matcher.matches(&Platform::new("linux", "arm64")));
        assert!(matcher.matches(&Platform::new("linux", "aarch64").with_variant("v8")));
    }

    /// Prefers matching platforms, then lexically smaller variants.
    struct VariantComparer(BaseMatcher);

    impl Matcher for VariantComparer {
        fn matches(&self, platform: &Platform) -> bool {
            self.0.matches(platform)
        }
    }

    impl MatchComparer for VariantComparer {
        fn less(&self, a: &Platform, b: &Platform) -> bool {
            match (self.matches(a), self.matches(b)) {
                (true, true) => a.variant < b.variant,
                (m1, m2) => m1 && !m2,
            }
        }
    }

    #[test]
    fn test_sort_and_select() {
        // --- Setup ---
        let comparer = VariantComparer(BaseMatcher::new(&Platform::new("linux", "amd64")));
        let mut platforms = vec![
            Platform::new("windows", "amd64"),
            Platform::new("linux", "amd64").with_variant("v3"),
            Platform::new("darwin", "arm64"),
            Platform::new("linux", "amd64").with_variant("v2"),
        ];

        // --- Execute ---
        let selected = comparer.select(&platforms).cloned();
        comparer.sort(&mut platforms);

        // --- Verify ---
        assert_eq!(
            selected,
            Some(Platform::new("linux", "amd64").with_variant("v2"))
        );
        assert_eq!(
            platforms,
            vec![
                Platform::new("linux", "amd64").with_variant("v2"),
                Platform::new("linux", "amd64").with_variant("v3"),
                // Non-matching platforms keep their relative order
                Platform::new("windows", "amd64"),
                Platform::new("darwin", "arm64"),
            ]
        );
    }

    #[test]
    fn test_select_none_when_nothing_matches() {
        let comparer = VariantComparer(BaseMatcher::new(&Platform::new("linux", "amd64")));
        let platforms = vec![Platform::new("windows", "amd64")];

        assert!(comparer.select(&platforms).is_none());
        assert!(comparer.select(&[]).is_none());
    }
}
