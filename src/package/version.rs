//! Version comparison for reconciliation.
//!
//! Only equality is ever needed: a package is either at the requested
//! version or it gets reinstalled. There is no "newer wins" ordering.

use semver::Version;

/// Ensure a version string carries a leading `v`. Empty stays empty.
pub fn normalize(v: &str) -> String {
    if v.is_empty() || v.starts_with('v') {
        v.to_string()
    } else {
        format!("v{}", v)
    }
}

/// Canonical semantic-version form of `v`, or `None` if it is not semver-like.
///
/// `1` and `1.2` are accepted as shorthands for `1.0.0` and `1.2.0` (without
/// prerelease or build suffixes). Build metadata is dropped; prerelease
/// identifiers are kept.
pub fn canonical(v: &str) -> Option<String> {
    let normalized = normalize(v);
    let body = normalized.strip_prefix('v')?;

    let padded = if body.contains(['-', '+']) {
        body.to_string()
    } else {
        match body.matches('.').count() {
            0 => format!("{}.0.0", body),
            1 => format!("{}.0", body),
            _ => body.to_string(),
        }
    };

    let parsed = Version::parse(&padded).ok()?;
    let mut out = format!("v{}.{}.{}", parsed.major, parsed.minor, parsed.patch);
    if !parsed.pre.is_empty() {
        out.push('-');
        out.push_str(parsed.pre.as_str());
    }
    Some(out)
}

/// Decide whether an installed version satisfies a desired one.
///
/// Two empty versions are equal, empty vs non-empty never is. When both sides
/// are semver-like their canonical forms are compared; otherwise the strings
/// are compared exactly after dropping a leading `v`, so distinct non-semver
/// versions (e.g. `2.47.1.windows.1` vs `2.46.0.windows.1`) stay distinct.
pub fn equal(a: &str, b: &str) -> bool {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return true,
        (true, false) | (false, true) => return false,
        _ => {}
    }

    match (canonical(a), canonical(b)) {
        (Some(ca), Some(cb)) => ca == cb,
        _ => strip_v(a) == strip_v(b),
    }
}

pub fn is_empty(v: &str) -> bool {
    v.is_empty()
}

fn strip_v(v: &str) -> &str {
    v.strip_prefix('v').unwrap_or(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("1.0.0"), "v1.0.0");
        assert_eq!(normalize("v1.0.0"), "v1.0.0");
        assert_eq!(normalize("2.3.4"), "v2.3.4");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_canonical_full_versions() {
        assert_eq!(canonical("1.2.3").as_deref(), Some("v1.2.3"));
        assert_eq!(canonical("v1.2.3").as_deref(), Some("v1.2.3"));
        assert_eq!(canonical("1.2.3-rc.1").as_deref(), Some("v1.2.3-rc.1"));
    }

    #[test]
    fn test_canonical_shorthands_are_padded() {
        assert_eq!(canonical("1").as_deref(), Some("v1.0.0"));
        assert_eq!(canonical("v1.2").as_deref(), Some("v1.2.0"));
    }

    #[test]
    fn test_canonical_drops_build_metadata() {
        assert_eq!(canonical("1.2.3+build.5").as_deref(), Some("v1.2.3"));
    }

    #[test]
    fn test_canonical_rejects_non_semver() {
        assert_eq!(canonical(""), None);
        assert_eq!(canonical("v"), None);
        assert_eq!(canonical("latest"), None);
        assert_eq!(canonical("2.47.1.windows.1"), None);
        assert_eq!(canonical("01.2.3"), None);
        assert_eq!(canonical("1.2-beta"), None);
    }

    #[test]
    fn test_equal_with_and_without_prefix() {
        assert!(equal("1.0.0", "1.0.0"));
        assert!(equal("v1.0.0", "v1.0.0"));
        assert!(equal("1.0.0", "v1.0.0"));
        assert!(equal("v1.0.0", "1.0.0"));
    }

    #[test]
    fn test_equal_detects_differences() {
        assert!(!equal("1.0.0", "1.0.1"));
        assert!(!equal("v2.0.0", "v2.0.1"));
        assert!(!equal("1.0.0", "2.0.0"));
        assert!(!equal("1.0.0-rc.1", "1.0.0"));
    }

    #[test]
    fn test_equal_uses_canonical_form() {
        assert!(equal("1.2", "1.2.0"));
        assert!(equal("v1", "1.0.0"));
        assert!(equal("1.2.3+win64", "1.2.3"));
    }

    #[test]
    fn test_equal_empty_versions() {
        assert!(equal("", ""));
        assert!(!equal("", "1.0.0"));
        assert!(!equal("1.0.0", ""));
    }

    #[test]
    fn test_equal_non_semver_versions_compare_exactly() {
        assert!(equal("2.47.1.windows.1", "2.47.1.windows.1"));
        assert!(equal("v2.47.1.windows.1", "2.47.1.windows.1"));
        assert!(!equal("2.47.1.windows.1", "2.46.0.windows.1"));
        assert!(!equal("latest", "nightly"));
    }

    #[test]
    fn test_is_empty() {
        assert!(is_empty(""));
        assert!(!is_empty("1.0.0"));
        assert!(!is_empty("   "));
    }
}
