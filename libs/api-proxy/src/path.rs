use std::borrow::Borrow;
use std::fmt;

/// Canonical endpoint identifier: `/`-delimited, no leading or trailing `/`.
///
/// Produced by [`EndpointPath::normalize`], which accepts both dotted
/// (`user.account.login`) and slashed (`/user/account/login/`) spellings.
/// Case is preserved and internal repeated slashes are kept as-is, so
/// `a//b` has an empty middle segment. The empty path is valid and names the
/// root namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointPath(String);

impl EndpointPath {
    /// Canonicalize a raw endpoint identifier.
    ///
    /// Every `.` becomes `/`, surrounding whitespace is trimmed, then all
    /// leading and trailing `/` are stripped. Never fails.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let replaced = raw.replace('.', "/");
        Self(replaced.trim().trim_matches('/').to_owned())
    }

    /// Join already-canonical segments.
    pub(crate) fn from_segments(segments: &[&str]) -> Self {
        Self(segments.join("/"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Path segments in order. The empty path has no segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|_| !self.0.is_empty())
    }
}

impl fmt::Display for EndpointPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EndpointPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EndpointPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_and_slashed_spellings_agree() {
        let dotted = EndpointPath::normalize("user.account.login");
        let slashed = EndpointPath::normalize("/user/account/login/");
        assert_eq!(dotted, slashed);
        assert_eq!(dotted.as_str(), "user/account/login");
    }

    #[test]
    fn test_strips_every_surrounding_slash() {
        assert_eq!(EndpointPath::normalize("///a/b///").as_str(), "a/b");
        assert_eq!(EndpointPath::normalize("..a.b..").as_str(), "a/b");
    }

    #[test]
    fn test_trims_whitespace_before_slashes() {
        assert_eq!(EndpointPath::normalize("  /user/login/ \n").as_str(), "user/login");
    }

    #[test]
    fn test_keeps_internal_repeated_slashes_and_case() {
        let path = EndpointPath::normalize("Admin//Users");
        assert_eq!(path.as_str(), "Admin//Users");
        assert_eq!(path.segments().collect::<Vec<_>>(), vec!["Admin", "", "Users"]);
    }

    #[test]
    fn test_empty_and_degenerate_inputs() {
        assert!(EndpointPath::normalize("").is_empty());
        assert!(EndpointPath::normalize("/./").is_empty());
        assert_eq!(EndpointPath::normalize(" / . / ").as_str(), " / ");
        assert_eq!(EndpointPath::normalize("").segments().count(), 0);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = EndpointPath::normalize(".a.b/c/");
        let twice = EndpointPath::normalize(once.as_str());
        assert_eq!(once, twice);
    }
}
