// fshare-common/src/model/repo.rs
use std::fmt;

use crate::error::{FshareError, Result};

/// A remote package, addressed as `<owner>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    owner: String,
    name: String,
}

impl RepoRef {
    /// Parses `owner/name`. Surrounding slashes are ignored, so `/alice/tool/`
    /// is accepted; anything else that does not split into exactly two
    /// non-empty segments is rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim().trim_matches('/');
        let mut parts = trimmed.split('/');
        let (owner, name) = match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) => (owner, name),
            _ => return Err(FshareError::InvalidRepoRef(input.to_string())),
        };
        if !is_valid_segment(owner) || !is_valid_segment(name) {
            return Err(FshareError::InvalidRepoRef(input.to_string()));
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name the package is installed under.
    pub fn package_name(&self) -> PackageName {
        PackageName(self.name.clone())
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Name of an installed package. Always a single path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName(String);

impl PackageName {
    /// Accepts `name` or `owner/name`; only the name is kept.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim().trim_matches('/');
        let name = match trimmed.split_once('/') {
            Some((_, name)) if !name.contains('/') => name,
            Some(_) => return Err(FshareError::InvalidPackageName(input.to_string())),
            None => trimmed,
        };
        if !is_valid_segment(name) {
            return Err(FshareError::InvalidPackageName(input.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains('\\')
        && !segment.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_and_name() {
        let repo = RepoRef::parse("alice/tool").unwrap();
        assert_eq!(repo.owner(), "alice");
        assert_eq!(repo.name(), "tool");
        assert_eq!(repo.package_name().as_str(), "tool");
        assert_eq!(repo.to_string(), "alice/tool");
    }

    #[test]
    fn strips_surrounding_slashes() {
        let repo = RepoRef::parse("/alice/tool/").unwrap();
        assert_eq!(repo.to_string(), "alice/tool");
    }

    #[test]
    fn rejects_anything_but_one_separator() {
        for input in ["tool", "", "/", "alice//tool", "a/b/c", "alice/", "/tool", "../tool", "alice/.."] {
            assert!(
                matches!(RepoRef::parse(input), Err(FshareError::InvalidRepoRef(_))),
                "expected '{input}' to be rejected"
            );
        }
    }

    #[test]
    fn package_name_accepts_bare_and_qualified_forms() {
        assert_eq!(PackageName::parse("tool").unwrap().as_str(), "tool");
        assert_eq!(PackageName::parse("alice/tool").unwrap().as_str(), "tool");
    }

    #[test]
    fn package_name_rejects_traversal() {
        for input in ["", "..", "alice/..", "a/b/c", "alice/ /"] {
            assert!(PackageName::parse(input).is_err(), "expected '{input}' to be rejected");
        }
    }
}
