//! Package specifications (`name` or `name@version`)

use std::fmt;

/// Version sentinel for unversioned packages.
pub const WILDCARD: &str = "*";

/// A package name with an optional version.
///
/// Canonical form is `name@version` for versioned specs and bare `name`
/// otherwise. The rightmost `@` separates the version, so `node@lts@20`
/// has name `node@lts` and version `20`. An empty or `*` version means
/// unversioned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageSpec {
    name: String,
    version: Option<String>,
}

impl PackageSpec {
    pub fn new(name: impl Into<String>, version: Option<&str>) -> Self {
        let version = version
            .map(str::trim)
            .filter(|v| !v.is_empty() && *v != WILDCARD)
            .map(str::to_string);
        Self {
            name: name.into(),
            version,
        }
    }

    /// Parse a user-supplied spec string.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.rfind('@') {
            Some(pos) if pos > 0 => Self::new(&raw[..pos], Some(&raw[pos + 1..])),
            _ => Self::new(raw, None),
        }
    }

    /// Rebuild a spec from a manifest `key = "version"` pair.
    ///
    /// Keys may already be full specs (`python@3.11 = "*"`) or bare names
    /// carrying the version in the value (`python = "3.11"`).
    pub fn from_entry(key: &str, version: &str) -> Self {
        let parsed = Self::parse(key);
        if parsed.is_versioned() {
            parsed
        } else {
            Self::new(parsed.name, Some(version))
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The version, or `*` when unversioned.
    pub fn version_or_wildcard(&self) -> &str {
        self.version.as_deref().unwrap_or(WILDCARD)
    }

    pub fn is_versioned(&self) -> bool {
        self.version.is_some()
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}

impl From<&str> for PackageSpec {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("python@3.11", "python", Some("3.11"), "python@3.11")]
    #[case("rust", "rust", None, "rust")]
    #[case("node@lts@20", "node@lts", Some("20"), "node@lts@20")]
    #[case("package@", "package", None, "package")]
    #[case("python@*", "python", None, "python")]
    #[case("  go  ", "go", None, "go")]
    #[case("@scope", "@scope", None, "@scope")]
    fn parses_specs(
        #[case] raw: &str,
        #[case] name: &str,
        #[case] version: Option<&str>,
        #[case] canonical: &str,
    ) {
        let spec = PackageSpec::parse(raw);
        assert_eq!(spec.name(), name);
        assert_eq!(spec.version(), version);
        assert_eq!(spec.to_string(), canonical);
    }

    #[rstest]
    #[case("python@3.11", "*", "python@3.11")]
    #[case("python", "3.11", "python@3.11")]
    #[case("rust", "*", "rust")]
    #[case("python@3.11", "3.11", "python@3.11")]
    fn rebuilds_from_manifest_entries(
        #[case] key: &str,
        #[case] version: &str,
        #[case] canonical: &str,
    ) {
        assert_eq!(PackageSpec::from_entry(key, version).to_string(), canonical);
    }

    #[test]
    fn wildcard_for_unversioned() {
        assert_eq!(PackageSpec::parse("rust").version_or_wildcard(), WILDCARD);
        assert_eq!(PackageSpec::parse("node@20").version_or_wildcard(), "20");
    }
}
