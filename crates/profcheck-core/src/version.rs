//! Dot-separated numeric versions.
//!
//! A [`Version`] is an ordered tuple of non-negative integers. Comparison is
//! lexicographic with missing trailing components treated as `0`, so `3.4`
//! and `3.4.0` are equal while `3.4.6` is greater than both.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::error::VersionParseError;

/// A parsed, immutable version tuple.
#[derive(Debug, Clone)]
pub struct Version {
    components: Vec<u64>,
}

impl Version {
    /// Parse a dot-separated version string such as `3.4.6`.
    ///
    /// Surrounding whitespace is ignored. Every component must be a
    /// non-empty run of ASCII digits that fits in a `u64`.
    pub fn parse(input: &str) -> Result<Self, VersionParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(VersionParseError::invalid(input, "version string is empty"));
        }

        let mut components = Vec::new();
        for (idx, part) in trimmed.split('.').enumerate() {
            if part.is_empty() {
                return Err(VersionParseError::invalid(
                    input,
                    format!("component {} is empty", idx + 1),
                ));
            }
            if !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionParseError::invalid(
                    input,
                    format!("component '{}' is not numeric", part),
                ));
            }
            let value = part.parse::<u64>().map_err(|_| {
                VersionParseError::invalid(input, format!("component '{}' is out of range", part))
            })?;
            components.push(value);
        }

        Ok(Self { components })
    }

    /// Build a version directly from its components.
    ///
    /// An empty slice yields `0`.
    pub fn from_components(components: &[u64]) -> Self {
        if components.is_empty() {
            return Self {
                components: vec![0],
            };
        }
        Self {
            components: components.to_vec(),
        }
    }

    /// The raw components as parsed.
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Component at `idx`, or `0` when the tuple is shorter.
    pub fn component(&self, idx: usize) -> u64 {
        self.components.get(idx).copied().unwrap_or(0)
    }

    pub fn major(&self) -> u64 {
        self.component(0)
    }

    pub fn minor(&self) -> u64 {
        self.component(1)
    }

    pub fn patch(&self) -> u64 {
        self.component(2)
    }

    /// Components with trailing zeros removed; equal versions share this form.
    fn significant(&self) -> &[u64] {
        let len = self
            .components
            .iter()
            .rposition(|c| *c != 0)
            .map_or(0, |pos| pos + 1);
        &self.components[..len]
    }
}

/// Compare two versions, padding the shorter one with zeros.
pub fn compare(a: &Version, b: &Version) -> Ordering {
    let len = a.components.len().max(b.components.len());
    for idx in 0..len {
        match a.component(idx).cmp(&b.component(idx)) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        compare(self, other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(|c| c.to_string()).collect();
        f.write_str(&parts.join("."))
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Version::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn v(s: &str) -> Version {
        Version::parse(s).expect("valid version")
    }

    #[test]
    fn test_parse_components() {
        assert_eq!(v("3.4.6").components(), &[3, 4, 6]);
        assert_eq!(v("7").components(), &[7]);
        assert_eq!(v(" 0.37.1\n").components(), &[0, 37, 1]);
    }

    #[test]
    fn test_parse_rejects_empty_and_non_numeric() {
        for bad in ["", "   ", "3..4", ".3", "3.", "3.4-preview1", "a.b", "+3.4", "-1", "3.4.x"] {
            let err = Version::parse(bad).expect_err(bad);
            assert!(
                matches!(err, VersionParseError::InvalidFormat { .. }),
                "{bad} should be InvalidFormat"
            );
        }
    }

    #[test]
    fn test_parse_rejects_overflowing_component() {
        let err = Version::parse("99999999999999999999999.1").unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_compare_padding() {
        assert_eq!(compare(&v("3.4.6"), &v("3.4.0")), Ordering::Greater);
        assert_eq!(compare(&v("3.4"), &v("3.4.0")), Ordering::Equal);
        assert_eq!(compare(&v("3.3.9"), &v("3.4")), Ordering::Less);
        assert_eq!(compare(&v("10.0"), &v("9.99.99")), Ordering::Greater);
    }

    #[test]
    fn test_equal_versions_hash_equally() {
        let mut set = HashSet::new();
        set.insert(v("3.4"));
        assert!(set.contains(&v("3.4.0.0")));
        assert!(!set.contains(&v("3.4.1")));
    }

    #[test]
    fn test_display_keeps_original_components() {
        assert_eq!(v("3.4").to_string(), "3.4");
        assert_eq!(v("3.4.0").to_string(), "3.4.0");
    }

    #[test]
    fn test_accessors() {
        let version = v("3.4");
        assert_eq!(version.major(), 3);
        assert_eq!(version.minor(), 4);
        assert_eq!(version.patch(), 0);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&v("0.37.1")).unwrap();
        assert_eq!(json, "\"0.37.1\"");
        let back: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v("0.37.1"));
        assert!(serde_json::from_str::<Version>("\"x.y\"").is_err());
    }
}
