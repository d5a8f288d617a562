//! Validation of package metadata and dotted version ordering.
//!
//! A module's declared metadata is checked once at load: the interface
//! version must fall inside [`SUPPORTED_AIP_VERSIONS`] and the module name
//! must be a plain identifier. The `version` field is a "dotted string"
//! compared segment-wise through [`DottedVersion`].

use std::cmp::Ordering;
use std::ops::RangeInclusive;

use aip_protocol::PackageMetadata;

use crate::error::HostError;

/// Interface versions this host can drive.
pub const SUPPORTED_AIP_VERSIONS: RangeInclusive<i32> = 1..=2;

/// Checks a loaded module's metadata before any instance is created.
///
/// # Errors
///
/// Returns [`HostError::InvalidModuleName`] when the module name violates
/// `[a-zA-Z_][a-zA-Z_0-9]*`, and [`HostError::UnsupportedAipVersion`] when
/// the declared interface version falls outside
/// [`SUPPORTED_AIP_VERSIONS`].
pub fn validate(metadata: &PackageMetadata) -> Result<(), HostError> {
    if !is_valid_module_name(&metadata.module) {
        return Err(HostError::InvalidModuleName {
            name: metadata.module.clone(),
        });
    }
    if !SUPPORTED_AIP_VERSIONS.contains(&metadata.aip_version) {
        return Err(HostError::UnsupportedAipVersion {
            module: metadata.module.clone(),
            found: metadata.aip_version,
            min: *SUPPORTED_AIP_VERSIONS.start(),
            max: *SUPPORTED_AIP_VERSIONS.end(),
        });
    }
    Ok(())
}

/// Returns `true` when `name` matches `[a-zA-Z_][a-zA-Z_0-9]*`.
#[must_use]
pub fn is_valid_module_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A package version as a dotted, segment-wise comparable string.
///
/// Segments that both parse as unsigned integers compare numerically;
/// any other pair compares lexically. A version that is a strict prefix of
/// another orders before it, so `1.2 < 1.2.1` and `1.2.3 < 1.2.3.rc1`.
///
/// # Example
///
/// ```
/// use aip_host::DottedVersion;
///
/// assert!(DottedVersion::new("1.3") < DottedVersion::new("1.10"));
/// assert!(DottedVersion::new("6.4.0") < DottedVersion::new("6.10"));
/// ```
#[derive(Debug, Clone)]
pub struct DottedVersion {
    raw: String,
}

impl DottedVersion {
    /// Wraps a dotted version string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Returns the version text as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }
}

impl std::fmt::Display for DottedVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for DottedVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DottedVersion {}

impl PartialOrd for DottedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DottedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut lhs = self.raw.split('.');
        let mut rhs = other.raw.split('.');
        loop {
            match (lhs.next(), rhs.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(a), Some(b)) => match compare_segments(a, b) {
                    Ordering::Equal => {}
                    unequal => return unequal,
                },
            }
        }
    }
}

/// Numeric comparison when both segments are integers, lexical otherwise.
fn compare_segments(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}
