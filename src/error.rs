//! Errors raised while reading dotted Windows version strings.

use std::num::ParseIntError;

/// A version string could not be reduced to a build number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The version did not have exactly `major.minor.build` components
    ComponentCount { version: String, found: usize },
    /// The build component contained something other than decimal digits
    NonNumeric { version: String, component: String },
    /// The build component does not fit in 16 bits
    OutOfRange {
        version: String,
        source: ParseIntError,
    },
}

impl std::fmt::Display for VersionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionError::ComponentCount { version, found } => {
                write!(
                    f,
                    "failed to split windows version {:?}: needs exactly 3 dot-separated elements, found {}",
                    version, found
                )
            }
            VersionError::NonNumeric { version, component } => {
                write!(
                    f,
                    "build number {:?} in windows version {:?} is not a decimal number",
                    component, version
                )
            }
            VersionError::OutOfRange { version, source } => {
                write!(
                    f,
                    "build number in windows version {:?} is out of range: {}",
                    version, source
                )
            }
        }
    }
}

impl std::error::Error for VersionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VersionError::OutOfRange { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A platform specifier such as `windows/amd64` could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecifierError {
    /// One of the slash-separated parts was empty
    EmptyComponent(String),
    /// More than `os/arch/variant`
    TooManyComponents(String),
    /// A part contained a character outside `[A-Za-z0-9_-]`
    InvalidCharacter { specifier: String, found: char },
}

impl std::fmt::Display for SpecifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecifierError::EmptyComponent(s) => {
                write!(f, "invalid platform specifier {:?}: empty component", s)
            }
            SpecifierError::TooManyComponents(s) => {
                write!(
                    f,
                    "invalid platform specifier {:?}: expected os[/arch[/variant]]",
                    s
                )
            }
            SpecifierError::InvalidCharacter { specifier, found } => {
                write!(
                    f,
                    "invalid platform specifier {:?}: unexpected character {:?}",
                    specifier, found
                )
            }
        }
    }
}

impl std::error::Error for SpecifierError {}
