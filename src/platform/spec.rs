//! The platform descriptor and its textual forms.
//!
//! [`Platform`] mirrors the OCI image-spec platform object, so it can be read
//! straight out of an image index with serde. Matching always works on the
//! normalized form: OS and architecture aliases are collapsed onto the names
//! used by OCI (`darwin`, `amd64`, `arm64`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpecifierError;

/// Platform a container image was built for, or the host runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Platform {
    pub architecture: String,
    pub os: String,
    #[serde(
        rename = "os.version",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub os_version: String,
    #[serde(
        rename = "os.features",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub os_features: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub variant: String,
}

impl Platform {
    pub fn new(os: impl Into<String>, architecture: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            architecture: architecture.into(),
            ..Default::default()
        }
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = variant.into();
        self
    }

    pub fn with_os_version(mut self, os_version: impl Into<String>) -> Self {
        self.os_version = os_version.into();
        self
    }

    /// Returns a copy with OS and architecture aliases resolved.
    ///
    /// `os_version` and `os_features` are carried over untouched.
    pub fn normalize(&self) -> Self {
        let (architecture, variant) = normalize_arch(&self.architecture, &self.variant);
        Self {
            os: normalize_os(&self.os),
            architecture,
            variant,
            os_version: self.os_version.clone(),
            os_features: self.os_features.clone(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.architecture)?;
        if !self.variant.is_empty() {
            write!(f, "/{}", self.variant)?;
        }
        Ok(())
    }
}

impl FromStr for Platform {
    type Err = SpecifierError;

    /// Parse `os`, `os/arch` or `os/arch/variant`.
    ///
    /// Omitted parts are taken from the host. The result is normalized.
    fn from_str(specifier: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = specifier.split('/').collect();
        for part in &parts {
            if part.is_empty() {
                return Err(SpecifierError::EmptyComponent(specifier.to_string()));
            }
            if let Some(found) = part
                .chars()
                .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
            {
                return Err(SpecifierError::InvalidCharacter {
                    specifier: specifier.to_string(),
                    found,
                });
            }
        }

        let platform = match *parts.as_slice() {
            [os] => {
                let host = super::host::default_spec();
                Platform::new(os, host.architecture).with_variant(host.variant)
            }
            [os, arch] => Platform::new(os, arch),
            [os, arch, variant] => Platform::new(os, arch).with_variant(variant),
            _ => return Err(SpecifierError::TooManyComponents(specifier.to_string())),
        };

        Ok(platform.normalize())
    }
}

/// Resolve OS aliases to their OCI name.
pub fn normalize_os(os: &str) -> String {
    let os = os.to_lowercase();
    match os.as_str() {
        "macos" => "darwin".to_string(),
        _ => os,
    }
}

/// Resolve architecture aliases, adjusting the variant where the alias
/// implies one.
pub fn normalize_arch(arch: &str, variant: &str) -> (String, String) {
    let arch = arch.to_lowercase();
    let variant = variant.to_lowercase();

    match arch.as_str() {
        "i386" => ("386".to_string(), String::new()),
        "x86_64" | "x86-64" | "amd64" => {
            let variant = if variant == "v1" { String::new() } else { variant };
            ("amd64".to_string(), variant)
        }
        "aarch64" | "arm64" => {
            let variant = match variant.as_str() {
                "8" | "v8" => String::new(),
                _ => variant,
            };
            ("arm64".to_string(), variant)
        }
        "armhf" => ("arm".to_string(), "v7".to_string()),
        "armel" => ("arm".to_string(), "v6".to_string()),
        "arm" => {
            let variant = match variant.as_str() {
                "" | "7" => "v7".to_string(),
                "5" | "6" | "8" => format!("v{}", variant),
                _ => variant,
            };
            ("arm".to_string(), variant)
        }
        _ => (arch, variant),
    }
}
