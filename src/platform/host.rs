//! Host platform detection.
//!
//! The live queries sit behind [`HostInfo`] so the formatting rules can be
//! exercised with a mock host.

use super::Platform;

/// Version numbers reported by the host kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KernelVersion {
    pub major: u16,
    pub minor: u16,
    pub build: u16,
}

impl std::fmt::Display for KernelVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}

/// Trait for querying the host (useful for testing)
#[cfg_attr(test, mockall::automock)]
pub trait HostInfo: Send + Sync {
    fn version_numbers(&self) -> KernelVersion;
    /// OCI name of the running operating system
    fn os(&self) -> String;
    /// OCI name of the CPU architecture this process runs on
    fn architecture(&self) -> String;
}

/// Queries the machine we are running on.
pub struct RealHost;

impl HostInfo for RealHost {
    #[tracing::instrument(skip(self))]
    fn version_numbers(&self) -> KernelVersion {
        sys::version_numbers()
    }

    fn os(&self) -> String {
        match std::env::consts::OS {
            "macos" => "darwin".to_string(),
            other => other.to_string(),
        }
    }

    fn architecture(&self) -> String {
        match std::env::consts::ARCH {
            "x86_64" => "amd64".to_string(),
            "aarch64" => "arm64".to_string(),
            "x86" => "386".to_string(),
            "powerpc64" if cfg!(target_endian = "little") => "ppc64le".to_string(),
            "powerpc64" => "ppc64".to_string(),
            "loongarch64" => "loong64".to_string(),
            other => other.to_string(),
        }
    }
}

/// Returns the current host's default platform.
pub fn default_spec() -> Platform {
    spec_for_host(&RealHost)
}

/// Build the default platform from whatever `host` reports.
pub fn spec_for_host(host: &impl HostInfo) -> Platform {
    let version = host.version_numbers();
    let architecture = host.architecture();
    Platform {
        os: host.os(),
        os_version: version.to_string(),
        // Empty unless the architecture is ARM.
        variant: cpu_variant(&architecture).to_string(),
        architecture,
        os_features: Vec::new(),
    }
}

/// Architecture profile for ARM hosts, empty for everything else.
pub fn cpu_variant(architecture: &str) -> &'static str {
    match architecture {
        "arm64" => "v8",
        "arm" => "v7",
        _ => "",
    }
}

#[cfg(windows)]
mod sys {
    use super::KernelVersion;

    #[link(name = "ntdll")]
    unsafe extern "system" {
        fn RtlGetNtVersionNumbers(major: *mut u32, minor: *mut u32, build: *mut u32);
    }

    pub fn version_numbers() -> KernelVersion {
        let (mut major, mut minor, mut build) = (0u32, 0u32, 0u32);
        // SAFETY: the three pointers refer to live, writable locals.
        unsafe { RtlGetNtVersionNumbers(&mut major, &mut minor, &mut build) };
        KernelVersion {
            major: major as u16,
            minor: minor as u16,
            // The high bits carry the checked/free build flag.
            build: (build & 0xffff) as u16,
        }
    }
}

#[cfg(unix)]
mod sys {
    use super::KernelVersion;

    pub fn version_numbers() -> KernelVersion {
        match nix::sys::utsname::uname() {
            Ok(uts) => super::parse_release(&uts.release().to_string_lossy()),
            Err(e) => {
                log::warn!("Failed to query kernel release: {}", e);
                KernelVersion::default()
            }
        }
    }
}

#[cfg(not(any(windows, unix)))]
mod sys {
    use super::KernelVersion;

    pub fn version_numbers() -> KernelVersion {
        KernelVersion::default()
    }
}

/// Read `major.minor.build` out of a kernel release such as `6.8.0-45-generic`.
///
/// Each component contributes its leading digits; anything missing is 0.
#[cfg_attr(not(unix), allow(dead_code))]
fn parse_release(release: &str) -> KernelVersion {
    let mut numbers = release.split('.').map(|part| {
        let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse::<u16>().unwrap_or(0)
    });
    KernelVersion {
        major: numbers.next().unwrap_or(0),
        minor: numbers.next().unwrap_or(0),
        build: numbers.next().unwrap_or(0),
    }
}
