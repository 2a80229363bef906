//! Platform and toolchain identity.

use std::fmt;
use std::str::FromStr;

/// The compiler front end commands are resolved for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlatformToolchain {
    /// Unix-like host with `gcc`/`g++` on the PATH.
    PosixGcc,
    /// Windows with the MSVC `cl` driver.
    WindowsMsvc,
    /// Windows with MinGW-style `gcc`/`g++`.
    WindowsMingw,
    /// Any other host. Source builds fail to resolve here.
    Unsupported(String),
}

impl PlatformToolchain {
    /// The toolchain matching the platform this binary was compiled for.
    pub fn host() -> Self {
        if cfg!(unix) {
            PlatformToolchain::PosixGcc
        } else if cfg!(all(windows, target_env = "msvc")) {
            PlatformToolchain::WindowsMsvc
        } else if cfg!(all(windows, target_env = "gnu")) {
            PlatformToolchain::WindowsMingw
        } else {
            PlatformToolchain::Unsupported(format!(
                "{}-{}",
                std::env::consts::OS,
                std::env::consts::ARCH
            ))
        }
    }

    /// Stable identifier used on the command line.
    pub fn as_str(&self) -> &str {
        match self {
            PlatformToolchain::PosixGcc => "posix-gcc",
            PlatformToolchain::WindowsMsvc => "msvc",
            PlatformToolchain::WindowsMingw => "mingw",
            PlatformToolchain::Unsupported(host) => host,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, PlatformToolchain::Unsupported(_))
    }

    /// Identifiers accepted by [`FromStr`].
    pub fn known() -> &'static [&'static str] {
        &["posix-gcc", "msvc", "mingw"]
    }
}

impl fmt::Display for PlatformToolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformToolchain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "posix-gcc" => Ok(PlatformToolchain::PosixGcc),
            "msvc" => Ok(PlatformToolchain::WindowsMsvc),
            "mingw" => Ok(PlatformToolchain::WindowsMingw),
            other => Err(format!(
                "unknown toolchain '{}', expected one of: {}",
                other,
                Self::known().join(", ")
            )),
        }
    }
}
