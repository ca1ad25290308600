//! file: core/src/target.rs
//! description: output platform selection.
//!
//! `Target` is descriptive metadata only: the caller stamps the chosen
//! triple onto an `IrModule` before or after lowering. The lowering engine
//! itself never looks at it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    WindowsX86,
    WindowsX64,
    LinuxX86,
    LinuxX64,
    #[serde(rename = "wasm32")]
    WebAssembly,
}

impl Target {
    pub const ALL: [Target; 5] = [
        Target::WindowsX86,
        Target::WindowsX64,
        Target::LinuxX86,
        Target::LinuxX64,
        Target::WebAssembly,
    ];

    pub fn triple(&self) -> &'static str {
        match self {
            Target::WindowsX86 => "i686-pc-windows-msvc",
            Target::WindowsX64 => "x86_64-pc-windows-msvc",
            Target::LinuxX86 => "i686-pc-linux-gnu",
            Target::LinuxX64 => "x86_64-pc-linux-gnu",
            Target::WebAssembly => "wasm32-unknown-unknown",
        }
    }

    /// Short name used on the command line and in config files.
    pub fn name(&self) -> &'static str {
        match self {
            Target::WindowsX86 => "windows-x86",
            Target::WindowsX64 => "windows-x64",
            Target::LinuxX86 => "linux-x86",
            Target::LinuxX64 => "linux-x64",
            Target::WebAssembly => "wasm32",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s || t.triple() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Target::ALL.iter().map(|t| t.name()).collect();
                format!("unknown target '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}
