//! file: core/src/config.rs
//! description: compile options and their JSON loader.
//!
//! Options are normally built in code or by the CLI; a JSON file with the
//! same field names can be loaded with `CompileOptions::load_from_file`.
//! Missing fields fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::target::Target;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Output platform stamped on the module after lowering.
    #[serde(default)]
    pub target: Option<Target>,
    /// Lower functions strictly top to bottom without registering every
    /// signature first. Calls to functions declared later in the unit then
    /// fail with `UndefinedFunction`.
    #[serde(default)]
    pub single_pass: bool,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_single_pass(mut self, single_pass: bool) -> Self {
        self.single_pass = single_pass;
        self
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<CompileOptions, String> {
        let raw = std::fs::read_to_string(&path).map_err(|e| format!("read config: {}", e))?;
        serde_json::from_str(&raw).map_err(|e| format!("parse config: {}", e))
    }
}
