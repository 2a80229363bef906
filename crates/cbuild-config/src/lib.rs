//! Target configuration for the cbuild launcher.
//!
//! This crate provides:
//! - The target record model (source-based or raw command targets)
//! - Loading target sets from JSON or TOML documents
//! - Lookup of a target by name
//! - compile_commands.json entries for exporting a compile database
//!
//! # Example
//!
//! ```json
//! {
//!   "targets": [
//!     { "name": "app", "source_file": "main.c", "build_mode": "debug" },
//!     { "name": "docs", "command": "doxygen Doxyfile" }
//!   ]
//! }
//! ```
//!
//! The same set in TOML:
//!
//! ```toml
//! [[target]]
//! name = "app"
//! source_file = "main.c"
//! build_mode = "debug"
//! flags = ["-Wall"]
//! libs = ["-lm"]
//!
//! [[target]]
//! name = "docs"
//! command = "doxygen Doxyfile"
//! ```

mod compile_commands;
mod config;
mod error;

pub use compile_commands::{CompileCommand, CompileCommands};
pub use config::{load, load_or_empty, ConfigFormat, SourceBuild, Target, TargetKind, TargetSet};
pub use error::{ConfigError, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_config() {
        let json = r#"
        {
            "targets": [
                { "name": "app", "source_file": "main.c", "build_mode": "debug" }
            ]
        }
        "#;

        let set = TargetSet::from_json(json).expect("Failed to parse config");
        assert_eq!(set.len(), 1);
        assert_eq!(set.targets()[0].name, "app");
    }
}
