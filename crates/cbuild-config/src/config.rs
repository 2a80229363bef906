//! Target records and target sets (cbuild.json / cbuild.toml format).

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::ConfigError;

/// Root configuration document.
///
/// JSON documents use a `targets` array, TOML documents use `[[target]]`
/// tables. Both spellings are accepted in either format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Document {
    #[serde(alias = "target", default)]
    targets: Vec<Target>,
}

/// One named buildable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Target name, also the output executable name for source builds.
    pub name: String,

    /// What the target builds from.
    #[serde(flatten)]
    pub kind: TargetKind,
}

/// Payload of a target record, selected by which fields are present.
///
/// A record carrying both `source_file` and `command` is a source build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetKind {
    /// Compile a single source file with the host toolchain.
    Source(SourceBuild),
    /// Run a fully formed shell command as-is.
    Command {
        #[serde(alias = "build_command")]
        command: String,
    },
}

/// A single-file compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBuild {
    pub source_file: String,

    /// Kept as written; it is validated when the target is resolved,
    /// and only on toolchains that care about it.
    pub build_mode: String,

    /// Extra compiler flags, passed after the mode flags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,

    /// Link inputs such as `-lm`, passed after the output name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub libs: Vec<String>,
}

impl SourceBuild {
    pub fn new(source_file: &str, build_mode: &str) -> Self {
        Self {
            source_file: source_file.to_string(),
            build_mode: build_mode.to_string(),
            flags: Vec::new(),
            libs: Vec::new(),
        }
    }

    /// Add compiler flags.
    pub fn with_flags(mut self, flags: &[&str]) -> Self {
        self.flags = flags.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Add link libraries.
    pub fn with_libs(mut self, libs: &[&str]) -> Self {
        self.libs = libs.iter().map(|s| s.to_string()).collect();
        self
    }
}

impl Target {
    /// Create a source-based target.
    pub fn source(name: &str, source_file: &str, build_mode: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: TargetKind::Source(SourceBuild::new(source_file, build_mode)),
        }
    }

    /// Create a source-based target with extra flags or libraries.
    pub fn with_source(name: &str, source: SourceBuild) -> Self {
        Self {
            name: name.to_string(),
            kind: TargetKind::Source(source),
        }
    }

    /// Create a command-based target.
    pub fn command(name: &str, command: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: TargetKind::Command {
                command: command.to_string(),
            },
        }
    }

    /// Short label for the payload shape.
    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            TargetKind::Source(_) => "source",
            TargetKind::Command { .. } => "command",
        }
    }
}

/// Document format, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// An ordered collection of targets.
///
/// Names are expected to be unique but this is not enforced; lookup
/// returns the first record with a matching name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    targets: Vec<Target>,
}

impl TargetSet {
    pub fn new(targets: Vec<Target>) -> Self {
        Self { targets }
    }

    /// Parse a JSON document.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let doc: Document = serde_json::from_str(json)?;
        Self::from_document(doc)
    }

    /// Parse a TOML document.
    pub fn from_toml(toml: &str) -> crate::Result<Self> {
        let doc: Document = toml::from_str(toml)?;
        Self::from_document(doc)
    }

    /// Load a target set from a JSON or TOML file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let format = ConfigFormat::from_path(path);
        debug!(path = %path.display(), ?format, "loading target config");

        match format {
            ConfigFormat::Json => Self::from_json(&content),
            ConfigFormat::Toml => Self::from_toml(&content),
        }
    }

    fn from_document(doc: Document) -> crate::Result<Self> {
        if let Some(pos) = doc.targets.iter().position(|t| t.name.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "target #{} has an empty name",
                pos + 1
            )));
        }
        Ok(Self::new(doc.targets))
    }

    /// Find a target by exact, case-sensitive name. First match wins.
    pub fn find(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// All targets in document order.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Target> {
        self.targets.iter()
    }

    /// Target names in document order.
    pub fn names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Names that appear more than once, each reported once, in order of
    /// their second occurrence.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();
        let mut reported = FxHashSet::default();
        let mut duplicates = Vec::new();

        for target in &self.targets {
            let name = target.name.as_str();
            if !seen.insert(name) && reported.insert(name) {
                duplicates.push(name);
            }
        }

        duplicates
    }
}

impl FromIterator<Target> for TargetSet {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TargetSet {
    type Item = &'a Target;
    type IntoIter = std::slice::Iter<'a, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}

/// Load a target set from a config file.
pub fn load(path: &Path) -> crate::Result<TargetSet> {
    TargetSet::from_file(path)
}

/// Load a target set, treating an unreadable or malformed config as empty.
///
/// The error is logged, so a later lookup reports the target as missing
/// rather than failing on the config itself.
pub fn load_or_empty(path: &Path) -> TargetSet {
    match load(path) {
        Ok(set) => set,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not load config, using empty target set");
            TargetSet::default()
        }
    }
}
