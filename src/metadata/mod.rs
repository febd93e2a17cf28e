//! Metadata (`.meta`) file loading
//!
//! A metadata file is line oriented:
//!
//! ```text
//! LANG = eng                       # scalar, later definitions override
//! SOURCES: apertium-eng.eng.dix    # list, repeated declarations accumulate
//! SOURCES: apertium-eng.eng.acx
//! CUSTOM                           # rest of the file is copied verbatim
//! ```
//!
//! Parsing never fails on content: lines that cannot be interpreted and
//! redefined scalars are reported as [`Warning`]s and logged.

pub mod tokenizer;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::MetadataError;
use crate::logging::operations;
pub use tokenizer::tokenize;

/// Name of the raw-block directive and the pseudo-setting holding its text
pub const CUSTOM: &str = "CUSTOM";

/// A single setting value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(String),
    List(Vec<String>),
}

impl Value {
    /// Render the value the way it appears on the right of a Makefile assignment
    pub fn joined(&self) -> String {
        match self {
            Value::Scalar(s) => s.clone(),
            Value::List(items) => items.join(" "),
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::List(_) => None,
        }
    }

    /// List items; a scalar is read as a one-element list
    pub fn items(&self) -> Vec<String> {
        match self {
            Value::Scalar(s) => vec![s.clone()],
            Value::List(items) => items.clone(),
        }
    }
}

/// Non-fatal problems found while loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A scalar was assigned more than once; the later value wins
    Redefined { name: String, line: usize },
    /// A line had no recognizable shape and was skipped
    Uninterpretable { line: usize },
}

/// Program paths present before any metadata line is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramDefaults {
    pub mkdir_p: String,
    pub install: String,
    pub shell: String,
}

impl Default for ProgramDefaults {
    fn default() -> Self {
        Self {
            mkdir_p: "/bin/mkdir -p".to_string(),
            install: "/usr/bin/install -c -m 644".to_string(),
            shell: "/bin/bash".to_string(),
        }
    }
}

/// Parsed metadata: named settings plus the optional raw `CUSTOM` block
///
/// Read-only once loading finishes. Values derived during setup live in
/// [`crate::setup::PackageConfig`], never here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsStore {
    values: HashMap<String, Value>,
    custom: Option<String>,
    warnings: Vec<Warning>,
}

impl SettingsStore {
    /// Empty store pre-populated with program defaults
    pub fn with_defaults(programs: &ProgramDefaults) -> Self {
        let mut store = Self::default();
        for (name, value) in [
            ("MKDIR_P", &programs.mkdir_p),
            ("INSTALL", &programs.install),
            ("SHELL", &programs.shell),
        ] {
            store
                .values
                .insert(name.to_string(), Value::Scalar(value.clone()));
        }
        store
    }

    /// Load a metadata file on top of the program defaults
    pub fn load(path: &Path, programs: &ProgramDefaults) -> Result<Self, MetadataError> {
        let content = fs::read_to_string(path)?;
        debug!(
            operation = operations::LOAD_METADATA,
            path = %path.display(),
            size_bytes = content.len(),
            "reading metadata"
        );
        Ok(Self::parse(&content, programs))
    }

    /// Parse metadata text on top of the program defaults
    pub fn parse(content: &str, programs: &ProgramDefaults) -> Self {
        let mut store = Self::with_defaults(programs);
        let mut in_custom = false;

        for (index, line) in content.split_inclusive('\n').enumerate() {
            let line_number = index + 1;

            if in_custom {
                store.custom.get_or_insert_with(String::new).push_str(line);
                continue;
            }

            let tokens = tokenize(line);
            match tokens.as_slice() {
                [] => {}
                [name, op, rest @ ..] if op == "=" && !rest.is_empty() => {
                    store.set_scalar(name, rest.join(" "), line_number);
                }
                [name, op, rest @ ..] if op == ":" && !rest.is_empty() => {
                    store.append_list(name, rest);
                }
                [only] if only == CUSTOM => {
                    store.custom = Some(String::new());
                    in_custom = true;
                }
                _ => {
                    warn!(
                        line = line_number,
                        "Unable to interpret line {}, skipping.", line_number
                    );
                    store.warnings.push(Warning::Uninterpretable { line: line_number });
                }
            }
        }

        store
    }

    fn set_scalar(&mut self, name: &str, value: String, line: usize) {
        if self.values.contains_key(name) {
            warn!(
                setting = name,
                line,
                "{} set multiple times - using later definition.", name
            );
            self.warnings.push(Warning::Redefined {
                name: name.to_string(),
                line,
            });
        }
        self.values.insert(name.to_string(), Value::Scalar(value));
    }

    fn append_list(&mut self, name: &str, items: &[String]) {
        let entry = self
            .values
            .entry(name.to_string())
            .or_insert_with(|| Value::List(Vec::new()));
        match entry {
            Value::List(list) => list.extend(items.iter().cloned()),
            // A list directive after a scalar keeps the scalar as the first item
            Value::Scalar(s) => {
                let mut list = vec![std::mem::take(s)];
                list.extend(items.iter().cloned());
                *entry = Value::List(list);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn scalar(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_scalar)
    }

    /// List setting as owned items; absent settings are empty
    pub fn list(&self, name: &str) -> Vec<String> {
        self.values.get(name).map(Value::items).unwrap_or_default()
    }

    /// Verbatim `CUSTOM` block text, if the file had one
    pub fn custom(&self) -> Option<&str> {
        self.custom.as_deref()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}
