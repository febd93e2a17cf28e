//! Setup phase
//!
//! Derives the package configuration from parsed metadata and the mode
//! descriptor, in a fixed order:
//!
//! 1. language markers (`LANG` vs `LANG1`/`LANG2`)
//! 2. defaults for `BASENAME`, names and `Description`
//! 3. extra targets implied by a monolingual package
//! 4. `VERSION` format
//! 5. mode-driven targets and install modes
//! 6. install directories
//!
//! The parsed metadata is never modified; derived values live in
//! [`PackageConfig`] and are layered over the metadata by
//! [`PackageConfig::variables`].

use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::error::SetupError;
use crate::logging::operations;
use crate::metadata::{SettingsStore, Value};
use crate::modes::ModeDescriptor;
use crate::recipe::ResolveContext;

/// Which kind of package the metadata describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageKind {
    Monolingual {
        lang: String,
        lang_name: String,
    },
    Pair {
        lang1: String,
        lang2: String,
        lang1_name: String,
        lang2_name: String,
    },
}

/// `Major.Minor.Patch`, kept exactly as declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(String);

impl Version {
    /// Accept three non-empty, all-digit components
    pub fn parse(text: &str) -> Result<Self, SetupError> {
        let parts: Vec<&str> = text.split('.').collect();
        let numeric = |part: &&str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());
        if parts.len() != 3 || !parts.iter().all(numeric) {
            return Err(SetupError::InvalidVersion(text.to_string()));
        }
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inputs to setup that do not come from the metadata file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupOptions {
    pub prefix: String,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            prefix: "/usr/local".to_string(),
        }
    }
}

/// Values derived once, before resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageConfig {
    pub kind: PackageKind,
    pub basename: String,
    pub description: String,
    pub version: Version,
    pub sources: Vec<String>,
    pub targets: Vec<String>,
    pub extra_targets: Vec<String>,
    pub custom_targets: Vec<String>,
    pub variants: Vec<String>,
    pub install_modes: Vec<String>,
    pub prefix: String,
    pub datadir: String,
    pub modesdir: String,
    pub pkgconfigdir: String,
}

impl PackageConfig {
    pub fn derive(
        metadata: &SettingsStore,
        modes: &ModeDescriptor,
        options: &SetupOptions,
    ) -> Result<Self, SetupError> {
        let scalar = |name: &str| metadata.scalar(name).map(str::to_string);

        let mono = metadata.contains("LANG");
        let pair = metadata.contains("LANG1") && metadata.contains("LANG2");

        let kind = match (mono, pair) {
            (true, true) => return Err(SetupError::BothLanguageMarkers),
            (false, false) => return Err(SetupError::NoLanguageMarker),
            (true, false) => {
                let lang = joined(metadata, "LANG");
                let lang_name = scalar("LANG_NAME").unwrap_or_else(|| lang.clone());
                PackageKind::Monolingual { lang, lang_name }
            }
            (false, true) => {
                let lang1 = joined(metadata, "LANG1");
                let lang2 = joined(metadata, "LANG2");
                let lang1_name = scalar("LANG1_NAME").unwrap_or_else(|| lang1.clone());
                let lang2_name = scalar("LANG2_NAME").unwrap_or_else(|| lang2.clone());
                PackageKind::Pair {
                    lang1,
                    lang2,
                    lang1_name,
                    lang2_name,
                }
            }
        };

        let (default_basename, default_description) = match &kind {
            PackageKind::Monolingual { lang, lang_name } => (
                format!("apertium-{lang}"),
                format!(
                    "Finite-state morphological transducer and constraint grammar for {lang_name}"
                ),
            ),
            PackageKind::Pair {
                lang1,
                lang2,
                lang1_name,
                lang2_name,
            } => (
                format!("apertium-{lang1}-{lang2}"),
                format!("Apertium-based {lang1_name}-{lang2_name} machine translation"),
            ),
        };
        let basename = scalar("BASENAME").unwrap_or(default_basename);
        let description = scalar("Description").unwrap_or(default_description);

        let mut extra_targets = metadata.list("EXTRA_TARGETS");
        if let PackageKind::Monolingual { lang, .. } = &kind {
            extra_targets.push(format!("{lang}.automorf.att.gz"));
            extra_targets.push(format!("{lang}.autogen.att.gz"));
        }

        let version = Version::parse(metadata.scalar("VERSION").unwrap_or_default())?;

        if metadata.contains("TARGETS") {
            return Err(SetupError::ExplicitTargets);
        }

        let sources = metadata.list("SOURCES");
        let discovered = modes.discover(&sources);

        let prefix = options.prefix.clone();
        let datadir = format!("{prefix}/share/apertium/{basename}/");
        let modesdir = format!("{prefix}/share/apertium/modes/");
        let pkgconfigdir = format!("{prefix}/share/pkgconfig/");

        let config = Self {
            kind,
            basename,
            description,
            version,
            sources,
            targets: discovered.targets,
            extra_targets,
            custom_targets: metadata.list("CUSTOM_TARGETS"),
            variants: metadata.list("VAR"),
            install_modes: discovered.install_modes,
            prefix,
            datadir,
            modesdir,
            pkgconfigdir,
        };

        debug!(
            operation = operations::SETUP,
            basename = %config.basename,
            version = %config.version,
            targets = ?config.targets,
            extra_targets = ?config.extra_targets,
            install_modes = ?config.install_modes,
            "derived package configuration"
        );

        Ok(config)
    }

    /// Language code of a monolingual package
    pub fn lang(&self) -> Option<&str> {
        match &self.kind {
            PackageKind::Monolingual { lang, .. } => Some(lang),
            PackageKind::Pair { .. } => None,
        }
    }

    /// Targets to resolve: mode targets followed by extra targets
    pub fn requested_targets(&self) -> Vec<String> {
        self.targets
            .iter()
            .chain(&self.extra_targets)
            .cloned()
            .collect()
    }

    /// Metadata settings with derived values layered on top
    pub fn variables(&self, metadata: &SettingsStore) -> BTreeMap<String, Value> {
        let mut vars: BTreeMap<String, Value> = metadata
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let scalar = |s: &str| Value::Scalar(s.to_string());
        let list = |items: &[String]| Value::List(items.to_vec());

        vars.insert("BASENAME".into(), scalar(&self.basename));
        vars.insert("Description".into(), scalar(&self.description));
        match &self.kind {
            PackageKind::Monolingual { lang_name, .. } => {
                vars.insert("LANG_NAME".into(), scalar(lang_name));
            }
            PackageKind::Pair {
                lang1_name,
                lang2_name,
                ..
            } => {
                vars.insert("LANG1_NAME".into(), scalar(lang1_name));
                vars.insert("LANG2_NAME".into(), scalar(lang2_name));
            }
        }
        vars.insert("EXTRA_TARGETS".into(), list(&self.extra_targets));
        vars.insert("TARGETS".into(), list(&self.targets));
        vars.insert("INSTALL_MODES".into(), list(&self.install_modes));
        vars.insert("prefix".into(), scalar(&self.prefix));
        vars.insert("datadir".into(), scalar(&self.datadir));
        vars.insert("modesdir".into(), scalar(&self.modesdir));
        vars.insert("pkgconfigdir".into(), scalar(&self.pkgconfigdir));
        vars
    }

    /// Resolver inputs for a monolingual package
    pub fn resolve_context<'a>(
        &'a self,
        variables: &'a BTreeMap<String, Value>,
    ) -> Option<ResolveContext<'a>> {
        Some(ResolveContext {
            basename: &self.basename,
            lang: self.lang()?,
            variants: &self.variants,
            sources: &self.sources,
            custom_targets: &self.custom_targets,
            variables,
        })
    }
}

fn joined(metadata: &SettingsStore, name: &str) -> String {
    metadata.get(name).map(Value::joined).unwrap_or_default()
}
