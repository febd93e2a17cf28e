/// Typed errors for the setup pipeline
///
/// Each stage has its own error enum so callers can match on the failure
/// they care about. Command handlers wrap these in `anyhow` with file context.
use thiserror::Error;

/// Metadata file could not be read
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to read metadata file: {0}")]
    Io(#[from] std::io::Error),
}

/// Recipe catalog authoring errors, reported when the catalog is loaded
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown target kind in catalog: {0}")]
    UnknownTargetKind(String),

    #[error("Unknown source kind '{source_kind}' in rule for {target}")]
    UnknownSourceKind { target: String, source_kind: String },

    #[error("Rule for {target} has an empty requirement set")]
    EmptyRequirements { target: String },

    #[error("Dependency '{dependency}' of {target} does not name a known target kind")]
    UnknownDependency { target: String, dependency: String },

    #[error("Invalid template in rule for {target}: {source}")]
    Template {
        target: String,
        #[source]
        source: TemplateError,
    },
}

/// Recipe template rendering errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unclosed placeholder starting at byte {0}")]
    Unclosed(usize),

    #[error("Unmatched '}}' at byte {0}")]
    UnmatchedClose(usize),

    #[error("Empty placeholder at byte {0}")]
    Empty(usize),

    #[error("Template references unknown setting '{0}'")]
    MissingSetting(String),
}

/// Mode descriptor (modes.xml) errors
#[derive(Error, Debug)]
pub enum ModeError {
    #[error("Failed to read mode descriptor: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid XML in mode descriptor: {0}")]
    Xml(String),

    #[error("<{element}> element is missing the 'name' attribute")]
    MissingName { element: String },
}

/// Fatal setup conditions detected before resolution begins
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SetupError {
    #[error("Metadata file cannot specify both LANG and LANG1,LANG2.")]
    BothLanguageMarkers,

    #[error("Metadata file must either specify LANG or both LANG1 and LANG2.")]
    NoLanguageMarker,

    #[error("Metadata file must specify VERSION in the form Major.Minor.Patch (found '{0}').")]
    InvalidVersion(String),

    #[error("Build targets not mentioned in modes.xml should use EXTRA_TARGETS, not TARGETS")]
    ExplicitTargets,
}

/// Target resolution failures; both abort the whole run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Could not find recipe for {target}")]
    UnknownTarget { target: String },

    #[error("Sources required for {target} not found")]
    MissingSources { target: String },

    #[error("Failed to render recipe for {target}: {source}")]
    Template {
        target: String,
        #[source]
        source: TemplateError,
    },
}
