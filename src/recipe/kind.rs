/// Target and source kinds
///
/// A kind is a file name with the package base name and language prefixes
/// stripped: `apertium-eng.eng.dix` is a `dix` source, `eng.automorf.bin` is
/// an `automorf.bin` target. Both sets are closed; the catalog is checked
/// against them when it is loaded.
use serde::Serialize;
use std::fmt;

/// Outputs the catalog knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TargetKind {
    AutomorfBin,
    AutogenBin,
    AutomorfAttGz,
    AutogenAttGz,
    AutopgenBin,
    RlxBin,
}

impl TargetKind {
    pub const ALL: [TargetKind; 6] = [
        TargetKind::AutomorfBin,
        TargetKind::AutogenBin,
        TargetKind::AutomorfAttGz,
        TargetKind::AutogenAttGz,
        TargetKind::AutopgenBin,
        TargetKind::RlxBin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::AutomorfBin => "automorf.bin",
            TargetKind::AutogenBin => "autogen.bin",
            TargetKind::AutomorfAttGz => "automorf.att.gz",
            TargetKind::AutogenAttGz => "autogen.att.gz",
            TargetKind::AutopgenBin => "autopgen.bin",
            TargetKind::RlxBin => "rlx.bin",
        }
    }

    pub fn parse(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == kind)
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source file kinds a rule can require
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SourceKind {
    /// lttoolbox dictionary
    Dix,
    /// accent/character equivalence file
    Acx,
    /// HFST lexicon
    Lexc,
    /// lexd lexicon
    Lexd,
    /// post-generation dictionary (`<base>.post-<lang>.dix`)
    PostDix,
    /// constraint grammar
    Rlx,
}

impl SourceKind {
    pub const ALL: [SourceKind; 6] = [
        SourceKind::Dix,
        SourceKind::Acx,
        SourceKind::Lexc,
        SourceKind::Lexd,
        SourceKind::PostDix,
        SourceKind::Rlx,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Dix => "dix",
            SourceKind::Acx => "acx",
            SourceKind::Lexc => "lexc",
            SourceKind::Lexd => "lexd",
            SourceKind::PostDix => "post-dix",
            SourceKind::Rlx => "rlx",
        }
    }

    pub fn parse(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == kind)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind string of a declared source file
///
/// Strips the `<basename>.` prefix, then the first `<lang>.` occurrence, so
/// `apertium-eng.post-eng.dix` becomes `post-dix`.
pub fn source_kind_name(file: &str, basename: &str, lang: &str) -> String {
    let rest = file
        .strip_prefix(basename)
        .and_then(|r| r.strip_prefix('.'))
        .unwrap_or(file);
    rest.replacen(&format!("{lang}."), "", 1)
}

/// A target file name split into its language variable and kind string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetName {
    /// `<lang>` or `<lang>_<tag>` for a recognized variant
    pub var: String,
    /// Remainder used as the catalog key
    pub kind: String,
}

/// Split a target file name into language variable and kind string
///
/// The first `.`-separated segment after the base name is compared exactly
/// against `<lang>` and `<lang>_<tag>` for each tag in declaration order.
/// When nothing matches, the whole remainder is returned as the kind so that
/// lookup fails with the target name intact.
pub fn split_target(file: &str, basename: &str, lang: &str, variants: &[String]) -> TargetName {
    let rest = file
        .strip_prefix(basename)
        .and_then(|r| r.strip_prefix('.'))
        .unwrap_or(file);

    let unsplit = || TargetName {
        var: lang.to_string(),
        kind: rest.to_string(),
    };

    let Some((segment, kind)) = rest.split_once('.') else {
        return unsplit();
    };

    if segment == lang {
        return TargetName {
            var: lang.to_string(),
            kind: kind.to_string(),
        };
    }

    let tagged = segment
        .strip_prefix(lang)
        .and_then(|r| r.strip_prefix('_'))
        .and_then(|tag| variants.iter().find(|v| v.as_str() == tag));

    match tagged {
        Some(tag) => TargetName {
            var: format!("{lang}_{tag}"),
            kind: kind.to_string(),
        },
        None => unsplit(),
    }
}
