//! Recipe catalog
//!
//! The catalog maps each [`TargetKind`] to an ordered list of [`RecipeRule`]
//! alternatives. Rules are authored as plain [`RuleSpec`] data and checked
//! once by [`RecipeCatalog::load`]: unknown kinds, empty requirement sets,
//! malformed templates and dependencies that name no buildable kind are all
//! rejected there, so resolution only ever sees well-formed rules.
//!
//! Adding a rule means adding a `RuleSpec`; the resolver does not change.

use std::collections::{BTreeMap, BTreeSet};

use super::kind::{SourceKind, TargetKind};
use super::template::Template;
use crate::error::CatalogError;

/// One authored alternative for building a target kind
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    /// Target kind name, e.g. "automorf.bin"
    pub target: &'static str,
    /// Alternative requirement sets; one fully present set is enough
    pub requires: &'static [&'static [&'static str]],
    /// Dependency target templates, e.g. "{VAR}.automorf.att.gz"
    pub depends: &'static [&'static str],
    /// Recipe text template
    pub recipe: &'static str,
}

/// A loaded, validated rule alternative
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRule {
    requires: Vec<BTreeSet<SourceKind>>,
    depends: Vec<Template>,
    recipe: Template,
}

impl RecipeRule {
    /// True when every kind of at least one requirement set is available
    pub fn is_satisfied_by(&self, available: &BTreeSet<SourceKind>) -> bool {
        self.requires.iter().any(|set| set.is_subset(available))
    }

    pub fn depends(&self) -> &[Template] {
        &self.depends
    }

    pub fn recipe(&self) -> &Template {
        &self.recipe
    }
}

/// Immutable table of rules keyed by target kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeCatalog {
    rules: BTreeMap<TargetKind, Vec<RecipeRule>>,
}

impl RecipeCatalog {
    /// Validate and load authored rules, keeping declaration order per kind
    pub fn load(specs: &[RuleSpec]) -> Result<Self, CatalogError> {
        let mut rules: BTreeMap<TargetKind, Vec<RecipeRule>> = BTreeMap::new();

        for spec in specs {
            let target = TargetKind::parse(spec.target)
                .ok_or_else(|| CatalogError::UnknownTargetKind(spec.target.to_string()))?;

            if spec.requires.is_empty() || spec.requires.iter().any(|set| set.is_empty()) {
                return Err(CatalogError::EmptyRequirements {
                    target: spec.target.to_string(),
                });
            }

            let requires = spec
                .requires
                .iter()
                .map(|set| {
                    set.iter()
                        .map(|name| {
                            SourceKind::parse(name).ok_or_else(|| {
                                CatalogError::UnknownSourceKind {
                                    target: spec.target.to_string(),
                                    source_kind: name.to_string(),
                                }
                            })
                        })
                        .collect::<Result<BTreeSet<_>, _>>()
                })
                .collect::<Result<Vec<_>, _>>()?;

            let template_error = |source| CatalogError::Template {
                target: spec.target.to_string(),
                source,
            };

            let depends = spec
                .depends
                .iter()
                .map(|dep| {
                    let template = Template::parse(dep).map_err(template_error)?;
                    let builds_known_kind = template
                        .literal_suffix()
                        .and_then(|suffix| suffix.strip_prefix('.'))
                        .and_then(TargetKind::parse)
                        .is_some();
                    if !builds_known_kind {
                        return Err(CatalogError::UnknownDependency {
                            target: spec.target.to_string(),
                            dependency: dep.to_string(),
                        });
                    }
                    Ok(template)
                })
                .collect::<Result<Vec<_>, _>>()?;

            let recipe = Template::parse(spec.recipe).map_err(template_error)?;

            rules.entry(target).or_default().push(RecipeRule {
                requires,
                depends,
                recipe,
            });
        }

        Ok(Self { rules })
    }

    /// Built-in catalog for single-language packages
    pub fn monolingual() -> Result<Self, CatalogError> {
        Self::load(MONOLINGUAL_RULES)
    }

    /// Alternatives for a kind string, in declaration order
    pub fn lookup(&self, kind: &str) -> Option<&[RecipeRule]> {
        TargetKind::parse(kind).and_then(|k| self.alternatives(k))
    }

    pub fn alternatives(&self, kind: TargetKind) -> Option<&[RecipeRule]> {
        self.rules.get(&kind).map(Vec::as_slice)
    }

    pub fn kinds(&self) -> impl Iterator<Item = TargetKind> + '_ {
        self.rules.keys().copied()
    }
}

/// Rules for monolingual packages
///
/// Placeholders: `{VAR}` is the language code or `<lang>_<variant>`, `{LANG}`
/// the plain language code, `{BASENAME}` the package base name.
pub const MONOLINGUAL_RULES: &[RuleSpec] = &[
    // automorf.bin
    RuleSpec {
        target: "automorf.bin",
        requires: &[&["dix", "acx"]],
        depends: &[],
        recipe: "{VAR}.automorf.bin: {BASENAME}.{LANG}.dix {BASENAME}.{LANG}.acx\n\
                 \tapertium-validate-dictionary $<\n\
                 \tlt-comp lr $< $@ {BASENAME}.{LANG}.acx",
    },
    RuleSpec {
        target: "automorf.bin",
        requires: &[&["dix"]],
        depends: &[],
        recipe: "{VAR}.automorf.bin: {BASENAME}.{LANG}.dix\n\
                 \tapertium-validate-dictionary $<\n\
                 \tlt-comp lr $< $@",
    },
    RuleSpec {
        target: "automorf.bin",
        requires: &[&["lexc"], &["lexd"]],
        depends: &["{VAR}.automorf.att.gz"],
        recipe: "{VAR}.automorf.bin: {VAR}.automorf.att.gz .deps/.d\n\
                 \tzcat < $< > .deps/{VAR}.automorf.att\n\
                 \tlt-comp lr .deps/{VAR}.automorf.att $@",
    },
    // autogen.bin
    RuleSpec {
        target: "autogen.bin",
        requires: &[&["dix", "acx"]],
        depends: &[],
        recipe: "{VAR}.autogen.bin: {BASENAME}.{LANG}.dix {BASENAME}.{LANG}.acx\n\
                 \tapertium-validate-dictionary $<\n\
                 \tlt-comp rl $< $@ {BASENAME}.{LANG}.acx",
    },
    RuleSpec {
        target: "autogen.bin",
        requires: &[&["dix"]],
        depends: &[],
        recipe: "{VAR}.autogen.bin: {BASENAME}.{LANG}.dix\n\
                 \tapertium-validate-dictionary $<\n\
                 \tlt-comp rl $< $@",
    },
    RuleSpec {
        target: "autogen.bin",
        requires: &[&["lexc"], &["lexd"]],
        depends: &["{VAR}.autogen.att.gz"],
        recipe: "{VAR}.autogen.bin: {VAR}.autogen.att.gz .deps/.d\n\
                 \tzcat < $< > .deps/{VAR}.autogen.att\n\
                 \tlt-comp lr .deps/{VAR}.autogen.att $@",
    },
    // automorf.att.gz
    RuleSpec {
        target: "automorf.att.gz",
        requires: &[&["dix"]],
        depends: &["{VAR}.automorf.bin"],
        recipe: "{VAR}.automorf.att.gz: {VAR}.automorf.bin\n\
                 \tlt-print $< | gzip -9 -c -n > $@",
    },
    RuleSpec {
        target: "automorf.att.gz",
        requires: &[&["lexc"]],
        depends: &[],
        recipe: "{VAR}.automorf.att.gz: {BASENAME}.{LANG}.lexc .deps/.d\n\
                 \thfst-lexc --Werror $< -o .deps/{VAR}.automorf.hfst\n\
                 \thfst-invert .deps/{VAR}.automorf.hfst | hfst-fst2txt | gzip -9 -c -n > $@",
    },
    RuleSpec {
        target: "automorf.att.gz",
        requires: &[&["lexd"]],
        depends: &[],
        recipe: "{VAR}.automorf.att.gz: {BASENAME}.{LANG}.lexd .deps/.d\n\
                 \tlexd $< | hfst-txt2fst | hfst-invert | hfst-fst2txt | gzip -9 -c -n > $@",
    },
    // autogen.att.gz
    RuleSpec {
        target: "autogen.att.gz",
        requires: &[&["dix"]],
        depends: &["{VAR}.autogen.bin"],
        recipe: "{VAR}.autogen.att.gz: {VAR}.autogen.bin\n\
                 \tlt-print $< | gzip -9 -c -n > $@",
    },
    RuleSpec {
        target: "autogen.att.gz",
        requires: &[&["lexc"]],
        depends: &[],
        recipe: "{VAR}.autogen.att.gz: {BASENAME}.{LANG}.lexc .deps/.d\n\
                 \thfst-lexc --Werror $< -o .deps/{VAR}.autogen.hfst\n\
                 \thfst-fst2txt .deps/{VAR}.autogen.hfst | gzip -9 -c -n > $@",
    },
    RuleSpec {
        target: "autogen.att.gz",
        requires: &[&["lexd"]],
        depends: &[],
        recipe: "{VAR}.autogen.att.gz: {BASENAME}.{LANG}.lexd .deps/.d\n\
                 \tlexd $< | gzip -9 -c -n > $@",
    },
    // autopgen.bin
    RuleSpec {
        target: "autopgen.bin",
        requires: &[&["post-dix"]],
        depends: &[],
        recipe: "{VAR}.autopgen.bin: {BASENAME}.post-{LANG}.dix\n\
                 \tapertium-validate-dictionary $<\n\
                 \tlt-comp lr $< $@",
    },
    // rlx.bin
    RuleSpec {
        target: "rlx.bin",
        requires: &[&["rlx"]],
        depends: &[],
        recipe: "{VAR}.rlx.bin: {BASENAME}.{LANG}.rlx\n\
                 \tcg-comp $< $@",
    },
];
