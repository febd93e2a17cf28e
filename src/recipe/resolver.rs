//! Target resolution
//!
//! Turns requested target file names into rendered recipes. Each target is
//! mapped to a catalog kind, the first rule alternative whose requirements
//! are met by the declared sources is chosen, its dependency targets are
//! queued, and its recipe is rendered. Every target resolves at most once.
//!
//! Resolution is all or nothing: an unknown kind or unmet requirements abort
//! with a [`ResolveError`] and no partial result is returned.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use tracing::{debug, info};

use super::catalog::RecipeCatalog;
use super::kind::{source_kind_name, split_target, SourceKind, TargetKind};
use crate::error::ResolveError;
use crate::logging::{operations, status};
use crate::metadata::Value;

/// Order in which queued targets are taken from the worklist
///
/// Only diagnostics depend on this; the resolved set is the same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    /// Most recently queued first (depth-first expansion)
    #[default]
    Lifo,
    /// Oldest queued first (breadth-first expansion)
    Fifo,
}

/// Pending target names
#[derive(Debug, Clone, Default)]
pub struct Worklist {
    items: VecDeque<String>,
    traversal: Traversal,
}

impl Worklist {
    pub fn new(traversal: Traversal) -> Self {
        Self {
            items: VecDeque::new(),
            traversal,
        }
    }

    pub fn push(&mut self, target: String) {
        self.items.push_back(target);
    }

    pub fn pop(&mut self) -> Option<String> {
        match self.traversal {
            Traversal::Lifo => self.items.pop_back(),
            Traversal::Fifo => self.items.pop_front(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Extend<String> for Worklist {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

/// Everything resolution reads; nothing here is written by the resolver
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub basename: &'a str,
    pub lang: &'a str,
    /// Recognized variant tags, in declaration order
    pub variants: &'a [String],
    /// Declared source file names
    pub sources: &'a [String],
    /// Targets built by hand-written rules in the CUSTOM block
    pub custom_targets: &'a [String],
    /// Settings available to recipe templates
    pub variables: &'a BTreeMap<String, Value>,
}

impl ResolveContext<'_> {
    /// Kinds of the declared sources; names outside the known set are ignored
    pub fn source_kinds(&self) -> BTreeSet<SourceKind> {
        self.sources
            .iter()
            .filter_map(|file| {
                let name = source_kind_name(file, self.basename, self.lang);
                let kind = SourceKind::parse(&name);
                if kind.is_none() {
                    debug!(source = %file, kind = %name, "source kind not used by any rule");
                }
                kind
            })
            .collect()
    }
}

/// One resolved target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecipe {
    pub kind: TargetKind,
    /// Language variable the recipe was rendered with
    pub var: String,
    pub recipe: String,
}

/// Resolved recipes keyed by target file name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedRecipeSet {
    recipes: HashMap<String, ResolvedRecipe>,
}

impl ResolvedRecipeSet {
    pub fn get(&self, target: &str) -> Option<&ResolvedRecipe> {
        self.recipes.get(target)
    }

    pub fn contains(&self, target: &str) -> bool {
        self.recipes.contains_key(target)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Entries sorted by target file name
    pub fn sorted(&self) -> Vec<(&str, &ResolvedRecipe)> {
        let mut entries: Vec<_> = self
            .recipes
            .iter()
            .map(|(target, recipe)| (target.as_str(), recipe))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    fn insert(&mut self, target: String, recipe: ResolvedRecipe) {
        self.recipes.insert(target, recipe);
    }
}

/// Worklist-driven resolver over a recipe catalog
#[derive(Debug, Clone, Copy)]
pub struct TargetResolver<'a> {
    catalog: &'a RecipeCatalog,
    traversal: Traversal,
}

impl<'a> TargetResolver<'a> {
    pub fn new(catalog: &'a RecipeCatalog) -> Self {
        Self {
            catalog,
            traversal: Traversal::default(),
        }
    }

    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Resolve every requested target and everything it transitively needs
    pub fn resolve<I>(
        &self,
        ctx: &ResolveContext<'_>,
        requested: I,
    ) -> Result<ResolvedRecipeSet, ResolveError>
    where
        I: IntoIterator<Item = String>,
    {
        let available = ctx.source_kinds();
        let sources: HashSet<&str> = ctx.sources.iter().map(String::as_str).collect();
        let custom: HashSet<&str> = ctx.custom_targets.iter().map(String::as_str).collect();

        let mut worklist = Worklist::new(self.traversal);
        worklist.extend(requested);

        debug!(
            operation = operations::RESOLVE,
            pending = worklist.len(),
            sources = ?ctx.sources,
            kinds = ?available,
            "starting resolution"
        );

        let mut resolved = ResolvedRecipeSet::default();

        while let Some(target) = worklist.pop() {
            if resolved.contains(&target)
                || sources.contains(target.as_str())
                || custom.contains(target.as_str())
            {
                debug!(
                    operation = operations::RESOLVE,
                    status = status::SKIPPED,
                    target = %target,
                    "already satisfied"
                );
                continue;
            }

            let name = split_target(&target, ctx.basename, ctx.lang, ctx.variants);
            let Some((kind, rules)) = TargetKind::parse(&name.kind)
                .and_then(|kind| self.catalog.alternatives(kind).map(|rules| (kind, rules)))
            else {
                return Err(ResolveError::UnknownTarget { target });
            };
            let Some((index, rule)) = rules
                .iter()
                .enumerate()
                .find(|(_, rule)| rule.is_satisfied_by(&available))
            else {
                return Err(ResolveError::MissingSources { target });
            };

            let lookup = |placeholder: &str| match placeholder {
                "VAR" => Some(name.var.clone()),
                "LANG" => Some(ctx.lang.to_string()),
                "BASENAME" => Some(ctx.basename.to_string()),
                other => ctx.variables.get(other).map(Value::joined),
            };
            let render_error = |source| ResolveError::Template {
                target: target.clone(),
                source,
            };

            for dependency in rule.depends() {
                worklist.push(dependency.render(lookup).map_err(render_error)?);
            }
            let recipe = rule.recipe().render(lookup).map_err(render_error)?;

            debug!(
                operation = operations::RESOLVE,
                status = status::SUCCESS,
                target = %target,
                kind = %kind,
                variant = %name.var,
                alternative = index,
                "target resolved"
            );

            resolved.insert(
                target,
                ResolvedRecipe {
                    kind,
                    var: name.var,
                    recipe,
                },
            );
        }

        info!(
            operation = operations::RESOLVE,
            status = status::SUCCESS,
            recipe_count = resolved.len(),
            "resolved build targets"
        );

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::catalog::RuleSpec;

    struct Fixture {
        sources: Vec<String>,
        custom: Vec<String>,
        variants: Vec<String>,
        variables: BTreeMap<String, Value>,
    }

    impl Fixture {
        fn new(sources: &[&str]) -> Self {
            Self {
                sources: sources.iter().map(|s| s.to_string()).collect(),
                custom: Vec::new(),
                variants: Vec::new(),
                variables: BTreeMap::new(),
            }
        }

        fn ctx(&self) -> ResolveContext<'_> {
            ResolveContext {
                basename: "apertium-eng",
                lang: "eng",
                variants: &self.variants,
                sources: &self.sources,
                custom_targets: &self.custom,
                variables: &self.variables,
            }
        }
    }

    fn targets(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_worklist_traversal_orders() {
        let mut lifo = Worklist::new(Traversal::Lifo);
        let mut fifo = Worklist::new(Traversal::Fifo);
        for t in ["a", "b", "c"] {
            lifo.push(t.to_string());
            fifo.push(t.to_string());
        }
        assert_eq!(lifo.pop().as_deref(), Some("c"));
        assert_eq!(fifo.pop().as_deref(), Some("a"));
        assert_eq!(lifo.len(), 2);
        assert!(!fifo.is_empty());
    }

    #[test]
    fn test_dictionary_with_acx_uses_first_alternative() {
        let catalog = RecipeCatalog::monolingual().unwrap();
        let fixture = Fixture::new(&["apertium-eng.eng.dix", "apertium-eng.eng.acx"]);
        let resolved = TargetResolver::new(&catalog)
            .resolve(&fixture.ctx(), targets(&["eng.automorf.bin"]))
            .unwrap();

        assert_eq!(resolved.len(), 1);
        let recipe = &resolved.get("eng.automorf.bin").unwrap().recipe;
        assert_eq!(
            recipe,
            "eng.automorf.bin: apertium-eng.eng.dix apertium-eng.eng.acx\n\
             \tapertium-validate-dictionary $<\n\
             \tlt-comp lr $< $@ apertium-eng.eng.acx"
        );
    }

    #[test]
    fn test_dictionary_alone_uses_single_source_alternative() {
        let catalog = RecipeCatalog::monolingual().unwrap();
        let fixture = Fixture::new(&["apertium-eng.eng.dix"]);
        let resolved = TargetResolver::new(&catalog)
            .resolve(&fixture.ctx(), targets(&["eng.automorf.bin"]))
            .unwrap();

        let recipe = &resolved.get("eng.automorf.bin").unwrap().recipe;
        assert!(recipe.ends_with("\tlt-comp lr $< $@"));
        assert!(!recipe.contains(".acx"));
    }

    #[test]
    fn test_lexicon_pulls_in_compressed_table() {
        let catalog = RecipeCatalog::monolingual().unwrap();
        let fixture = Fixture::new(&["apertium-eng.eng.lexc"]);
        let resolved = TargetResolver::new(&catalog)
            .resolve(&fixture.ctx(), targets(&["eng.automorf.bin"]))
            .unwrap();

        assert_eq!(resolved.len(), 2);
        assert!(resolved
            .get("eng.automorf.bin")
            .unwrap()
            .recipe
            .starts_with("eng.automorf.bin: eng.automorf.att.gz .deps/.d"));
        let table = resolved.get("eng.automorf.att.gz").unwrap();
        assert_eq!(table.kind, TargetKind::AutomorfAttGz);
        assert!(table.recipe.contains("hfst-lexc"));
    }

    #[test]
    fn test_compressed_table_from_dictionary_depends_on_binary() {
        let catalog = RecipeCatalog::monolingual().unwrap();
        let fixture = Fixture::new(&["apertium-eng.eng.dix"]);
        let resolved = TargetResolver::new(&catalog)
            .resolve(&fixture.ctx(), targets(&["eng.autogen.att.gz"]))
            .unwrap();

        let names: Vec<_> = resolved.sorted().into_iter().map(|(t, _)| t).collect();
        assert_eq!(names, vec!["eng.autogen.att.gz", "eng.autogen.bin"]);
    }

    #[test]
    fn test_unknown_kind_names_target() {
        let catalog = RecipeCatalog::monolingual().unwrap();
        let fixture = Fixture::new(&["apertium-eng.eng.dix"]);
        let err = TargetResolver::new(&catalog)
            .resolve(&fixture.ctx(), targets(&["eng.automorf.bin", "eng.foo.bin"]))
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnknownTarget {
                target: "eng.foo.bin".to_string()
            }
        );
    }

    #[test]
    fn test_missing_sources_names_target() {
        let catalog = RecipeCatalog::monolingual().unwrap();
        let fixture = Fixture::new(&["apertium-eng.eng.dix"]);
        let err = TargetResolver::new(&catalog)
            .resolve(&fixture.ctx(), targets(&["eng.rlx.bin"]))
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::MissingSources {
                target: "eng.rlx.bin".to_string()
            }
        );
    }

    #[test]
    fn test_sources_and_custom_targets_short_circuit() {
        let catalog = RecipeCatalog::monolingual().unwrap();
        let mut fixture = Fixture::new(&["apertium-eng.eng.rlx"]);
        fixture.custom = targets(&["eng.special.bin"]);
        let resolved = TargetResolver::new(&catalog)
            .resolve(
                &fixture.ctx(),
                targets(&["apertium-eng.eng.rlx", "eng.special.bin", "eng.rlx.bin"]),
            )
            .unwrap();

        assert_eq!(resolved.len(), 1);
        assert!(resolved.contains("eng.rlx.bin"));
    }

    #[test]
    fn test_duplicate_requests_resolve_once() {
        let catalog = RecipeCatalog::monolingual().unwrap();
        let fixture = Fixture::new(&["apertium-eng.eng.dix"]);
        let resolved = TargetResolver::new(&catalog)
            .resolve(
                &fixture.ctx(),
                targets(&["eng.automorf.bin", "eng.automorf.att.gz", "eng.automorf.bin"]),
            )
            .unwrap();
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn test_variant_target_renders_variant_variable() {
        let catalog = RecipeCatalog::monolingual().unwrap();
        let mut fixture = Fixture::new(&["apertium-eng.eng.dix"]);
        fixture.variants = targets(&["US", "GB"]);
        let resolved = TargetResolver::new(&catalog)
            .resolve(&fixture.ctx(), targets(&["eng_GB.autogen.att.gz"]))
            .unwrap();

        let table = resolved.get("eng_GB.autogen.att.gz").unwrap();
        assert_eq!(table.var, "eng_GB");
        assert!(table.recipe.starts_with("eng_GB.autogen.att.gz: eng_GB.autogen.bin"));
        let binary = resolved.get("eng_GB.autogen.bin").unwrap();
        assert!(binary
            .recipe
            .starts_with("eng_GB.autogen.bin: apertium-eng.eng.dix"));
    }

    #[test]
    fn test_traversal_does_not_change_result() {
        let catalog = RecipeCatalog::monolingual().unwrap();
        let fixture = Fixture::new(&["apertium-eng.eng.dix", "apertium-eng.eng.rlx"]);
        let requested = targets(&[
            "eng.automorf.att.gz",
            "eng.autogen.att.gz",
            "eng.rlx.bin",
        ]);

        let lifo = TargetResolver::new(&catalog)
            .resolve(&fixture.ctx(), requested.clone())
            .unwrap();
        let fifo = TargetResolver::new(&catalog)
            .with_traversal(Traversal::Fifo)
            .resolve(&fixture.ctx(), requested.clone())
            .unwrap();
        let again = TargetResolver::new(&catalog)
            .resolve(&fixture.ctx(), requested)
            .unwrap();

        assert_eq!(lifo, fifo);
        assert_eq!(lifo, again);
        assert_eq!(lifo.len(), 5);
    }

    #[test]
    fn test_templates_read_settings() {
        let specs = [RuleSpec {
            target: "rlx.bin",
            requires: &[&["rlx"]],
            depends: &[],
            recipe: "{VAR}.rlx.bin: {BASENAME}.{LANG}.rlx\n\t{CG_COMP} $< $@",
        }];
        let catalog = RecipeCatalog::load(&specs).unwrap();
        let mut fixture = Fixture::new(&["apertium-eng.eng.rlx"]);

        let err = TargetResolver::new(&catalog)
            .resolve(&fixture.ctx(), targets(&["eng.rlx.bin"]))
            .unwrap_err();
        assert!(matches!(err, ResolveError::Template { .. }));

        fixture
            .variables
            .insert("CG_COMP".to_string(), Value::Scalar("cg-comp".to_string()));
        let resolved = TargetResolver::new(&catalog)
            .resolve(&fixture.ctx(), targets(&["eng.rlx.bin"]))
            .unwrap();
        assert!(resolved
            .get("eng.rlx.bin")
            .unwrap()
            .recipe
            .ends_with("\tcg-comp $< $@"));
    }
}
