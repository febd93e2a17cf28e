/// Recipe resolution
///
/// A static catalog of build rules keyed by target kind, and the resolver
/// that expands requested targets into rendered Makefile recipes.
pub mod catalog;
pub mod kind;
pub mod resolver;
pub mod template;

pub use catalog::{RecipeCatalog, RecipeRule, RuleSpec};
pub use kind::{SourceKind, TargetKind};
pub use resolver::{
    ResolveContext, ResolvedRecipe, ResolvedRecipeSet, TargetResolver, Traversal, Worklist,
};
