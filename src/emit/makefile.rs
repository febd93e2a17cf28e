/// Makefile rendering
///
/// Output is a pure function of its inputs. Settings and recipes are sorted
/// by name before writing, so reruns on unchanged inputs are byte-identical
/// no matter how the underlying maps were filled.
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::metadata::{Value, CUSTOM};
use crate::recipe::ResolvedRecipeSet;

/// File names the generated Makefile refers back to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakefileInputs {
    /// Metadata file, relative to the Makefile's directory
    pub meta_file: String,
    /// Mode descriptor
    pub modes_file: String,
    /// Tool config file the run used, if any
    pub config_file: Option<String>,
}

impl Default for MakefileInputs {
    fn default() -> Self {
        Self {
            meta_file: "$(BASENAME).meta".to_string(),
            modes_file: "modes.xml".to_string(),
            config_file: None,
        }
    }
}

const DEPS_STAMP: &str = "\
.deps/.d:
\t$(MKDIR_P) .deps
\ttouch $@
";

const CLEAN_RULES: &str = "\
CLEANFILES = $(TARGETS) $(CUSTOM_TARGETS) $(EXTRA_TARGETS) $(GENERATED) $(CUSTOM_CLEAN)
clean:
\t-test -z \"$(CLEANFILES)\" || rm -f $(CLEANFILES)
\t-rm -rf .deps modes *.mode

all: Makefile $(BASENAME).pc $(CLEANFILES)

.PHONY: all clean
";

const INSTALL_RULES: &str = "
install-pc: $(BASENAME).pc
\t$(MKDIR_P) $(DESTDIR)$(pkgconfigdir) || exit 1
\t$(INSTALL) $(BASENAME).pc $(DESTDIR)$(pkgconfigdir) || exit $$?
uninstall-pc:
\ttest -d $(DESTDIR)$(pkgconfigdir) && \\
\ttest -r $(DESTDIR)$(pkgconfigdir) && \\
\tcd $(DESTDIR)$(pkgconfigdir) && rm -f $(BASENAME).pc

DATA = $(SOURCES) $(TARGETS) $(CUSTOM_TARGETS) $(EXTRA_TARGETS)
install-data: all
\t$(MKDIR_P) $(DESTDIR)$(datadir) || exit 1
\t$(INSTALL) $(DATA) $(DESTDIR)$(datadir) || exit $$?
uninstall-data:
\ttest -d $(DESTDIR)$(datadir) && test -r $(DESTDIR)$(datadir) && \\
\tcd $(DESTDIR)$(datadir) && rm -f $(DATA)

install-modes: $(INSTALL_MODES)
\tapertium-gen-modes -f {MODES} $(datadir)
\t$(MKDIR_P) $(DESTDIR)$(modesdir) || exit 1
\t$(INSTALL) $(INSTALL_MODES) $(DESTDIR)$(modesdir) || exit $$?
\trm $(INSTALL_MODES)
uninstall-modes:
\ttest -d $(DESTDIR)$(modesdir) && test -r $(DESTDIR)$(modesdir) && \\
\tcd $(DESTDIR)$(modesdir) && rm -f $(INSTALL_MODES)

install: install-pc install-data install-modes
uninstall: uninstall-pc uninstall-data uninstall-modes

.PHONY: install install-pc install-data install-modes
.PHONY: uninstall uninstall-pc uninstall-data uninstall-modes
";

/// Render the complete Makefile text
pub fn render_makefile(
    variables: &BTreeMap<String, Value>,
    recipes: &ResolvedRecipeSet,
    custom: Option<&str>,
    inputs: &MakefileInputs,
) -> String {
    let mut out = String::new();

    let mut names: Vec<&String> = variables
        .keys()
        .filter(|name| name.as_str() != CUSTOM && !name.starts_with('_'))
        .collect();
    names.sort();
    for name in names {
        let _ = writeln!(out, "{} = {}", name, variables[name].joined());
    }
    out.push('\n');

    let sorted = recipes.sorted();
    for (_, resolved) in &sorted {
        out.push_str(&resolved.recipe);
        out.push_str("\n\n");
    }

    out.push_str(".DEFAULT_GOAL := all\n\n");
    out.push_str(DEPS_STAMP);
    out.push('\n');

    let config_dep = inputs
        .config_file
        .as_deref()
        .map(|config| format!(" {config}"))
        .unwrap_or_default();
    let config_arg = inputs
        .config_file
        .as_deref()
        .map(|config| format!(" --config {config}"))
        .unwrap_or_default();
    let _ = writeln!(
        out,
        "Makefile: {} {}{}",
        inputs.meta_file, inputs.modes_file, config_dep
    );
    let _ = writeln!(
        out,
        "\tapertium-setup generate {} {} -o .{} --prefix $(prefix)",
        inputs.meta_file, inputs.modes_file, config_arg
    );
    out.push_str("$(BASENAME).pc: Makefile\n\n");

    let generated: Vec<&str> = sorted.iter().map(|(target, _)| *target).collect();
    let _ = writeln!(out, "GENERATED = {}", generated.join(" "));
    out.push_str(CLEAN_RULES);
    out.push_str(&INSTALL_RULES.replace("{MODES}", &inputs.modes_file));

    if let Some(custom) = custom {
        out.push_str("\n\n");
        out.push_str(custom);
        out.push('\n');
    }

    out
}
