/// Acceptance tests for `apertium-setup generate`
///
/// Each test writes a small package (metadata plus modes file) into a
/// temporary directory and runs the real binary against it.
mod common;

use common::{TestPackage, ENG_META, ENG_MODES, MORPH_MODES};
use predicates::prelude::*;

fn generate(package: &TestPackage) -> assert_cmd::assert::Assert {
    package
        .apertium_setup()
        .args(["generate", "apertium-eng.meta", "modes.xml"])
        .assert()
}

#[test]
fn test_dictionary_with_acx_uses_auxiliary_input() {
    let package = TestPackage::with_files(ENG_META, MORPH_MODES);

    generate(&package).success();

    let makefile = package.read_file("Makefile");
    assert!(makefile.contains(
        "eng.automorf.bin: apertium-eng.eng.dix apertium-eng.eng.acx\n\
         \tapertium-validate-dictionary $<\n\
         \tlt-comp lr $< $@ apertium-eng.eng.acx\n"
    ));
    assert!(package.exists("apertium-eng.pc"));
}

#[test]
fn test_dictionary_without_acx() {
    let package = TestPackage::with_files(
        "LANG = eng\nVERSION = 0.3.1\nSOURCES : apertium-eng.eng.dix\n",
        MORPH_MODES,
    );

    generate(&package).success();

    let makefile = package.read_file("Makefile");
    assert!(makefile.contains(
        "eng.automorf.bin: apertium-eng.eng.dix\n\
         \tapertium-validate-dictionary $<\n\
         \tlt-comp lr $< $@\n\n"
    ));
    assert!(!makefile.contains(".acx"));
}

#[test]
fn test_lexicon_sources_pull_in_intermediate_target() {
    let package = TestPackage::with_files(
        "LANG = eng\nVERSION = 0.3.1\nSOURCES : apertium-eng.eng.lexc\n",
        MORPH_MODES,
    );

    generate(&package).success();

    let makefile = package.read_file("Makefile");
    let intermediate = makefile
        .find("eng.automorf.att.gz: apertium-eng.eng.lexc .deps/.d\n")
        .expect("intermediate recipe");
    let binary = makefile
        .find("eng.automorf.bin: eng.automorf.att.gz .deps/.d\n")
        .expect("binary recipe");
    assert!(intermediate < binary);
    assert!(makefile
        .contains("GENERATED = eng.autogen.att.gz eng.automorf.att.gz eng.automorf.bin\n"));
}

#[test]
fn test_unknown_target_kind_writes_nothing() {
    let package = TestPackage::with_files(
        ENG_META,
        r#"<modes><mode name="eng-odd" install="yes"><file name="eng.frobnicate.bin"/></mode></modes>"#,
    );

    generate(&package)
        .failure()
        .stderr(predicate::str::contains(
            "Could not find recipe for eng.frobnicate.bin",
        ));

    assert!(!package.exists("Makefile"));
    assert!(!package.exists("apertium-eng.pc"));
}

#[test]
fn test_missing_sources_writes_nothing() {
    let package = TestPackage::with_files(
        "LANG = eng\nVERSION = 0.3.1\nSOURCES : apertium-eng.eng.dix\n",
        ENG_MODES,
    );

    generate(&package)
        .failure()
        .stderr(predicate::str::contains(
            "Sources required for eng.rlx.bin not found",
        ));

    assert!(!package.exists("Makefile"));
}

#[test]
fn test_both_language_markers_abort_setup() {
    let package = TestPackage::with_files(
        "LANG = eng\nLANG1 = eng\nLANG2 = spa\nVERSION = 0.3.1\n",
        ENG_MODES,
    );

    generate(&package).failure().stderr(predicate::str::contains(
        "Metadata file cannot specify both LANG and LANG1,LANG2.",
    ));

    assert!(!package.exists("Makefile"));
}

#[test]
fn test_invalid_version_aborts() {
    let package =
        TestPackage::with_files("LANG = eng\nVERSION = 1.2\n", MORPH_MODES);

    generate(&package)
        .failure()
        .stderr(predicate::str::contains("Major.Minor.Patch"));
}

#[test]
fn test_output_is_deterministic() {
    let package = TestPackage::with_files(ENG_META, ENG_MODES);

    generate(&package).success();
    let first = package.read_file("Makefile");
    let first_pc = package.read_file("apertium-eng.pc");

    generate(&package).success();
    assert_eq!(first, package.read_file("Makefile"));
    assert_eq!(first_pc, package.read_file("apertium-eng.pc"));
}

#[test]
fn test_makefile_scaffolding() {
    let package = TestPackage::with_files(ENG_META, ENG_MODES);

    generate(&package)
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let makefile = package.read_file("Makefile");
    assert!(makefile.contains("BASENAME = apertium-eng\n"));
    assert!(makefile.contains("INSTALL_MODES = eng-morph.mode eng-disam.mode\n"));
    assert!(makefile.contains("TARGETS = eng.automorf.bin eng.rlx.bin\n"));
    assert!(makefile.contains("prefix = /usr/local\n"));
    assert!(makefile.contains("eng.rlx.bin: apertium-eng.eng.rlx\n\tcg-comp $< $@\n"));
    assert!(makefile.contains("Makefile: apertium-eng.meta modes.xml\n"));
    assert!(makefile.contains("install: install-pc install-data install-modes\n"));

    let pc = package.read_file("apertium-eng.pc");
    assert!(pc.contains("Name: apertium-eng\n"));
    assert!(pc.contains("Version: 0.3.1\n"));
}

#[test]
fn test_prefix_from_command_line() {
    let package = TestPackage::with_files(ENG_META, MORPH_MODES);

    package
        .apertium_setup()
        .args(["generate", "apertium-eng.meta", "modes.xml", "--prefix", "/opt/apertium"])
        .assert()
        .success();

    assert!(package
        .read_file("apertium-eng.pc")
        .starts_with("prefix=/opt/apertium\n"));
    assert!(package
        .read_file("Makefile")
        .contains("datadir = /opt/apertium/share/apertium/apertium-eng/\n"));
}

#[test]
fn test_prefix_from_config_file_and_override() {
    let package = TestPackage::with_files(ENG_META, MORPH_MODES);
    package.create_file(
        "apertium-setup.toml",
        "[paths]\nprefix = \"/srv\"\n\n[programs]\nshell = \"/bin/sh\"\n",
    );

    generate(&package).success();
    let makefile = package.read_file("Makefile");
    assert!(makefile.contains("prefix = /srv\n"));
    assert!(makefile.contains("SHELL = /bin/sh\n"));
    assert!(makefile.contains("Makefile: apertium-eng.meta modes.xml apertium-setup.toml\n"));
    assert!(makefile.contains(
        "\tapertium-setup generate apertium-eng.meta modes.xml -o . \
         --config apertium-setup.toml --prefix $(prefix)\n"
    ));

    package
        .apertium_setup()
        .args(["generate", "apertium-eng.meta", "modes.xml"])
        .env("APERTIUM_SETUP_PREFIX", "/usr")
        .assert()
        .success();
    assert!(package.read_file("Makefile").contains("prefix = /usr\n"));
}

#[test]
fn test_output_directory_defaults_to_metadata_directory() {
    let package = TestPackage::new();
    package.create_file("pkg/apertium-eng.meta", ENG_META);
    package.create_file("pkg/modes.xml", MORPH_MODES);

    package
        .apertium_setup()
        .args(["generate", "pkg/apertium-eng.meta", "pkg/modes.xml"])
        .assert()
        .success();

    assert!(package.exists("pkg/Makefile"));
    assert!(package.exists("pkg/apertium-eng.pc"));
    assert!(!package.exists("Makefile"));

    let makefile = package.read_file("pkg/Makefile");
    assert!(makefile.contains("Makefile: apertium-eng.meta modes.xml\n"));
    assert!(makefile.contains(
        "\tapertium-setup generate apertium-eng.meta modes.xml -o . --prefix $(prefix)\n"
    ));
    assert!(makefile.contains("\tapertium-gen-modes -f modes.xml $(datadir)\n"));

    package
        .apertium_setup()
        .args(["generate", "pkg/apertium-eng.meta", "pkg/modes.xml", "-o", "pkg"])
        .assert()
        .success();
    assert_eq!(makefile, package.read_file("pkg/Makefile"));
}

#[test]
fn test_output_directory_away_from_sources_is_rejected() {
    let package = TestPackage::with_files(ENG_META, MORPH_MODES);

    package
        .apertium_setup()
        .args(["generate", "apertium-eng.meta", "modes.xml", "-o", "build"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "must be the directory containing apertium-eng.meta",
        ));

    assert!(!package.exists("build/Makefile"));
    assert!(!package.exists("Makefile"));
    assert!(!package.exists("apertium-eng.pc"));
}

#[test]
fn test_modes_file_outside_package_directory() {
    let package = TestPackage::new();
    package.create_file("pkg/apertium-eng.meta", ENG_META);
    package.create_file("shared/modes.xml", MORPH_MODES);

    package
        .apertium_setup()
        .args(["generate", "pkg/apertium-eng.meta", "shared/modes.xml"])
        .assert()
        .success();

    let makefile = package.read_file("pkg/Makefile");
    assert!(makefile.contains("Makefile: apertium-eng.meta ../shared/modes.xml\n"));
    assert!(makefile.contains("\tapertium-gen-modes -f ../shared/modes.xml $(datadir)\n"));
}

#[test]
fn test_declared_variant_targets() {
    let package = TestPackage::with_files(
        "LANG = eng\nVERSION = 0.3.1\nVAR : GB\nSOURCES : apertium-eng.eng.dix\n",
        r#"<modes><mode name="eng_GB-gener" install="yes"><file name="eng_GB.autogen.bin"/></mode></modes>"#,
    );

    generate(&package).success();

    let makefile = package.read_file("Makefile");
    assert!(makefile.contains(
        "eng_GB.autogen.bin: apertium-eng.eng.dix\n\
         \tapertium-validate-dictionary $<\n\
         \tlt-comp rl $< $@\n"
    ));
    assert!(makefile.contains("VAR = GB\n"));
    assert!(makefile.contains("INSTALL_MODES = eng_GB-gener.mode\n"));
}

#[test]
fn test_undeclared_variant_is_unknown() {
    let package = TestPackage::with_files(
        "LANG = eng\nVERSION = 0.3.1\nVAR : GB\nSOURCES : apertium-eng.eng.dix\n",
        r#"<modes><mode name="eng_US-gener" install="yes"><file name="eng_US.autogen.bin"/></mode></modes>"#,
    );

    generate(&package)
        .failure()
        .stderr(predicate::str::contains(
            "Could not find recipe for eng_US.autogen.bin",
        ));
    assert!(!package.exists("Makefile"));
}

#[test]
fn test_version_written_as_declared() {
    let package = TestPackage::with_files(
        "LANG = eng\nVERSION = 0.01.10\nSOURCES : apertium-eng.eng.dix\n",
        MORPH_MODES,
    );

    generate(&package).success();

    assert!(package.read_file("apertium-eng.pc").contains("Version: 0.01.10\n"));
    assert!(package.read_file("Makefile").contains("VERSION = 0.01.10\n"));
}

#[test]
fn test_pair_package_keeps_custom_block() {
    let package = TestPackage::new();
    package.create_file(
        "apertium-eng-spa.meta",
        "LANG1 = eng\nLANG2 = spa\nVERSION = 1.0.0\nCUSTOM\neng-spa.t1x.bin: apertium-eng-spa.eng-spa.t1x\n\tapertium-preprocess-transfer $< $@\n",
    );
    package.create_file("modes.xml", "<modes></modes>");

    package
        .apertium_setup()
        .args(["generate", "apertium-eng-spa.meta", "modes.xml"])
        .assert()
        .success();

    let makefile = package.read_file("Makefile");
    assert!(makefile.ends_with(
        "eng-spa.t1x.bin: apertium-eng-spa.eng-spa.t1x\n\tapertium-preprocess-transfer $< $@\n\n"
    ));
    assert!(makefile.contains("GENERATED = \n"));
    assert!(package
        .read_file("apertium-eng-spa.pc")
        .contains("Description: Apertium-based eng-spa machine translation\n"));
}

#[test]
fn test_missing_metadata_file() {
    let package = TestPackage::new();
    package.create_file("modes.xml", ENG_MODES);

    generate(&package)
        .failure()
        .stderr(predicate::str::contains("apertium-eng.meta"));
}
