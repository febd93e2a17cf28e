// Common test utilities shared across acceptance tests
//
// Each test gets its own temporary package directory. The user config
// directory is pointed into it too, so a config file on the developer's
// machine never leaks into a run.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const ENG_META: &str = "\
LANG = eng
LANG_NAME = English
VERSION = 0.3.1
SOURCES : apertium-eng.eng.dix apertium-eng.eng.acx
SOURCES : apertium-eng.eng.rlx
";

pub const ENG_MODES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<modes>
  <mode name="eng-morph" install="yes">
    <pipeline>
      <program name="lt-proc -w">
        <file name="eng.automorf.bin"/>
      </program>
    </pipeline>
  </mode>
  <mode name="eng-disam" install="yes">
    <pipeline>
      <program name="lt-proc -w">
        <file name="eng.automorf.bin"/>
      </program>
      <program name="cg-proc">
        <file name="eng.rlx.bin"/>
      </program>
    </pipeline>
  </mode>
</modes>
"#;

/// Modes file requesting only the analyser
pub const MORPH_MODES: &str = r#"<modes>
  <mode name="eng-morph" install="yes">
    <pipeline>
      <program name="lt-proc -w">
        <file name="eng.automorf.bin"/>
      </program>
    </pipeline>
  </mode>
</modes>
"#;

pub struct TestPackage {
    temp_dir: TempDir,
}

impl TestPackage {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Package with `apertium-eng.meta` and `modes.xml` already written
    #[allow(dead_code)]
    pub fn with_files(meta: &str, modes: &str) -> Self {
        let package = Self::new();
        package.create_file("apertium-eng.meta", meta);
        package.create_file("modes.xml", modes);
        package
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn apertium_setup(&self) -> Command {
        let mut cmd = Command::new(std::env!("CARGO_BIN_EXE_apertium-setup"));
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env("RUST_LOG", "warn")
            .env_remove("APERTIUM_SETUP_PREFIX")
            .env_remove("APERTIUM_SETUP_CONFIG");
        cmd
    }

    pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.path().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&file_path, content).unwrap();
        file_path
    }

    #[allow(dead_code)]
    pub fn read_file(&self, path: &str) -> String {
        fs::read_to_string(self.path().join(path)).unwrap()
    }

    #[allow(dead_code)]
    pub fn exists(&self, path: &str) -> bool {
        self.path().join(path).exists()
    }
}
