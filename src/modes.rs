/// Mode descriptor (modes.xml) reading
///
/// Only the parts the build needs are read: each `<mode>`'s `name` and
/// `install` attributes and the `name` of every `<file>` nested anywhere
/// inside it.
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::ModeError;
use crate::logging::operations;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mode {
    pub name: String,
    /// `install="yes"`
    pub install: bool,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeDescriptor {
    pub modes: Vec<Mode>,
}

/// What the modes contribute to the build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeTargets {
    /// `<name>.mode` for each installable mode, in document order
    pub install_modes: Vec<String>,
    /// Files the modes need that are not sources, deduplicated and sorted
    pub targets: Vec<String>,
}

impl ModeDescriptor {
    pub fn load(path: &Path) -> Result<Self, ModeError> {
        let content = fs::read_to_string(path)?;
        let descriptor = Self::parse(&content)?;
        debug!(
            operation = operations::LOAD_MODES,
            path = %path.display(),
            mode_count = descriptor.modes.len(),
            "read mode descriptor"
        );
        Ok(descriptor)
    }

    pub fn parse(xml: &str) -> Result<Self, ModeError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut modes = Vec::new();
        let mut current: Option<Mode> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                ModeError::Xml(format!("{} (at byte {})", e, reader.error_position()))
            })?;

            match event {
                Event::Start(e) if e.name().as_ref() == b"mode" => {
                    current = Some(start_mode(&e)?);
                }
                Event::Empty(e) if e.name().as_ref() == b"mode" => {
                    modes.push(start_mode(&e)?);
                }
                Event::End(e) if e.name().as_ref() == b"mode" => {
                    if let Some(mode) = current.take() {
                        modes.push(mode);
                    }
                }
                Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"file" => {
                    if let Some(mode) = current.as_mut() {
                        let name = attribute(&e, "name")?.ok_or_else(|| ModeError::MissingName {
                            element: "file".to_string(),
                        })?;
                        mode.files.push(name);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self { modes })
    }

    /// Collect install modes and build targets
    ///
    /// Installable modes contribute every file that is not a source. Other
    /// modes only contribute bare file names; names with a path separator
    /// come from elsewhere.
    pub fn discover(&self, sources: &[String]) -> ModeTargets {
        let mut install_modes = Vec::new();
        let mut targets = BTreeSet::new();

        for mode in &self.modes {
            if mode.install {
                install_modes.push(format!("{}.mode", mode.name));
            }
            for file in &mode.files {
                if sources.contains(file) || (!mode.install && file.contains('/')) {
                    continue;
                }
                targets.insert(file.clone());
            }
        }

        ModeTargets {
            install_modes,
            targets: targets.into_iter().collect(),
        }
    }
}

fn start_mode(e: &BytesStart<'_>) -> Result<Mode, ModeError> {
    let name = attribute(e, "name")?.ok_or_else(|| ModeError::MissingName {
        element: "mode".to_string(),
    })?;
    let install = attribute(e, "install")?.as_deref() == Some("yes");
    Ok(Mode {
        name,
        install,
        files: Vec::new(),
    })
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Result<Option<String>, ModeError> {
    let Some(attr) = e
        .try_get_attribute(key)
        .map_err(|err| ModeError::Xml(err.to_string()))?
    else {
        return Ok(None);
    };
    let value = attr
        .unescape_value()
        .map_err(|err| ModeError::Xml(err.to_string()))?;
    Ok(Some(value.into_owned()))
}
