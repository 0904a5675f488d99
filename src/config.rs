//! Scope configuration: matching options and loadable scope definitions.
//!
//! A [`ScopeConfig`] can be read from YAML, JSON or a small line-oriented text
//! format:
//!
//! ```text
//! # comments start with '#'
//! [include]
//! *.example.com
//! 192.168.10.0/24
//!
//! [exclude]
//! admin.example.com
//!
//! [target]
//! https://www.example.com/
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::{Error, Result};
use crate::Scope;

/// Matching options for a [`Scope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeOptions {
    /// Let an include match any target it is a string prefix of.
    ///
    /// With this on, `example.com` also admits `example.com/foo` and
    /// `example.com:8080`, but also `example.community`. On by default for
    /// compatibility with existing scope files.
    pub parent_prefix_includes: bool,
}

impl ScopeOptions {
    /// Options with every legacy leniency turned off.
    pub fn strict() -> Self {
        Self {
            parent_prefix_includes: false,
        }
    }
}

impl Default for ScopeOptions {
    fn default() -> Self {
        Self {
            parent_prefix_includes: true,
        }
    }
}

/// A serializable scope definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Include definitions
    pub includes: Vec<String>,
    /// Exclude definitions
    pub excludes: Vec<String>,
    /// Confirmed targets
    pub targets: Vec<String>,
    /// Matching options
    pub options: ScopeOptions,
}

impl ScopeConfig {
    /// Parse a YAML scope definition.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse a JSON scope definition.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse the text format from a string.
    pub fn from_text(content: &str) -> Result<Self> {
        Self::from_reader(content.as_bytes())
    }

    /// Parse the text format from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut config = Self::default();
        let mut section: Option<Section> = None;

        for (idx, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;

            // Remove comments
            let line = match line.find('#') {
                Some(pos) => &line[..pos],
                None => line.as_str(),
            };
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                let name = line[1..line.len() - 1].trim();
                section = Some(Section::parse(name).ok_or_else(|| {
                    Error::Config(format!("line {}: unknown section [{}]", idx + 1, name))
                })?);
                continue;
            }

            let list = match section {
                Some(Section::Include) => &mut config.includes,
                Some(Section::Exclude) => &mut config.excludes,
                Some(Section::Target) => &mut config.targets,
                None => {
                    return Err(Error::Config(format!(
                        "line {}: entry {:?} outside of a section",
                        idx + 1,
                        line
                    )))
                }
            };
            list.push(line.to_string());
        }

        Ok(config)
    }

    /// Load a config file, choosing the format by extension.
    ///
    /// `.yaml`/`.yml` is YAML, `.json` is JSON, anything else is the text
    /// format.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        let config = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => Self::from_text(&content)?,
        };

        log::debug!(
            "Loaded scope config {:?}: {} includes, {} excludes, {} targets",
            path,
            config.includes.len(),
            config.excludes.len(),
            config.targets.len()
        );

        Ok(config)
    }

    /// Build a Scope: includes first, then excludes, then targets.
    ///
    /// Stops at the first invalid entry.
    pub fn build(&self) -> Result<Scope> {
        let mut scope = Scope::with_options(self.options);
        self.apply(&mut scope)?;
        Ok(scope)
    }

    /// Add this config's entries to an existing Scope.
    ///
    /// The Scope's options are left untouched.
    pub fn apply(&self, scope: &mut Scope) -> Result<()> {
        scope.add_includes(&self.includes)?;
        scope.add_excludes(&self.excludes)?;
        scope.add_targets(&self.targets)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Include,
    Exclude,
    Target,
}

impl Section {
    fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "include" | "includes" => Some(Section::Include),
            "exclude" | "excludes" => Some(Section::Exclude),
            "target" | "targets" => Some(Section::Target),
            _ => None,
        }
    }
}
