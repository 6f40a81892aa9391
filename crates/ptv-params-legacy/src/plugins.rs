//! Plugin registry: which sequence/tracking plugins exist and which are selected.

use std::fs;
use std::path::Path;

use ptv_params_core::{Diagnostic, DiagnosticKind, Loaded};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::record::SectionError;

/// Side file written next to the `.par` files.
pub const PLUGINS_FILE: &str = "plugins.json";
/// Built-in plugin, always available for both roles.
pub const DEFAULT_PLUGIN: &str = "default";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PluginRole {
    Sequence,
    Tracking,
}

/// Role implied by a plugin's name, if any.
pub fn classify(name: &str) -> Option<PluginRole> {
    let lower = name.to_ascii_lowercase();
    if lower.contains("sequence") {
        Some(PluginRole::Sequence)
    } else if lower.contains("track") {
        Some(PluginRole::Tracking)
    } else {
        None
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginRegistry {
    pub available_sequence: Vec<String>,
    pub available_tracking: Vec<String>,
    pub selected_sequence: String,
    pub selected_tracking: String,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self {
            available_sequence: vec![DEFAULT_PLUGIN.to_string()],
            available_tracking: vec![DEFAULT_PLUGIN.to_string()],
            selected_sequence: DEFAULT_PLUGIN.to_string(),
            selected_tracking: DEFAULT_PLUGIN.to_string(),
        }
    }
}

/// On-disk shape of [`PLUGINS_FILE`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct SideFile {
    #[serde(default)]
    sequence: Vec<String>,
    #[serde(default)]
    tracking: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_sequence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_tracking: Option<String>,
}

fn available(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut names: Vec<String> = names
        .into_iter()
        .filter(|n| !n.is_empty() && n != DEFAULT_PLUGIN)
        .collect();
    names.sort();
    names.dedup();
    names.insert(0, DEFAULT_PLUGIN.to_string());
    names
}

/// Plugin name of a directory entry: directory name, or file name up to the
/// first dot for `.py`/`.so`/`.dll` files.
fn plugin_name(path: &Path, extensions: &[&str], include_dirs: bool) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    if file_name.starts_with('.') || file_name.starts_with('_') {
        return None;
    }
    if path.is_dir() {
        return include_dirs.then(|| file_name.to_string());
    }
    let ext = path.extension()?.to_str()?;
    if !extensions.contains(&ext) {
        return None;
    }
    file_name.split('.').next().map(str::to_string)
}

impl PluginRegistry {
    /// Registry with `default` plus the given names, `default` selected.
    pub fn from_names(
        sequence: impl IntoIterator<Item = String>,
        tracking: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            available_sequence: available(sequence),
            available_tracking: available(tracking),
            ..Self::default()
        }
    }

    pub fn is_default_only(&self) -> bool {
        *self == Self::default()
    }

    /// Make sure `default` is available for both roles and that selections
    /// point at available plugins.
    pub fn ensure_default(&mut self) {
        for (list, selected) in [
            (&mut self.available_sequence, &mut self.selected_sequence),
            (&mut self.available_tracking, &mut self.selected_tracking),
        ] {
            if !list.iter().any(|n| n == DEFAULT_PLUGIN) {
                list.insert(0, DEFAULT_PLUGIN.to_string());
            }
            if !list.contains(selected) {
                log::warn!("selected plugin `{selected}` is not available; using `{DEFAULT_PLUGIN}`");
                *selected = DEFAULT_PLUGIN.to_string();
            }
        }
    }

    /// List plugin directories and `.py`/`.so`/`.dll` files under `dir`.
    ///
    /// Names containing `sequence` or `track` go to that role; anything else
    /// is offered for both.
    pub fn scan(dir: &Path) -> Self {
        let mut sequence = Vec::new();
        let mut tracking = Vec::new();
        for name in list_plugins(dir, &["py", "so", "dll"], true) {
            match classify(&name) {
                Some(PluginRole::Sequence) => sequence.push(name),
                Some(PluginRole::Tracking) => tracking.push(name),
                None => {
                    sequence.push(name.clone());
                    tracking.push(name);
                }
            }
        }
        Self::from_names(sequence, tracking)
    }

    /// Registry from a directory of `*.py` plugin scripts, classified by
    /// file name. Returns `None` when `dir` is not a directory.
    pub fn from_script_dir(dir: &Path) -> Option<Self> {
        if !dir.is_dir() {
            return None;
        }
        let mut sequence = Vec::new();
        let mut tracking = Vec::new();
        for name in list_plugins(dir, &["py"], false) {
            match classify(&name) {
                Some(PluginRole::Sequence) => sequence.push(name),
                Some(PluginRole::Tracking) => tracking.push(name),
                None => log::debug!("plugin script `{name}` has no recognised role"),
            }
        }
        Some(Self::from_names(sequence, tracking))
    }

    /// Read [`PLUGINS_FILE`] from `dir`. `None` when the file does not exist.
    pub fn read_side_file(dir: &Path) -> Option<Loaded<Self>> {
        let path = dir.join(PLUGINS_FILE);
        let raw = fs::read_to_string(&path).ok()?;
        let side: SideFile = match serde_json::from_str(&raw) {
            Ok(side) => side,
            Err(err) => {
                let warning = Diagnostic::warn(
                    DiagnosticKind::Malformed,
                    path.display().to_string(),
                    format!("{err}; using the default plugin registry"),
                );
                return Some(Loaded::with_warnings(Self::default(), vec![warning]));
            }
        };
        let mut registry = Self::from_names(side.sequence, side.tracking);
        if let Some(selected) = side.selected_sequence {
            registry.selected_sequence = selected;
        }
        if let Some(selected) = side.selected_tracking {
            registry.selected_tracking = selected;
        }
        registry.ensure_default();
        Some(Loaded::clean(registry))
    }

    /// Write [`PLUGINS_FILE`] into `dir`; errors are logged and reported as `false`.
    pub fn write_side_file(&self, dir: &Path) -> bool {
        let without_default = |names: &[String]| {
            names
                .iter()
                .filter(|n| *n != DEFAULT_PLUGIN)
                .cloned()
                .collect::<Vec<_>>()
        };
        let side = SideFile {
            sequence: without_default(&self.available_sequence),
            tracking: without_default(&self.available_tracking),
            selected_sequence: Some(self.selected_sequence.clone())
                .filter(|s| s != DEFAULT_PLUGIN),
            selected_tracking: Some(self.selected_tracking.clone())
                .filter(|s| s != DEFAULT_PLUGIN),
        };
        let path = dir.join(PLUGINS_FILE);
        let result = serde_json::to_string_pretty(&side)
            .map_err(std::io::Error::other)
            .and_then(|json| fs::write(&path, json + "\n"));
        match result {
            Ok(()) => true,
            Err(err) => {
                log::error!("failed to write {}: {err}", path.display());
                false
            }
        }
    }

    pub fn to_value(&self) -> Value {
        serde_yaml::to_value(self).unwrap_or(Value::Null)
    }

    pub fn from_value(value: &Value) -> Result<Self, SectionError> {
        let mut registry: Self =
            serde_yaml::from_value(value.clone()).map_err(|source| SectionError::Convert {
                section: "plugins",
                source,
            })?;
        registry.ensure_default();
        Ok(registry)
    }
}

fn list_plugins(dir: &Path, extensions: &[&str], include_dirs: bool) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            log::debug!("cannot list plugins in {}: {err}", dir.display());
            return Vec::new();
        }
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| plugin_name(&entry.path(), extensions, include_dirs))
        .collect();
    names.sort();
    names
}
