//! Experiments: a directory holding several parameter sets, one active.
//!
//! Each set is a unified YAML document named `parameters_<name>.yaml` in
//! the experiment directory. A directory that only has a legacy
//! `parameters/` folder is converted into the set `default` when opened.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{ParameterManager, ParamsError};

const FILE_PREFIX: &str = "parameters_";
const FILE_SUFFIX: &str = ".yaml";
/// Legacy parameter folder inside an experiment.
pub const LEGACY_DIR: &str = "parameters";
/// Name given to a parameter set converted from [`LEGACY_DIR`].
pub const DEFAULT_PARAMSET: &str = "default";

#[derive(Clone, Debug)]
pub struct Experiment {
    root: PathBuf,
    paramsets: Vec<String>,
    active: Option<String>,
}

fn paramset_file(root: &Path, name: &str) -> PathBuf {
    root.join(format!("{FILE_PREFIX}{name}{FILE_SUFFIX}"))
}

fn list_paramsets(root: &Path) -> io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(root)?
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| {
            let file_name = entry.file_name().into_string().ok()?;
            let name = file_name
                .strip_prefix(FILE_PREFIX)?
                .strip_suffix(FILE_SUFFIX)?;
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect();
    names.sort();
    Ok(names)
}

fn check_name(name: &str) -> Result<(), ParamsError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !name.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(ParamsError::InvalidParamSetName(name.to_string()))
    }
}

impl Experiment {
    /// Open an experiment directory and pick the active set: `default`
    /// when present, otherwise the first by name.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let root = root.as_ref().to_path_buf();
        let mut paramsets = list_paramsets(&root)?;

        let legacy = root.join(LEGACY_DIR);
        if paramsets.is_empty() && legacy.is_dir() {
            log::info!(
                "converting {} into parameter set `{DEFAULT_PARAMSET}`",
                legacy.display()
            );
            let mut manager = ParameterManager::from_directory(&legacy)?;
            manager.to_yaml(paramset_file(&root, DEFAULT_PARAMSET))?;
            paramsets.push(DEFAULT_PARAMSET.to_string());
        }

        let active = paramsets
            .iter()
            .find(|name| *name == DEFAULT_PARAMSET)
            .or_else(|| paramsets.first())
            .cloned();
        Ok(Self {
            root,
            paramsets,
            active,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Parameter set names, sorted.
    pub fn paramset_names(&self) -> &[String] {
        &self.paramsets
    }

    pub fn paramset_path(&self, name: &str) -> PathBuf {
        paramset_file(&self.root, name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.paramsets.iter().any(|n| n == name)
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn set_active(&mut self, name: &str) -> Result<(), ParamsError> {
        if !self.contains(name) {
            return Err(ParamsError::UnknownParamSet(name.to_string()));
        }
        log::debug!("active parameter set is now `{name}`");
        self.active = Some(name.to_string());
        Ok(())
    }

    /// Load the active parameter set.
    pub fn active_manager(&self) -> Result<ParameterManager, ParamsError> {
        let name = self.active.as_deref().ok_or(ParamsError::NoParamSets)?;
        ParameterManager::from_yaml(self.paramset_path(name))
    }

    fn insert(&mut self, name: &str) {
        if let Err(pos) = self.paramsets.binary_search_by(|n| n.as_str().cmp(name)) {
            self.paramsets.insert(pos, name.to_string());
        }
        if self.active.is_none() {
            self.active = Some(name.to_string());
        }
    }

    fn check_new(&self, name: &str) -> Result<(), ParamsError> {
        check_name(name)?;
        if self.contains(name) {
            return Err(ParamsError::ParamSetExists(name.to_string()));
        }
        Ok(())
    }

    /// Convert a legacy `.par` directory into a new parameter set.
    pub fn import_directory(
        &mut self,
        name: &str,
        par_dir: impl AsRef<Path>,
    ) -> Result<ParameterManager, ParamsError> {
        self.check_new(name)?;
        let mut manager = ParameterManager::from_directory(par_dir)?;
        manager.to_yaml(self.paramset_path(name))?;
        self.insert(name);
        Ok(manager)
    }

    /// Copy parameter set `src` to a new set `new_name`.
    pub fn duplicate_paramset(
        &mut self,
        src: &str,
        new_name: &str,
    ) -> Result<PathBuf, ParamsError> {
        if !self.contains(src) {
            return Err(ParamsError::UnknownParamSet(src.to_string()));
        }
        self.check_new(new_name)?;
        let target = self.paramset_path(new_name);
        fs::copy(self.paramset_path(src), &target)?;
        self.insert(new_name);
        Ok(target)
    }

    /// Delete a parameter set's file. The active set cannot be removed.
    pub fn remove_paramset(&mut self, name: &str) -> Result<(), ParamsError> {
        if !self.contains(name) {
            return Err(ParamsError::UnknownParamSet(name.to_string()));
        }
        if self.active.as_deref() == Some(name) {
            return Err(ParamsError::ActiveParamSet(name.to_string()));
        }
        fs::remove_file(self.paramset_path(name))?;
        self.paramsets.retain(|n| n != name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_must_be_plain() {
        assert!(check_name("run_2").is_ok());
        assert!(check_name("high-speed.v2").is_ok());
        for bad in ["", "../x", "a/b", ".hidden"] {
            assert!(check_name(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn lists_only_paramset_files() {
        let tmp = tempfile::tempdir().unwrap();
        let files = ["parameters_b.yaml", "parameters_a.yaml", "parameters_.yaml", "other.yaml"];
        for file in files {
            fs::write(tmp.path().join(file), "num_cams: 0\n").unwrap();
        }
        fs::create_dir(tmp.path().join("parameters_dir.yaml")).unwrap();
        assert_eq!(list_paramsets(tmp.path()).unwrap(), ["a", "b"]);
    }
}
