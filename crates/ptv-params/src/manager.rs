use std::fs;
use std::path::{Path, PathBuf};

use ptv_params_core::{Diagnostic, Loaded, MAX_DECLARED_COUNT};
use ptv_params_legacy::{
    LegacyRecord, ManOriCoordinates, PluginRegistry, PtvParams, SectionError, SectionKind,
};
use ptv_params_native::{NativeConfig, NativeSections};
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::defaults::{
    inject_defaults, strip_keys, MaskingParams, UnsharpMaskParams, CAMERA_COUNT_KEYS,
    MAN_ORI_COORDINATES, MASKING, NUM_CAMS, PLUGINS, UNSHARP_MASK,
};
use crate::directory::{discover_plugins, load_directory, write_directory};
use crate::yaml::{parse_document, render_document};
use crate::ParamsError;

/// One experiment's parameters: the authoritative camera count and a
/// mapping from section name to that section's fields.
///
/// Sections never carry their own camera count; `num_cams` lives here only.
#[derive(Clone, Debug)]
pub struct ParameterManager {
    num_cams: usize,
    parameters: Mapping,
    yaml_path: Option<PathBuf>,
    diagnostics: Vec<Diagnostic>,
}

impl Default for ParameterManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterManager {
    /// No cameras, only the default `plugins`/`masking`/`unsharp_mask` sections.
    pub fn new() -> Self {
        let mut parameters = Mapping::new();
        inject_defaults(&mut parameters);
        Self {
            num_cams: 0,
            parameters,
            yaml_path: None,
            diagnostics: Vec::new(),
        }
    }

    fn from_loaded(loaded: Loaded<(usize, Mapping)>, yaml_path: Option<PathBuf>) -> Self {
        let Loaded { value, warnings } = loaded;
        Self {
            num_cams: value.0,
            parameters: value.1,
            yaml_path,
            diagnostics: warnings,
        }
    }

    /// Load a legacy parameter directory.
    ///
    /// Missing or malformed files never fail the load; they show up in
    /// [`diagnostics`](Self::diagnostics).
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(dir = %dir.as_ref().display()))
    )]
    pub fn from_directory(dir: impl AsRef<Path>) -> Result<Self, ParamsError> {
        Ok(Self::from_loaded(load_directory(dir.as_ref())?, None))
    }

    /// Write every recognised section as a `.par` file, plus `man_ori.dat`
    /// and `plugins.json` when there is something to put in them.
    ///
    /// Returns `Ok(false)` when some file could not be written.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(dir = %dir.as_ref().display()))
    )]
    pub fn to_directory(&self, dir: impl AsRef<Path>) -> Result<bool, ParamsError> {
        let dir = dir.as_ref();
        let written = write_directory(dir, self.num_cams, &self.parameters)?;
        log::info!("wrote parameters for {} camera(s) to {}", self.num_cams, dir.display());
        Ok(written)
    }

    /// Load a unified YAML document. A missing file is an error.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))
    )]
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ParamsError::YamlNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let loaded = parse_document(&text, &path.display().to_string())?;
        Ok(Self::from_loaded(loaded, Some(path.to_path_buf())))
    }

    /// Save the unified YAML document. Saving twice without changes gives
    /// identical files.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))
    )]
    pub fn to_yaml(&mut self, path: impl AsRef<Path>) -> Result<(), ParamsError> {
        let path = path.as_ref();
        fs::write(path, render_document(self.num_cams, &self.parameters)?)?;
        log::info!("saved parameters to {}", path.display());
        self.yaml_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Re-save to the YAML file this manager was loaded from or last saved to.
    pub fn save_parameters(&mut self) -> Result<(), ParamsError> {
        let path = self.yaml_path.clone().ok_or(ParamsError::NoYamlPath)?;
        self.to_yaml(path)
    }

    pub fn yaml_path(&self) -> Option<&Path> {
        self.yaml_path.as_deref()
    }

    /// Warnings collected by the load that produced this manager.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[inline]
    pub fn get_n_cam(&self) -> usize {
        self.num_cams
    }

    /// Change the camera count and fit every per-camera list to it.
    ///
    /// On error the manager is left as it was.
    pub fn set_n_cam(&mut self, n: usize) -> Result<(), ParamsError> {
        if n > MAX_DECLARED_COUNT {
            return Err(ParamsError::TooManyCameras(n));
        }
        let mut parameters = self.parameters.clone();
        for (key, section) in parameters.iter_mut() {
            if let Some(kind) = key.as_str().and_then(SectionKind::from_section) {
                kind.fit_section(section, Some(n))?;
            }
        }
        if let Some(value) = parameters.get_mut(MAN_ORI_COORDINATES) {
            let present = ManOriCoordinates::camera_entries(value);
            let mut coords = ManOriCoordinates::from_value(value, present).value;
            coords.resize(n);
            *value = coords.to_value();
        }
        self.parameters = parameters;
        self.num_cams = n;
        Ok(())
    }

    /// The whole section mapping.
    pub fn parameters(&self) -> &Mapping {
        &self.parameters
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    /// Section `name`; an absent section is an error, an empty one is not.
    pub fn get_parameter(&self, name: &str) -> Result<&Value, ParamsError> {
        self.parameters
            .get(name)
            .ok_or_else(|| ParamsError::MissingSection(name.to_string()))
    }

    pub fn get_parameter_mut(&mut self, name: &str) -> Result<&mut Value, ParamsError> {
        self.parameters
            .get_mut(name)
            .ok_or_else(|| ParamsError::MissingSection(name.to_string()))
    }

    /// Insert or replace section `name`.
    ///
    /// `num_cams` goes to [`set_n_cam`](Self::set_n_cam); camera counts
    /// inside a section are dropped.
    pub fn set_parameter(&mut self, name: &str, mut value: Value) -> Result<(), ParamsError> {
        if name == NUM_CAMS {
            let n = value
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| {
                    ParamsError::InvalidDocument("`num_cams` must be a non-negative integer".into())
                })?;
            return self.set_n_cam(n);
        }
        strip_keys(&mut value, &CAMERA_COUNT_KEYS);
        self.parameters.insert(name.into(), value);
        Ok(())
    }

    /// Typed view of a legacy section.
    pub fn section<T: LegacyRecord>(&self) -> Result<T, ParamsError> {
        Ok(T::from_section(self.get_parameter(T::SECTION)?)?)
    }

    /// Typed view of a legacy section that may be absent.
    pub fn optional_section<T: LegacyRecord>(&self) -> Result<Option<T>, ParamsError> {
        match self.parameters.get(T::SECTION) {
            Some(value) => Ok(Some(T::from_section(value)?)),
            None => Ok(None),
        }
    }

    pub fn set_section<T: LegacyRecord>(&mut self, record: &T) -> Result<(), ParamsError> {
        self.parameters
            .insert(T::SECTION.into(), record.to_section()?);
        Ok(())
    }

    fn reserved<T: DeserializeOwned + Default>(&self, key: &'static str) -> Result<T, ParamsError> {
        match self.parameters.get(key) {
            Some(value) => serde_yaml::from_value(value.clone()).map_err(|source| {
                ParamsError::Section(SectionError::Convert {
                    section: key,
                    source,
                })
            }),
            None => Ok(T::default()),
        }
    }

    pub fn masking(&self) -> Result<MaskingParams, ParamsError> {
        self.reserved(MASKING)
    }

    pub fn unsharp_mask(&self) -> Result<UnsharpMaskParams, ParamsError> {
        self.reserved(UNSHARP_MASK)
    }

    /// Manual-orientation point coordinates, one entry per camera.
    pub fn man_ori_coordinates(&self) -> Option<ManOriCoordinates> {
        let value = self.parameters.get(MAN_ORI_COORDINATES)?;
        Some(ManOriCoordinates::from_value(value, self.num_cams).value)
    }

    pub fn set_man_ori_coordinates(&mut self, coords: &ManOriCoordinates) {
        self.parameters
            .insert(MAN_ORI_COORDINATES.into(), coords.to_value());
    }

    /// Current plugin registry; the default-only one when absent or unreadable.
    pub fn plugin_registry(&self) -> PluginRegistry {
        self.parameters
            .get(PLUGINS)
            .and_then(|value| PluginRegistry::from_value(value).ok())
            .unwrap_or_default()
    }

    pub fn set_plugin_registry(&mut self, registry: &PluginRegistry) {
        self.parameters.insert(PLUGINS.into(), registry.to_value());
    }

    /// Rebuild the plugin registry from the plugin directories and
    /// `.py`/`.so`/`.dll` files under `dir`. `default` is selected for both roles.
    pub fn scan_plugins(&mut self, dir: impl AsRef<Path>) -> PluginRegistry {
        let registry = PluginRegistry::scan(dir.as_ref());
        log::info!(
            "found {} sequence and {} tracking plugin(s) in {}",
            registry.available_sequence.len().saturating_sub(1),
            registry.available_tracking.len().saturating_sub(1),
            dir.as_ref().display()
        );
        self.set_plugin_registry(&registry);
        registry
    }

    /// Re-run plugin discovery for a parameter directory, the way
    /// [`from_directory`](Self::from_directory) does.
    pub fn discover_plugins(&mut self, par_dir: impl AsRef<Path>) -> PluginRegistry {
        let registry = discover_plugins(par_dir.as_ref()).drain_into(&mut self.diagnostics);
        self.set_plugin_registry(&registry);
        registry
    }

    /// Warn about image and calibration files named in `ptv` that do not
    /// exist under `root`.
    pub fn check_referenced_files(
        &self,
        root: impl AsRef<Path>,
    ) -> Result<Vec<Diagnostic>, ParamsError> {
        Ok(self.section::<PtvParams>()?.check_files(root.as_ref()))
    }

    /// Typed sections for the native builder. `ptv`, `cal_ori` and
    /// `sequence` must exist.
    pub fn native_sections(&self) -> Result<NativeSections, ParamsError> {
        Ok(NativeSections {
            ptv: self.section()?,
            cal_ori: self.section()?,
            sequence: self.section()?,
            criteria: self.optional_section()?,
            track: self.optional_section()?,
            targ_rec: self.optional_section()?,
        })
    }

    /// Build the native engine configuration, loading calibrations relative
    /// to `root` (the experiment directory).
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(num_cams = self.num_cams))
    )]
    pub fn native_config(
        &self,
        root: impl AsRef<Path>,
    ) -> Result<Loaded<NativeConfig>, ParamsError> {
        let sections = self.native_sections()?;
        Ok(NativeConfig::build(&sections, self.num_cams, root.as_ref())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ptv_params_legacy::{SequenceParams, TargRecParams};

    fn two_camera_manager() -> ParameterManager {
        let mut mgr = ParameterManager::new();
        mgr.set_section(&PtvParams::with_cameras(Some(2))).unwrap();
        mgr.set_section(&TargRecParams {
            gvthres: vec![30, 40],
            ..TargRecParams::default()
        })
        .unwrap();
        mgr.set_n_cam(2).unwrap();
        mgr
    }

    #[test]
    fn new_manager_has_only_defaults() {
        let mgr = ParameterManager::new();
        assert_eq!(mgr.get_n_cam(), 0);
        assert!(mgr.has_section(PLUGINS));
        assert!(mgr.plugin_registry().is_default_only());
        assert_eq!(mgr.unsharp_mask().unwrap(), UnsharpMaskParams::default());
        assert!(matches!(
            mgr.get_parameter("ptv"),
            Err(ParamsError::MissingSection(name)) if name == "ptv"
        ));
    }

    #[test]
    fn set_n_cam_fits_camera_lists() {
        let mut mgr = two_camera_manager();
        mgr.set_n_cam(3).unwrap();
        let ptv: PtvParams = mgr.section().unwrap();
        assert_eq!(ptv.img_name.len(), 3);
        let targ: TargRecParams = mgr.section().unwrap();
        assert_eq!(targ.gvthres, [30, 40, 40]);
    }

    #[test]
    fn set_n_cam_resizes_man_ori_coordinates() {
        let mut mgr = two_camera_manager();
        mgr.set_man_ori_coordinates(&ManOriCoordinates::new(2));
        mgr.set_n_cam(1).unwrap();
        assert_eq!(mgr.man_ori_coordinates().unwrap().n_cam(), 1);
    }

    #[test]
    fn set_n_cam_to_zero_empties_camera_lists() {
        let mut mgr = two_camera_manager();
        mgr.set_parameter(
            "sequence",
            serde_yaml::from_str("base_name: [a, b]\nfirst: 1\nlast: 2\n").unwrap(),
        )
        .unwrap();
        mgr.set_n_cam(0).unwrap();
        assert_eq!(mgr.get_n_cam(), 0);
        assert!(mgr.section::<PtvParams>().unwrap().img_name.is_empty());
        assert!(mgr.section::<SequenceParams>().unwrap().base_name.is_empty());
        assert!(mgr.section::<TargRecParams>().unwrap().gvthres.is_empty());
    }

    #[test]
    fn failed_set_n_cam_changes_nothing() {
        let mut mgr = ParameterManager::new();
        mgr.set_parameter(
            "sequence",
            serde_yaml::from_str("base_name: [a, b]\nfirst: 1\nlast: 2\n").unwrap(),
        )
        .unwrap();
        mgr.set_parameter(
            "ptv",
            serde_yaml::from_str("img_name: [a, b]\nimx: wide\n").unwrap(),
        )
        .unwrap();
        let before = mgr.parameters().clone();

        assert!(matches!(mgr.set_n_cam(3), Err(ParamsError::Section(_))));
        assert_eq!(mgr.get_n_cam(), 0);
        assert_eq!(mgr.parameters(), &before);
        assert_eq!(
            mgr.get_parameter("sequence").unwrap()["base_name"]
                .as_sequence()
                .unwrap()
                .len(),
            2
        );

        assert!(matches!(
            mgr.set_n_cam(MAX_DECLARED_COUNT + 1),
            Err(ParamsError::TooManyCameras(_))
        ));
    }

    #[test]
    fn set_parameter_drops_camera_counts() {
        let mut mgr = ParameterManager::new();
        let value: Value =
            serde_yaml::from_str("base_name: [a]\nfirst: 1\nlast: 2\nn_img: 1\n").unwrap();
        mgr.set_parameter("sequence", value).unwrap();
        assert!(mgr.get_parameter("sequence").unwrap().get("n_img").is_none());
        assert_eq!(mgr.section::<SequenceParams>().unwrap().frame_count(), 2);

        mgr.set_parameter(NUM_CAMS, Value::from(1u64)).unwrap();
        assert_eq!(mgr.get_n_cam(), 1);
        assert!(!mgr.has_section(NUM_CAMS));
    }

    #[test]
    fn save_needs_a_known_path() {
        let mut mgr = ParameterManager::new();
        assert!(matches!(mgr.save_parameters(), Err(ParamsError::NoYamlPath)));

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("p.yaml");
        mgr.to_yaml(&path).unwrap();
        assert_eq!(mgr.yaml_path(), Some(path.as_path()));
        mgr.save_parameters().unwrap();
    }

    #[test]
    fn native_config_needs_required_sections() {
        let mgr = two_camera_manager();
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            mgr.native_config(tmp.path()),
            Err(ParamsError::MissingSection(name)) if name == "cal_ori"
        ));
    }
}
