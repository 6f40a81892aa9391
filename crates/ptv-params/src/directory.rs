//! Legacy parameter directories: `*.par` files plus `man_ori.dat` and
//! `plugins.json`.

use std::fs;
use std::io;
use std::path::Path;

use ptv_params_core::{Diagnostic, DiagnosticKind, Loaded};
use ptv_params_legacy::{
    LegacyRecord, ManOriCoordinates, PluginRegistry, PtvParams, SectionKind, MAN_ORI_DAT,
};
use serde_yaml::Mapping;

use crate::defaults::{
    inject_defaults, strip_keys, CAMERA_COUNT_KEYS, MAN_ORI_COORDINATES, PLUGINS,
};
use crate::ParamsError;

/// Camera count and section mapping read from a directory.
pub(crate) type DirectoryContents = (usize, Mapping);

/// Plugin registry for a parameter directory, first match wins:
/// `plugins.json`, a `plugins/` directory inside it, a `plugins/`
/// directory next to it, the default-only registry.
pub(crate) fn discover_plugins(dir: &Path) -> Loaded<PluginRegistry> {
    if let Some(side) = PluginRegistry::read_side_file(dir) {
        return side;
    }
    let candidates = [
        Some(dir.join("plugins")),
        dir.parent().map(|parent| parent.join("plugins")),
    ];
    for candidate in candidates.into_iter().flatten() {
        if let Some(registry) = PluginRegistry::from_script_dir(&candidate) {
            log::debug!("plugins discovered in {}", candidate.display());
            return Loaded::clean(registry);
        }
    }
    Loaded::clean(PluginRegistry::default())
}

pub(crate) fn load_directory(dir: &Path) -> Result<Loaded<DirectoryContents>, ParamsError> {
    if !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("parameter directory {} does not exist", dir.display()),
        )
        .into());
    }

    let mut warnings = Vec::new();
    let mut params = Mapping::new();

    // `None` only when there is no ptv.par to declare a count.
    let n_cam = if dir.join(PtvParams::FILENAME).is_file() {
        let ptv = PtvParams::read(dir, None).drain_into(&mut warnings);
        let n = ptv.camera_count();
        params.insert(PtvParams::SECTION.into(), ptv.to_section()?);
        Some(n)
    } else {
        warnings.push(Diagnostic::warn(
            DiagnosticKind::MissingFile,
            dir.join(PtvParams::FILENAME).display().to_string(),
            "not found; camera count set to 0",
        ));
        None
    };
    let num_cams = n_cam.unwrap_or(0);

    for kind in SectionKind::ALL {
        if kind == SectionKind::Ptv || !dir.join(kind.filename()).is_file() {
            continue;
        }
        let mut section = kind.read(dir, n_cam)?.drain_into(&mut warnings);
        strip_keys(&mut section, &CAMERA_COUNT_KEYS);
        params.insert(kind.section().into(), section);
    }

    let dat = dir.join(MAN_ORI_DAT);
    if dat.is_file() {
        let coords = ManOriCoordinates::read_dat(&dat, num_cams).drain_into(&mut warnings);
        params.insert(MAN_ORI_COORDINATES.into(), coords.to_value());
    }

    let plugins = discover_plugins(dir).drain_into(&mut warnings);
    params.insert(PLUGINS.into(), plugins.to_value());
    inject_defaults(&mut params);

    log::info!(
        "loaded {} section(s) for {num_cams} camera(s) from {}",
        params.len(),
        dir.display()
    );
    Ok(Loaded::with_warnings((num_cams, params), warnings))
}

/// Write every recognised section of `params` into `dir`.
///
/// Without a `ptv` section and with no cameras the count is unknown, and
/// sections keep the list sizes they were read with.
///
/// `Ok(false)` means at least one file could not be written; each failure
/// has already been logged.
pub(crate) fn write_directory(
    dir: &Path,
    num_cams: usize,
    params: &Mapping,
) -> Result<bool, ParamsError> {
    fs::create_dir_all(dir)?;
    let n_cam = (num_cams > 0 || params.contains_key(PtvParams::SECTION)).then_some(num_cams);
    let mut all_written = true;

    for (key, value) in params {
        let Some(key) = key.as_str() else {
            continue;
        };
        if let Some(kind) = SectionKind::from_section(key) {
            all_written &= kind.write(value, dir, n_cam)?;
            continue;
        }
        match key {
            MAN_ORI_COORDINATES => {
                let coords = ManOriCoordinates::from_value(value, num_cams).value;
                all_written &= coords.write_dat(&dir.join(MAN_ORI_DAT));
            }
            PLUGINS => {
                let registry = PluginRegistry::from_value(value)?;
                if !registry.is_default_only() {
                    all_written &= registry.write_side_file(dir);
                }
            }
            _ => log::debug!("`{key}` has no legacy file; skipped"),
        }
    }
    Ok(all_written)
}
