//! The unified YAML document.
//!
//! ```yaml
//! num_cams: 4
//! plugins: { ... }
//! ptv: { ... }
//! cal_ori: { ... }
//! # remaining sections in insertion order
//! ```

use ptv_params_core::{Diagnostic, DiagnosticKind, Loaded, MAX_DECLARED_COUNT};
use ptv_params_legacy::{
    CalOriParams, LegacyRecord, ManOriCoordinates, PluginRegistry, PtvParams, SectionKind,
};
use serde_yaml::{Mapping, Value};

use crate::defaults::{
    inject_defaults, strip_keys, CAMERA_COUNT_KEYS, MAN_ORI_COORDINATES, NUM_CAMS, PATH_KEYS,
    PLUGINS,
};
use crate::directory::DirectoryContents;
use crate::ParamsError;

fn ensure_flag(section: &mut Value, key: &str) {
    if let Some(map) = section.as_mapping_mut() {
        if !map.contains_key(key) {
            map.insert(key.into(), Value::Bool(false));
        }
    }
}

/// Render the document for `num_cams` cameras.
pub(crate) fn render_document(num_cams: usize, params: &Mapping) -> Result<String, ParamsError> {
    let mut doc = Mapping::new();
    doc.insert(NUM_CAMS.into(), num_cams.into());
    let plugins = params
        .get(PLUGINS)
        .cloned()
        .unwrap_or_else(|| PluginRegistry::default().to_value());
    doc.insert(PLUGINS.into(), plugins);

    for (key, section) in params {
        if key.as_str() == Some(PLUGINS) {
            continue;
        }
        let mut section = section.clone();
        strip_keys(&mut section, &PATH_KEYS);
        if key.as_str() == Some(PtvParams::SECTION) {
            ensure_flag(&mut section, "splitter");
        } else if key.as_str() == Some(CalOriParams::SECTION) {
            ensure_flag(&mut section, "cal_splitter");
        }
        doc.insert(key.clone(), section);
    }
    Ok(serde_yaml::to_string(&doc)?)
}

/// Camera count of documents written before `num_cams` existed.
fn legacy_camera_count(params: &Mapping) -> Option<usize> {
    let ptv = params.get(PtvParams::SECTION)?;
    let n = match ptv.get("n_img").and_then(Value::as_u64) {
        Some(n) => n,
        None => ptv.get("img_name")?.as_sequence()?.len() as u64,
    };
    usize::try_from(n).ok()
}

/// Parse a document into the camera count and the section mapping.
///
/// Per-camera list lengths are checked against `num_cams` and reported as
/// warnings; they are not resized.
pub(crate) fn parse_document(
    text: &str,
    source: &str,
) -> Result<Loaded<DirectoryContents>, ParamsError> {
    let Value::Mapping(mut params) = serde_yaml::from_str::<Value>(text)? else {
        return Err(ParamsError::InvalidDocument(format!(
            "{source}: top level is not a mapping"
        )));
    };
    let mut warnings = Vec::new();

    let num_cams = match params.shift_remove(NUM_CAMS) {
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                ParamsError::InvalidDocument(format!(
                    "{source}: `num_cams` must be a non-negative integer"
                ))
            })?,
        None => match legacy_camera_count(&params) {
            Some(n) => {
                log::info!("{source}: no `num_cams`, using {n} from the ptv section");
                n
            }
            None => {
                warnings.push(Diagnostic::warn(
                    DiagnosticKind::CameraCount,
                    source,
                    "no `num_cams` and no ptv section; camera count set to 0",
                ));
                0
            }
        },
    };
    if num_cams > MAX_DECLARED_COUNT {
        return Err(ParamsError::TooManyCameras(num_cams));
    }

    for (key, section) in params.iter_mut() {
        strip_keys(section, &CAMERA_COUNT_KEYS);
        let Some(key) = key.as_str() else {
            continue;
        };
        if let Some(kind) = SectionKind::from_section(key) {
            if num_cams > 0 {
                warnings.extend(kind.check_camera_lists(section, num_cams));
            }
        } else if key == MAN_ORI_COORDINATES {
            let found = ManOriCoordinates::camera_entries(section);
            if found != num_cams {
                warnings.push(Diagnostic::warn(
                    DiagnosticKind::CameraCount,
                    MAN_ORI_COORDINATES,
                    format!("{found} camera entries, expected {num_cams}"),
                ));
            }
        } else if key == PLUGINS {
            match PluginRegistry::from_value(section) {
                Ok(registry) => *section = registry.to_value(),
                Err(err) => warnings.push(Diagnostic::warn(
                    DiagnosticKind::Malformed,
                    PLUGINS,
                    err.to_string(),
                )),
            }
        }
    }

    inject_defaults(&mut params);
    Ok(Loaded::with_warnings((num_cams, params), warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
num_cams: 2
ptv:
  n_img: 2
  img_name: [img/cam1.10000, img/cam2.10000]
  img_cal: [cal/cam1.tif, cal/cam2.tif]
  imx: 1280
cal_ori:
  img_cal_name: [cal/cam1.tif]
  default_path: /tmp/old
";

    #[test]
    fn parse_strips_counts_and_reports_short_lists() {
        let loaded = parse_document(DOC, "doc.yaml").unwrap();
        let (num_cams, params) = &loaded.value;
        assert_eq!(*num_cams, 2);
        assert!(params["ptv"].get("n_img").is_none());
        assert_eq!(params["cal_ori"]["img_cal_name"].as_sequence().unwrap().len(), 1);
        assert_eq!(loaded.warnings.len(), 1);
        assert_eq!(loaded.warnings[0].kind, DiagnosticKind::CameraCount);
    }

    #[test]
    fn render_orders_keys_and_strips_paths() {
        let (num_cams, params) = parse_document(DOC, "doc.yaml").unwrap().value;
        let text = render_document(num_cams, &params).unwrap();
        assert!(text.starts_with("num_cams: 2\nplugins:\n"));
        assert!(!text.contains("default_path"));
        assert!(text.contains("splitter: false"));
        assert!(text.contains("cal_splitter: false"));

        let again = parse_document(&text, "doc.yaml").unwrap().value;
        assert_eq!(render_document(again.0, &again.1).unwrap(), text);
    }

    #[test]
    fn old_documents_take_the_count_from_ptv() {
        let loaded = parse_document("ptv:\n  n_img: 3\n", "old.yaml").unwrap();
        assert_eq!(loaded.value.0, 3);
        assert!(loaded.value.1["ptv"].get("n_img").is_none());
    }

    #[test]
    fn non_mapping_document_is_rejected() {
        assert!(matches!(
            parse_document("- 1\n- 2\n", "list.yaml"),
            Err(ParamsError::InvalidDocument(_))
        ));
        assert!(matches!(
            parse_document("num_cams: -1\n", "neg.yaml"),
            Err(ParamsError::InvalidDocument(_))
        ));
        assert!(matches!(
            parse_document("num_cams: 2147483647\n", "huge.yaml"),
            Err(ParamsError::TooManyCameras(2147483647))
        ));
    }
}
