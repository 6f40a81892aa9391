//! Reserved keys and the default sub-sections injected when absent.

use ptv_params_legacy::PluginRegistry;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

pub const NUM_CAMS: &str = "num_cams";
pub const PLUGINS: &str = "plugins";
pub const MASKING: &str = "masking";
pub const UNSHARP_MASK: &str = "unsharp_mask";
pub const MAN_ORI_COORDINATES: &str = "man_ori_coordinates";

/// Per-section camera counts that must never survive next to `num_cams`.
pub(crate) const CAMERA_COUNT_KEYS: [&str; 2] = ["n_img", NUM_CAMS];
/// Bookkeeping keys dropped from every section on export.
pub(crate) const PATH_KEYS: [&str; 2] = ["default_path", "filename"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskingParams {
    pub mask_flag: bool,
    pub mask_base_name: String,
}

impl Default for MaskingParams {
    fn default() -> Self {
        Self {
            mask_flag: false,
            mask_base_name: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnsharpMaskParams {
    pub flag: bool,
    pub size: i32,
    pub strength: f64,
}

impl Default for UnsharpMaskParams {
    fn default() -> Self {
        Self {
            flag: false,
            size: 3,
            strength: 1.0,
        }
    }
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_yaml::to_value(value).unwrap_or(Value::Null)
}

/// Add `defaults` entries that `target` lacks. Existing values are never
/// replaced; a non-mapping `target` is left alone.
fn merge_missing(target: &mut Value, defaults: Value) {
    let (Some(target), Value::Mapping(defaults)) = (target.as_mapping_mut(), defaults) else {
        return;
    };
    for (key, value) in defaults {
        if !target.contains_key(&key) {
            target.insert(key, value);
        }
    }
}

/// Synthesize `plugins`, `masking` and `unsharp_mask` where absent, and
/// complete them key by key where present.
pub(crate) fn inject_defaults(params: &mut Mapping) {
    let defaults = [
        (PLUGINS, to_value(&PluginRegistry::default())),
        (MASKING, to_value(&MaskingParams::default())),
        (UNSHARP_MASK, to_value(&UnsharpMaskParams::default())),
    ];
    for (key, value) in defaults {
        match params.get_mut(key) {
            Some(existing) => merge_missing(existing, value),
            None => {
                log::debug!("injecting default `{key}` section");
                params.insert(key.into(), value);
            }
        }
    }
}

/// Remove the given keys from a section mapping, keeping the order of the rest.
pub(crate) fn strip_keys(section: &mut Value, keys: &[&str]) {
    if let Some(map) = section.as_mapping_mut() {
        for key in keys {
            map.shift_remove(*key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injection_never_overwrites() {
        let mut params: Mapping =
            serde_yaml::from_str("masking:\n  mask_flag: true\nptv:\n  imx: 1\n").unwrap();
        inject_defaults(&mut params);

        assert_eq!(params[MASKING]["mask_flag"].as_bool(), Some(true));
        assert_eq!(params[MASKING]["mask_base_name"].as_str(), Some(""));
        assert_eq!(params[UNSHARP_MASK]["size"].as_i64(), Some(3));
        assert_eq!(params[PLUGINS]["selected_tracking"].as_str(), Some("default"));
        assert_eq!(params["ptv"]["imx"].as_i64(), Some(1));
    }

    #[test]
    fn injection_is_idempotent() {
        let mut once = Mapping::new();
        inject_defaults(&mut once);
        let mut twice = once.clone();
        inject_defaults(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn strip_keeps_order() {
        let mut section: Value =
            serde_yaml::from_str("a: 1\nn_img: 4\nb: 2\nnum_cams: 4\nc: 3\n").unwrap();
        strip_keys(&mut section, &CAMERA_COUNT_KEYS);
        let keys: Vec<_> = section
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }
}
