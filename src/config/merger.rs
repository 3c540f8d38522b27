//! Layering of YAML configuration values.
//!
//! Mappings merge key by key, recursively. Sequences and scalars in the
//! overlay replace the base value. A `null` in the overlay removes the key,
//! which restores the built-in default for that field.

use serde_yaml::Value;

/// Deep merge `overlay` onto `base`.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut result = base_map.clone();

            for (key, overlay_value) in overlay_map {
                if overlay_value.is_null() {
                    result.remove(key);
                } else if let Some(base_value) = base_map.get(key) {
                    result.insert(key.clone(), deep_merge(base_value, overlay_value));
                } else {
                    result.insert(key.clone(), overlay_value.clone());
                }
            }

            Value::Mapping(result)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Merge layers in order (later overrides earlier).
pub fn merge_configs(layers: &[Value]) -> Value {
    layers
        .iter()
        .fold(Value::Mapping(Default::default()), |acc, layer| {
            deep_merge(&acc, layer)
        })
}
