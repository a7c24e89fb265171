//! Deep merge for layered configuration mappings.

use serde_json::{Map, Value};

/// Merge every layer left to right into a fresh mapping.
///
/// Later layers win at every depth where both define a key.
pub fn merge(configs: impl IntoIterator<Item = Map<String, Value>>) -> Map<String, Value> {
    configs.into_iter().fold(Map::new(), |mut merged, layer| {
        merge_into(&mut merged, layer);
        merged
    })
}

/// Merge an overlay mapping into the base, recursively overriding objects.
///
/// Values are moved out of the overlay so no two layers share storage.
pub fn merge_into(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match base.get_mut(&key) {
            Some(existing) => merge_values(existing, value),
            None => {
                base.insert(key, value);
            }
        }
    }
}

fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => merge_into(base_map, overlay_map),
        // Scalars, lists, nulls and mismatched kinds replace wholesale.
        (base_slot, overlay_value) => *base_slot = overlay_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn layer(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn merged(layers: Vec<Value>) -> Value {
        Value::Object(merge(layers.into_iter().map(layer)))
    }

    #[test]
    fn nested_objects_merge_and_scalars_override() {
        let result = merged(vec![
            json!({ "a": 1, "b": { "x": 1 } }),
            json!({ "b": { "y": 2 } }),
            json!({ "a": 2 }),
        ]);
        assert_eq!(result, json!({ "a": 2, "b": { "x": 1, "y": 2 } }));
    }

    #[test]
    fn lists_are_replaced_not_concatenated() {
        let result = merged(vec![json!({ "a": [1, 2] }), json!({ "a": [3] })]);
        assert_eq!(result, json!({ "a": [3] }));
    }

    #[test]
    fn null_overrides_earlier_value() {
        let result = merged(vec![
            json!({ "proxy": "http://proxy", "db": { "pool": 4 } }),
            json!({ "proxy": null, "db": { "pool": null } }),
        ]);
        assert_eq!(result, json!({ "proxy": null, "db": { "pool": null } }));
    }

    #[test]
    fn mismatched_kinds_take_the_later_value() {
        let result = merged(vec![
            json!({ "a": { "nested": true }, "b": 42 }),
            json!({ "a": 42, "b": { "nested": true } }),
        ]);
        assert_eq!(result, json!({ "a": 42, "b": { "nested": true } }));
    }

    #[test]
    fn deep_levels_merge_independently() {
        let result = merged(vec![
            json!({ "l1": { "l2": { "l3": { "a": 1, "b": 2 } }, "keep": true } }),
            json!({ "l1": { "l2": { "l3": { "b": 3, "c": 4 } } } }),
        ]);
        assert_eq!(
            result,
            json!({ "l1": { "l2": { "l3": { "a": 1, "b": 3, "c": 4 } }, "keep": true } })
        );
    }

    #[test]
    fn empty_input_yields_empty_mapping() {
        assert!(merge(Vec::new()).is_empty());
    }

    #[test]
    fn same_input_merges_identically() {
        let layers = vec![json!({ "a": { "b": [1] } }), json!({ "a": { "c": "x" } })];
        assert_eq!(merged(layers.clone()), merged(layers));
    }
}
