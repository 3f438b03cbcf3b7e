use serde_json::{Map, Value};

/// Layer caller overrides on top of a default actor input.
///
/// Objects present on both sides merge one level deep; every other value,
/// arrays included, is replaced outright. Deeper objects are replaced rather
/// than merged, so callers can swap out a nested structure wholesale.
pub fn merge(
    base: &Map<String, Value>,
    overrides: Option<&Map<String, Value>>,
) -> Map<String, Value> {
    let mut merged = base.clone();
    let Some(overrides) = overrides else {
        return merged;
    };

    for (key, value) in overrides {
        if let (Some(Value::Object(existing)), Value::Object(incoming)) =
            (merged.get_mut(key), value)
        {
            for (inner_key, inner_value) in incoming {
                existing.insert(inner_key.clone(), inner_value.clone());
            }
            continue;
        }
        merged.insert(key.clone(), value.clone());
    }

    merged
}
