use serde_json::Value;

/// Merges `overlay` on top of `base` and returns the result.
///
/// Objects are merged key by key and arrays element by element, recursing
/// into nested values. Any other combination is resolved in favour of
/// `overlay`. Neither input is modified.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    let mut merged = base.clone();
    merge_into(&mut merged, overlay.clone());
    merged
}

/// In-place variant of [`deep_merge`]: folds `overlay` into `target`.
pub fn merge_into(target: &mut Value, overlay: Value) {
    match (target, overlay) {
        (Value::Object(target_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match target_map.get_mut(&key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(target_items), Value::Array(overlay_items)) => {
            for (idx, value) in overlay_items.into_iter().enumerate() {
                match target_items.get_mut(idx) {
                    Some(existing) => merge_into(existing, value),
                    None => target_items.push(value),
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
