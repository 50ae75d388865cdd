//! Active filter predicates.
//!
//! Every active filter must accept an item (AND). The filter id names the
//! item field the predicate reads.

use serde_json::Value;

use discovery_core::types::{ActiveFilterValue, ActiveFilters, DataItem};

pub fn matches_filters(item: &DataItem, active: &ActiveFilters) -> bool {
    active.iter().all(|(id, value)| matches_filter(item, id, value))
}

pub fn matches_filter(item: &DataItem, id: &str, value: &ActiveFilterValue) -> bool {
    let field = item.get(id);
    match value {
        // An unchecked box does not constrain anything.
        ActiveFilterValue::Checkbox(false) => true,
        ActiveFilterValue::Checkbox(true) => matches!(field, Some(Value::Bool(true))),
        ActiveFilterValue::MultiSelect(selected) if selected.is_empty() => true,
        ActiveFilterValue::MultiSelect(selected) => match field {
            Some(Value::Array(values)) => values
                .iter()
                .any(|v| scalar_text(v).is_some_and(|s| selected.contains(&s))),
            Some(Value::String(s)) => selected.iter().any(|sel| s.contains(sel.as_str())),
            Some(other) => scalar_text(other).is_some_and(|s| selected.contains(&s)),
            None => false,
        },
        ActiveFilterValue::Range { min, max } => field
            .and_then(Value::as_f64)
            .is_some_and(|n| *min <= n && n <= *max),
        ActiveFilterValue::Other(_) => true,
    }
}

/// Selections are compared as text, so `2024` and `"2024"` are the same value.
fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Keep only the items accepted by every active filter, preserving order.
pub fn apply_filters(items: &[DataItem], active: &ActiveFilters) -> Vec<DataItem> {
    if active.is_empty() {
        return items.to_vec();
    }
    items.iter().filter(|item| matches_filters(item, active)).cloned().collect()
}
