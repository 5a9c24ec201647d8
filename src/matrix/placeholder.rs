use serde_json::Value;

/// Token replaced by the branch name in every string value of the document.
pub const BRANCH_PLACEHOLDER: &str = "BRANCH_PLACEHOLDER";

/// Returns a copy of `value` with every [`BRANCH_PLACEHOLDER`] in its string
/// values replaced by `branch`.
///
/// Mapping keys and non-string scalars are left as they are. The replacement
/// is a single pass, so a `branch` containing the token is not expanded again.
pub fn substitute_branch(value: &Value, branch: &str) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), substitute_branch(value, branch)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| substitute_branch(item, branch))
                .collect(),
        ),
        Value::String(text) => Value::String(text.replace(BRANCH_PLACEHOLDER, branch)),
        other => other.clone(),
    }
}
