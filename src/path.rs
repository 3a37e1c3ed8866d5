use serde_json::Value;

use crate::JsonMap;

/// Substitutes every `:key` token in `template` with `params[key]`.
///
/// Keys are runs of ASCII alphanumerics and `_`. Tokens without a matching
/// param, and a `:` not followed by a key, are kept verbatim.
///
/// Example: `"pages/:pageId"` with `{"pageId": "abc"}` → `"pages/abc"`
pub fn fill_path(template: &str, params: &JsonMap) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(colon) = rest.find(':') {
        filled.push_str(&rest[..colon]);
        let after = &rest[colon + 1..];
        let key_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let key = &after[..key_len];

        match params.get(key) {
            Some(value) if !key.is_empty() => filled.push_str(&stringify(value)),
            _ => {
                filled.push(':');
                filled.push_str(key);
            }
        }
        rest = &after[key_len..];
    }

    filled.push_str(rest);
    filled
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
