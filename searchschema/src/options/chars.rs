use super::OptionValue;

/// Explodes separator declarations into single characters.
///
/// `"@#"` becomes `["@", "#"]`, `["@#", "%"]` becomes `["@", "#", "%"]`.
/// Booleans inside a list are kept as one entry with their literal text.
/// Returns `None` for top-level booleans and callbacks.
pub fn chars_to_array(input: &OptionValue) -> Option<Vec<String>> {
    match input {
        OptionValue::Str(s) => Some(split_chars(s)),
        OptionValue::List(items) => {
            let mut out = Vec::new();
            for item in items {
                match item {
                    OptionValue::Bool(b) => out.push(b.to_string()),
                    other => out.extend(chars_to_array(other)?),
                }
            }
            Some(out)
        }
        OptionValue::Bool(_) | OptionValue::ValueFrom(_) | OptionValue::Transform(_) => None,
    }
}

/// Splits a string into its Unicode scalar values.
pub fn split_chars(s: &str) -> Vec<String> {
    s.chars().map(String::from).collect()
}
