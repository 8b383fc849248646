//! Dtype string classification

/// Substrings that mark a dtype label as numeric
const NUMERIC_MARKERS: [&str; 3] = ["int", "float", "number"];

/// Decide whether a dtype label denotes a numeric column.
///
/// The label is lower-cased and checked for `"int"`, `"float"` or `"number"`.
/// No other inference is attempted: `"Int64"` and `"float32"` are numeric,
/// `"object"`, `"category"` and `"bool"` are not. Note that the check is a
/// plain substring test, so a label such as `"interval"` also counts.
pub fn is_numeric_dtype(dtype: &str) -> bool {
    let lowered = dtype.to_lowercase();
    NUMERIC_MARKERS.iter().any(|marker| lowered.contains(marker))
}
