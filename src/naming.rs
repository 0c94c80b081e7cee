//! Tag name to identifier conversion
//!
//! Names are split on `_` and each segment gets its first character
//! upper-cased. Nothing else is touched: hyphens, namespace prefixes and
//! non-ASCII characters pass through as-is.

/// `user_profile` -> `UserProfile`
pub fn to_type_name(name: &str) -> String {
    name.split('_').map(capitalize).collect()
}

/// `user_id` -> `userId`
pub fn to_field_name(name: &str) -> String {
    let mut segments = name.split('_');
    let mut out = segments.next().map(decapitalize).unwrap_or_default();
    out.extend(segments.map(capitalize));
    out
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn decapitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
