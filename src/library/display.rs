use std::borrow::Cow;

/// Decode a raw track filename for display (`My%20Song.mp3` -> `My Song.mp3`).
///
/// Invalid escapes fall back to replacing `%20` only, leaving the rest as-is.
pub fn display_name(filename: &str) -> String {
    match urlencoding::decode(filename) {
        Ok(Cow::Borrowed(s)) => s.to_string(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => filename.replace("%20", " "),
    }
}
