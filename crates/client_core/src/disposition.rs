//! `Content-Disposition` filename extraction.

use std::sync::OnceLock;

use regex::Regex;

fn filename_regex() -> &'static Regex {
    static FILENAME_RE: OnceLock<Regex> = OnceLock::new();
    FILENAME_RE.get_or_init(|| {
        Regex::new(r#"(?i)filename=(?:"([^"]*)"|([^;]*))"#)
            .expect("valid content-disposition regex")
    })
}

/// Returns the first `filename=` value of a `Content-Disposition` header.
///
/// Quotes and trailing parameters are not part of the result, and any
/// directory components are dropped so the name is safe to join onto a
/// download directory. `None` means the caller should use its fallback name.
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    let captures = filename_regex().captures(header)?;
    let captured = captures
        .get(1)
        .or_else(|| captures.get(2))?
        .as_str()
        .trim()
        .trim_matches('"');
    let name = captured
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return None;
    }

    Some(name.to_string())
}
