//! Filename policies for stored artifacts.
//!
//! Two distinct policies exist and are not interchangeable:
//! - [`sanitize_filename`] is used for abstract text files.
//! - [`sanitize_document_filename`] is used for downloaded paper documents.

use std::sync::LazyLock;

use regex::Regex;

/// Characters that are never allowed in a stored filename.
pub const RESERVED_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

static NON_DOCUMENT_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\-_. ]").expect("static regex"));

/// Replace every reserved character with `_`.
///
/// Total and deterministic; the output has the same number of characters as
/// the input.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Recover a title that was previously stored with `:` written as `_`.
pub fn normalize_title(title: &str) -> String {
    title.replace('_', ":")
}

/// Filename policy for paper documents.
///
/// The title is normalized first (`_` back to `:`), reserved characters are
/// replaced, and anything outside word characters, `-`, `_`, `.` and space is
/// dropped.
pub fn sanitize_document_filename(title: &str) -> String {
    let replaced = sanitize_filename(&normalize_title(title));
    NON_DOCUMENT_CHARS.replace_all(&replaced, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_chars_are_replaced() {
        let input = r#"a<b>c:d"e/f\g|h?i*j"#;
        let out = sanitize_filename(input);
        assert_eq!(out, "a_b_c_d_e_f_g_h_i_j");
        assert!(!out.contains(RESERVED_CHARS));
    }

    #[test]
    fn sanitize_preserves_length() {
        for input in ["", "plain title", "Ünïcödé: «quotes»?", "***", "x/y\\z"] {
            let out = sanitize_filename(input);
            assert_eq!(out.chars().count(), input.chars().count(), "input: {input}");
            assert!(!out.contains(RESERVED_CHARS));
        }
    }

    #[test]
    fn sanitize_leaves_safe_titles_alone() {
        let title = "Neural Radiance Fields for Everyone";
        assert_eq!(sanitize_filename(title), title);
    }

    #[test]
    fn normalize_title_restores_colons() {
        assert_eq!(normalize_title("DiffX_ A Study"), "DiffX: A Study");
    }

    #[test]
    fn document_filename_policy() {
        assert_eq!(
            sanitize_document_filename("DiffX_ Scaling (v2), Now!"),
            "DiffX_ Scaling v2 Now"
        );
        assert_eq!(sanitize_document_filename("Some_Title"), "Some_Title");
    }

    #[test]
    fn document_filename_never_contains_reserved() {
        let out = sanitize_document_filename(r#"What? A "Title" <with> / all | of * them\"#);
        assert!(!out.contains(RESERVED_CHARS));
        assert_eq!(out, "What_ A _Title_ _with_ _ all _ of _ them_");
    }
}
