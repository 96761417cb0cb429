//! Input sanitization applied at the service boundary before anything is
//! persisted. Markup-significant characters (`& < > " '`) are escaped.

/// Escapes markup without trimming. Used for free text (notes, descriptions).
#[must_use]
pub fn escape_text(raw: &str) -> String {
    html_escape::encode_quoted_attribute(raw).into_owned()
}

/// Escapes and trims a short label such as a title, name or genre.
#[must_use]
pub fn sanitize_label(raw: &str) -> String {
    escape_text(raw).trim().to_string()
}

/// Like [`sanitize_label`] but yields `None` when nothing is left.
#[must_use]
pub fn non_empty_label(raw: &str) -> Option<String> {
    let label = sanitize_label(raw);
    (!label.is_empty()).then_some(label)
}

/// Sanitizes each genre, dropping the ones that end up empty. Order is kept.
#[must_use]
pub fn sanitize_genres<I, S>(genres: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    genres
        .into_iter()
        .filter_map(|g| non_empty_label(g.as_ref()))
        .collect()
}
