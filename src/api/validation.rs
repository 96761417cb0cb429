use super::ApiError;
use crate::domain::WatchStatus;

/// Rejects a missing or blank id with `message`.
pub fn require_id(id: Option<&str>, message: &str) -> Result<String, ApiError> {
    match id.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(ApiError::validation(message)),
    }
}

pub fn parse_status(raw: &str) -> Result<WatchStatus, ApiError> {
    raw.trim()
        .parse()
        .map_err(|e: crate::domain::InvalidStatus| ApiError::validation(e.to_string()))
}

/// Status query parameter of `getAnimeByStatus`; it must be present.
pub fn require_status(raw: Option<&str>) -> Result<WatchStatus, ApiError> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => parse_status(raw),
        _ => Err(ApiError::validation("Status parameter is required")),
    }
}

/// Status field of a create or update body; absent means "not given".
pub fn optional_status(raw: Option<&str>) -> Result<Option<WatchStatus>, ApiError> {
    raw.map(parse_status).transpose()
}

pub fn validate_search_query(query: Option<&str>) -> Result<&str, ApiError> {
    let trimmed = query.unwrap_or_default().trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Search query is required"));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_id() {
        assert_eq!(require_id(Some("abc"), "id").unwrap(), "abc");
        assert_eq!(require_id(Some(" abc "), "id").unwrap(), "abc");
        assert!(require_id(Some(""), "id").is_err());
        assert!(require_id(Some("   "), "id").is_err());
        assert!(require_id(None, "id").is_err());
    }

    #[test]
    fn test_require_status() {
        assert_eq!(require_status(Some("watching")).unwrap(), WatchStatus::Watching);
        assert_eq!(require_status(Some("plan")).unwrap(), WatchStatus::Plan);
        assert!(require_status(Some("paused")).is_err());
        assert!(require_status(Some("WATCHING")).is_err());
        assert!(require_status(Some("")).is_err());
        assert!(require_status(None).is_err());
    }

    #[test]
    fn test_optional_status() {
        assert_eq!(optional_status(None).unwrap(), None);
        assert_eq!(
            optional_status(Some("dropped")).unwrap(),
            Some(WatchStatus::Dropped)
        );
        assert!(optional_status(Some("bogus")).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query(Some("  Steins Gate ")).unwrap(), "Steins Gate");
        assert!(validate_search_query(Some("")).is_err());
        assert!(validate_search_query(Some("   ")).is_err());
        assert!(validate_search_query(None).is_err());
    }
}
