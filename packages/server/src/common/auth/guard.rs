use super::GuardError;

/// Check the preconditions of a mutating operation.
///
/// Order matters: an anonymous viewer is rejected with `Forbidden` before any
/// identifier is looked at, then each `(field, value)` pair must be non-empty.
/// Returns the viewer identity so callers can pass it on to storage.
pub fn authorize<'a>(
    viewer: Option<&'a str>,
    required: &[(&str, &str)],
) -> Result<&'a str, GuardError> {
    let viewer = match viewer {
        Some(v) if !v.is_empty() => v,
        _ => return Err(GuardError::Forbidden),
    };

    if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
        return Err(GuardError::required(field));
    }

    Ok(viewer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_and_id_present() {
        assert_eq!(authorize(Some("u1"), &[("id", "p1")]), Ok("u1"));
    }

    #[test]
    fn test_anonymous_viewer_is_forbidden() {
        assert_eq!(authorize(None, &[("id", "p1")]), Err(GuardError::Forbidden));
    }

    #[test]
    fn test_empty_viewer_is_forbidden() {
        assert_eq!(authorize(Some(""), &[("id", "p1")]), Err(GuardError::Forbidden));
    }

    #[test]
    fn test_empty_id_is_invalid() {
        assert_eq!(
            authorize(Some("u1"), &[("id", "")]),
            Err(GuardError::Validation("id is required".to_string()))
        );
    }

    #[test]
    fn test_viewer_checked_before_ids() {
        // Both are missing: authorization wins
        assert_eq!(authorize(None, &[("id", "")]), Err(GuardError::Forbidden));
    }

    #[test]
    fn test_no_identifiers_needed() {
        assert_eq!(authorize(Some("u1"), &[]), Ok("u1"));
    }

    #[test]
    fn test_first_missing_field_is_reported() {
        assert_eq!(
            authorize(Some("u1"), &[("id", "p1"), ("parentId", ""), ("other", "")]),
            Err(GuardError::Validation("parentId is required".to_string()))
        );
    }
}
