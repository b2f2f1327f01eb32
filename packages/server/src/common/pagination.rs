//! Offset-based pagination for feed queries.
//!
//! # Usage
//!
//! ```rust,ignore
//! // In a GraphQL resolver
//! let args = OffsetArgs { offset: Some(20), limit: Some(10) }.validate()?;
//!
//! // After storage returned the total count
//! let window = window(args.offset, args.limit, count);
//! ```

/// Default page size when the caller does not pass a limit.
pub const DEFAULT_LIMIT: i32 = 100;

/// Largest page a caller may request.
pub const MAX_LIMIT: i32 = 1000;

// ============================================================================
// Pagination Arguments
// ============================================================================

/// Raw offset/limit arguments as received from the API.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetArgs {
    pub offset: Option<i32>,
    pub limit: Option<i32>,
}

impl OffsetArgs {
    pub fn new(offset: i32, limit: i32) -> Self {
        OffsetArgs {
            offset: Some(offset),
            limit: Some(limit),
        }
    }

    /// Apply defaults (offset 0, limit 100) and enforce ranges.
    ///
    /// Out-of-range values are rejected rather than clamped.
    pub fn validate(&self) -> Result<ValidatedOffsetArgs, &'static str> {
        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err("offset must not be negative");
        }

        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err("limit must be between 1 and 1000");
        }

        Ok(ValidatedOffsetArgs { offset, limit })
    }
}

/// Offset/limit pair that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedOffsetArgs {
    pub offset: i32,
    pub limit: i32,
}

impl Default for ValidatedOffsetArgs {
    fn default() -> Self {
        ValidatedOffsetArgs {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

// ============================================================================
// Page window
// ============================================================================

/// Offsets of the neighbouring pages, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageWindow {
    pub next_offset: Option<i32>,
    pub previous_offset: Option<i32>,
}

/// Compute the next/previous page offsets for a page of `limit` items
/// starting at `offset` out of `total_count`.
///
/// An offset past the end is not clamped: the page is empty but the
/// previous offset is still derived from the raw offset.
pub fn window(offset: i32, limit: i32, total_count: i64) -> PageWindow {
    let end = offset.saturating_add(limit);

    let next_offset = (total_count > i64::from(end)).then_some(end);
    let previous_offset = (offset > 0).then(|| offset.saturating_sub(limit).max(0));

    PageWindow {
        next_offset,
        previous_offset,
    }
}
