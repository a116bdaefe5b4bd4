//! Pagination and site queries.

use portal_ident::SiteType;

use crate::error::ModelError;

/// Window over an ordered result list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    offset: u32,
    limit: u32,
}

impl Range {
    /// Window of at most `limit` items starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidRange`] if `limit` is zero.
    pub fn of(offset: u32, limit: u32) -> Result<Self, ModelError> {
        if limit == 0 {
            return Err(ModelError::InvalidRange { offset, limit });
        }
        Ok(Self { offset, limit })
    }

    /// First window of `limit` items.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidRange`] if `limit` is zero.
    pub fn first(limit: u32) -> Result<Self, ModelError> {
        Self::of(0, limit)
    }

    /// Index of the first item.
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Maximum number of items.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Zero-based page number containing the first item.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.offset / self.limit
    }

    /// Window immediately after this one.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            limit: self.limit,
        }
    }

    /// Window immediately before this one, clamped at offset 0; `None` at
    /// offset 0.
    #[must_use]
    pub fn previous(&self) -> Option<Self> {
        if self.offset == 0 {
            return None;
        }
        Some(Self {
            offset: self.offset.saturating_sub(self.limit),
            limit: self.limit,
        })
    }

    /// Slice of `items` covered by this window.
    #[must_use]
    pub fn apply<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.offset)
            .unwrap_or(usize::MAX)
            .min(items.len());
        let end = start
            .saturating_add(usize::try_from(self.limit).unwrap_or(usize::MAX))
            .min(items.len());
        &items[start..end]
    }
}

/// Filter for site listings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SiteQuery {
    /// Site types to include; empty includes all.
    pub site_types: Vec<SiteType>,
    /// Window over the sorted results; `None` returns everything.
    pub range: Option<Range>,
}

impl SiteQuery {
    /// Query matching every site.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to `site_type` (in addition to any already listed).
    #[must_use]
    pub fn with_site_type(mut self, site_type: SiteType) -> Self {
        if !self.site_types.contains(&site_type) {
            self.site_types.push(site_type);
        }
        self
    }

    /// Paginate results.
    #[must_use]
    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    /// True if sites of `site_type` pass the filter.
    #[must_use]
    pub fn matches(&self, site_type: SiteType) -> bool {
        self.site_types.is_empty() || self.site_types.contains(&site_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_limit_rejected() {
        assert!(matches!(
            Range::of(0, 0),
            Err(ModelError::InvalidRange { offset: 0, limit: 0 })
        ));
    }

    #[test]
    fn test_page_is_offset_divided_by_limit() {
        assert_eq!(Range::of(0, 10).unwrap().page(), 0);
        assert_eq!(Range::of(9, 10).unwrap().page(), 0);
        assert_eq!(Range::of(10, 10).unwrap().page(), 1);
        assert_eq!(Range::of(25, 10).unwrap().page(), 2);
        assert_eq!(Range::of(5, 1).unwrap().page(), 5);
    }

    #[test]
    fn test_next_and_previous() {
        let range = Range::first(10).unwrap();
        assert_eq!(range.previous(), None);
        let next = range.next();
        assert_eq!(next.offset(), 10);
        assert_eq!(next.previous(), Some(range));
        assert_eq!(Range::of(4, 10).unwrap().previous().unwrap().offset(), 0);
        assert_eq!(Range::of(u32::MAX, 10).unwrap().next().offset(), u32::MAX);
    }

    #[test]
    fn test_apply() {
        let items = [1, 2, 3, 4, 5];
        assert_eq!(Range::of(0, 2).unwrap().apply(&items), &[1, 2]);
        assert_eq!(Range::of(3, 5).unwrap().apply(&items), &[4, 5]);
        assert!(Range::of(7, 5).unwrap().apply(&items).is_empty());
    }

    #[test]
    fn test_site_query_matches() {
        let all = SiteQuery::new();
        assert!(SiteType::ALL.iter().all(|t| all.matches(*t)));

        let spaces = SiteQuery::new()
            .with_site_type(SiteType::Space)
            .with_site_type(SiteType::Space);
        assert_eq!(spaces.site_types, vec![SiteType::Space]);
        assert!(spaces.matches(SiteType::Space));
        assert!(!spaces.matches(SiteType::Site));
    }
}
