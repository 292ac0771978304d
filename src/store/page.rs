use thiserror::Error;

/// Rejections from paging and sort parameter resolution
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Unsupported sort field: {0}")]
    UnsupportedSortField(String),

    #[error("Unsupported sort direction: {0}")]
    UnsupportedSortDirection(String),
}

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Columns a listing may be ordered by. ORDER BY text is rendered from this
/// enum; client strings never reach the SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Amount,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Amount => "amount",
        }
    }

    fn parse(s: &str) -> Result<Self, PageError> {
        match s {
            "id" => Ok(SortField::Id),
            "amount" => Ok(SortField::Amount),
            other => Err(PageError::UnsupportedSortField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    fn parse(s: &str) -> Result<Self, PageError> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(PageError::UnsupportedSortDirection(s.to_string()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    /// Listings default to smallest amount first when the caller does not
    /// say otherwise.
    pub fn default_for_listing() -> Self {
        Sort {
            field: SortField::Amount,
            direction: SortDirection::Asc,
        }
    }

    /// Parse a `field` or `field,direction` sort parameter.
    pub fn parse(s: &str) -> Result<Self, PageError> {
        let (field, direction) = match s.split_once(',') {
            Some((f, d)) => (SortField::parse(f.trim())?, SortDirection::parse(d.trim())?),
            None => (SortField::parse(s.trim())?, SortDirection::Asc),
        };
        Ok(Sort { field, direction })
    }

    /// ORDER BY expression with an id tiebreak so the order is total and
    /// stable across pages.
    pub fn to_order_clause(&self) -> String {
        let dir = self.direction.to_sql();
        match self.field {
            SortField::Id => format!("id {}", dir),
            field => format!("{} {}, id {}", field.column(), dir, dir),
        }
    }
}

/// Resolved paging parameters for a listing request
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Sort,
}

impl PageRequest {
    /// Resolve raw query parameters: absent page is 0, absent or zero size
    /// falls back to the default, oversized requests are capped, and blank
    /// sort strings count as absent.
    pub fn resolve(
        page: Option<u32>,
        size: Option<u32>,
        sort: Option<&str>,
    ) -> Result<Self, PageError> {
        let page = page.unwrap_or(0);

        let size = match size {
            None | Some(0) => DEFAULT_PAGE_SIZE,
            Some(s) => s.min(MAX_PAGE_SIZE),
        };

        let sort = match sort.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => Sort::parse(s)?,
            None => Sort::default_for_listing(),
        };

        Ok(PageRequest { page, size, sort })
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_sorted_by_amount() {
        let page = PageRequest::resolve(None, None, None).expect("defaults should resolve");
        assert_eq!(page.page, 0);
        assert_eq!(page.size, DEFAULT_PAGE_SIZE);
        assert_eq!(page.sort.field, SortField::Amount);
        assert_eq!(page.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn zero_size_falls_back_to_default() {
        let page = PageRequest::resolve(Some(2), Some(0), None).expect("should resolve");
        assert_eq!(page.size, DEFAULT_PAGE_SIZE);
        assert_eq!(page.page, 2);
    }

    #[test]
    fn oversized_requests_are_capped() {
        let page = PageRequest::resolve(None, Some(5000), None).expect("should resolve");
        assert_eq!(page.size, MAX_PAGE_SIZE);
    }

    #[test]
    fn sort_parses_field_and_direction() {
        let sort = Sort::parse("amount,desc").expect("should parse");
        assert_eq!(sort.field, SortField::Amount);
        assert_eq!(sort.direction, SortDirection::Desc);

        // direction is optional and case-insensitive, whitespace tolerated
        let sort = Sort::parse("id").expect("should parse");
        assert_eq!(sort.direction, SortDirection::Asc);
        let sort = Sort::parse(" amount , DESC ").expect("should parse");
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[test]
    fn blank_sort_counts_as_absent() {
        let page = PageRequest::resolve(None, None, Some("  ")).expect("should resolve");
        assert_eq!(page.sort, Sort::default_for_listing());
    }

    #[test]
    fn unknown_sort_field_is_rejected() {
        let err = Sort::parse("amonut").expect_err("typo should be rejected");
        assert!(matches!(err, PageError::UnsupportedSortField(_)));
    }

    #[test]
    fn unknown_sort_direction_is_rejected() {
        let err = Sort::parse("amount,sideways").expect_err("should be rejected");
        assert!(matches!(err, PageError::UnsupportedSortDirection(_)));
    }

    #[test]
    fn offset_advances_by_page_size() {
        let page = PageRequest::resolve(Some(3), Some(10), None).expect("should resolve");
        assert_eq!(page.limit(), 10);
        assert_eq!(page.offset(), 30);
    }

    #[test]
    fn order_clause_renders_from_enums() {
        let desc = Sort::parse("amount,desc").expect("should parse");
        assert_eq!(desc.to_order_clause(), "amount DESC, id DESC");

        let by_id = Sort::parse("id").expect("should parse");
        assert_eq!(by_id.to_order_clause(), "id ASC");
    }
}
