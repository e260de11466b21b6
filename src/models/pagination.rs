use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TcgError};

// ---------------------------------------------------------------------------
// PaginationRequest
// ---------------------------------------------------------------------------

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationRequest {
    page: u32,
    items_per_page: u32,
}

impl PaginationRequest {
    /// Create a page request. Both `page` and `items_per_page` must be at least 1.
    pub fn new(page: u32, items_per_page: u32) -> Result<Self> {
        if page == 0 {
            return Err(TcgError::InvalidArgument(
                "pagination page is 1-based".to_string(),
            ));
        }
        if items_per_page == 0 {
            return Err(TcgError::InvalidArgument(
                "pagination page size must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            page,
            items_per_page,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    /// Query parameters for this request, in wire order.
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("pagination:page", self.page.to_string()),
            ("pagination:itemsPerPage", self.items_per_page.to_string()),
        ]
    }
}

// ---------------------------------------------------------------------------
// PaginatedResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResult<T> {
    pub items: T,
    /// The page number that produced `items`.
    pub page: u32,
    pub is_last_page: bool,
}

// ---------------------------------------------------------------------------
// Sort criteria
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortField {
    #[default]
    Name,
    Id,
}

impl SortField {
    pub const ALL: [SortField; 2] = [SortField::Name, SortField::Id];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Id => "id",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = TcgError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SortField::Name),
            "id" => Ok(SortField::Id),
            other => Err(TcgError::InvalidArgument(format!(
                "unknown sort field: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 2] = [SortOrder::Asc, SortOrder::Desc];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// The upper-cased form sent as `sort:order`.
    pub fn as_query(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = TcgError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(TcgError::InvalidArgument(format!(
                "unknown sort order: {}",
                other
            ))),
        }
    }
}
