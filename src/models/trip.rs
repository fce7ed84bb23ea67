use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_OFFSET: u32 = 0;

/// Case-folded form of a title, stored alongside it for filtering.
pub fn fold_title(title: &str) -> String {
    title.to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Trip {
    #[serde(default)]
    pub id: i64,
    pub leader_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Trip {
    pub fn new(leader_id: i64, title: impl Into<String>) -> Self {
        Self {
            id: 0,
            leader_id,
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct TripFilter {
    pub title: Option<String>,
    pub leader_id: Option<i64>,
}

impl TripFilter {
    /// Lowercased `LIKE` pattern matched against the folded title column.
    /// Wildcards in the input are escaped by `\`.
    pub fn title_pattern(&self) -> Option<String> {
        let title = self.title.as_deref().filter(|t| !t.is_empty())?;
        let mut pattern = String::with_capacity(title.len() + 2);
        pattern.push('%');
        for ch in fold_title(title).chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        Some(pattern)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Pagination {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl Pagination {
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(DEFAULT_OFFSET)
    }
}

/// Only these identifiers ever reach the ORDER BY clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Id,
    Title,
    LeaderId,
}

impl SortKey {
    pub fn from_input(raw: Option<&str>) -> Self {
        match raw {
            Some("title") => SortKey::Title,
            Some("leader_id" | "leaderId") => SortKey::LeaderId,
            _ => SortKey::Id,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Title => "title",
            SortKey::LeaderId => "leader_id",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn from_input(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Raw caller input; anything outside the allow-lists resolves to `id ASC`.
#[derive(Debug, Clone, Default)]
pub struct TripSort {
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl TripSort {
    pub fn new(sort_by: impl Into<String>, order: impl Into<String>) -> Self {
        Self {
            sort_by: Some(sort_by.into()),
            order: Some(order.into()),
        }
    }

    pub fn resolve(&self) -> (SortKey, SortOrder) {
        (
            SortKey::from_input(self.sort_by.as_deref()),
            SortOrder::from_input(self.order.as_deref()),
        )
    }
}
