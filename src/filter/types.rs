use std::cmp::Ordering;

use crate::project::Project;

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

    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Project attributes the listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Featured,
    Order,
    CreatedAt,
}

impl SortColumn {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortColumn::Featured => "\"featured\"",
            SortColumn::Order => "\"order\"",
            SortColumn::CreatedAt => "\"created_at\"",
        }
    }

    pub fn compare(&self, a: &Project, b: &Project) -> Ordering {
        match self {
            SortColumn::Featured => a.featured.cmp(&b.featured),
            SortColumn::Order => a.order.cmp(&b.order),
            SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOrderInfo {
    pub column: SortColumn,
    pub sort: SortDirection,
}
