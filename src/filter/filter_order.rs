use std::cmp::Ordering;

use crate::project::Project;

use super::types::{FilterOrderInfo, SortColumn, SortDirection};

/// Composite ordering, compared key by key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder(Vec<FilterOrderInfo>);

impl SortOrder {
    pub fn new(keys: Vec<FilterOrderInfo>) -> Self {
        Self(keys)
    }

    /// Listing order: featured first, then `order` ascending, newest first
    pub fn display() -> Self {
        Self(vec![
            FilterOrderInfo { column: SortColumn::Featured, sort: SortDirection::Desc },
            FilterOrderInfo { column: SortColumn::Order, sort: SortDirection::Asc },
            FilterOrderInfo { column: SortColumn::CreatedAt, sort: SortDirection::Desc },
        ])
    }

    pub fn keys(&self) -> &[FilterOrderInfo] {
        &self.0
    }

    pub fn compare(&self, a: &Project, b: &Project) -> Ordering {
        self.0
            .iter()
            .map(|key| key.sort.apply(key.column.compare(a, b)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Stable sort; projects equal on every key keep their relative order
    pub fn sort(&self, projects: &mut [Project]) {
        projects.sort_by(|a, b| self.compare(a, b));
    }

    pub fn generate(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|i| format!("{} {}", i.column.to_sql(), i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::display()
    }
}
