use crate::project::Project;

/// Free-text search over title, description and tech entries.
///
/// Matching is a case-insensitive substring test, not tokenized. A blank query
/// matches everything; any other query is matched exactly as sent, surrounding
/// whitespace included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    search: Option<String>,
}

impl ProjectFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn search(query: Option<&str>) -> Self {
        let search = query
            .filter(|q| !q.trim().is_empty())
            .map(str::to_string);
        Self { search }
    }

    pub fn query(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn matches(&self, project: &Project) -> bool {
        let Some(query) = &self.search else {
            return true;
        };
        let needle = query.to_lowercase();
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

        contains(&project.title)
            || contains(&project.description)
            || project.tech.iter().any(|t| contains(t))
    }

    /// ILIKE pattern with `\`, `%` and `_` escaped so the query matches literally
    pub fn like_pattern(&self) -> Option<String> {
        self.search.as_ref().map(|q| {
            let mut escaped = String::with_capacity(q.len() + 2);
            escaped.push('%');
            for c in q.chars() {
                if matches!(c, '\\' | '%' | '_') {
                    escaped.push('\\');
                }
                escaped.push(c);
            }
            escaped.push('%');
            escaped
        })
    }

    /// WHERE clause binding the pattern at `$param_index`, or empty when matching everything
    pub fn generate(&self, param_index: usize) -> String {
        if self.search.is_none() {
            return String::new();
        }
        let p = format!("${}", param_index);
        format!(
            "WHERE \"title\" ILIKE {p} OR \"description\" ILIKE {p} \
             OR EXISTS (SELECT 1 FROM unnest(\"tech\") AS t(entry) WHERE t.entry ILIKE {p})"
        )
    }
}
