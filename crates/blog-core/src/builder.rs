//! Pure translation of caller input into store-level update and filter
//! expressions. Nothing here touches the store.

use chrono::{DateTime, Utc};

use crate::domain::{Blog, BlogDraft};

/// A single field assignment in a partial update.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Title(String),
    Content(String),
    Category(String),
    Tags(Vec<String>),
    UpdatedAt(DateTime<Utc>),
}

impl FieldUpdate {
    /// Document key this assignment writes.
    pub fn field(&self) -> &'static str {
        match self {
            FieldUpdate::Title(_) => "title",
            FieldUpdate::Content(_) => "content",
            FieldUpdate::Category(_) => "category",
            FieldUpdate::Tags(_) => "tags",
            FieldUpdate::UpdatedAt(_) => "updatedAt",
        }
    }
}

/// Ordered field assignments, applied as a merge: listed keys are set,
/// every other key is left untouched.
///
/// Always ends with an `updatedAt` assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSet(Vec<FieldUpdate>);

impl UpdateSet {
    pub fn iter(&self) -> impl Iterator<Item = &FieldUpdate> {
        self.0.iter()
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(FieldUpdate::field).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge the assignments into an in-memory document.
    pub fn apply_to(&self, blog: &mut Blog) {
        for update in &self.0 {
            match update {
                FieldUpdate::Title(title) => blog.title = title.clone(),
                FieldUpdate::Content(content) => blog.content = content.clone(),
                FieldUpdate::Category(category) => blog.category = Some(category.clone()),
                FieldUpdate::Tags(tags) => blog.tags = Some(tags.clone()),
                FieldUpdate::UpdatedAt(at) => blog.updated_at = *at,
            }
        }
    }
}

/// Build the partial update for a draft.
///
/// Empty strings and absent tags are skipped; an explicit `[]` for tags is
/// kept. An empty draft still yields the `updatedAt` bump.
pub fn build_update(draft: BlogDraft, now: DateTime<Utc>) -> UpdateSet {
    let mut set = Vec::with_capacity(5);

    if !draft.title.is_empty() {
        set.push(FieldUpdate::Title(draft.title));
    }
    if !draft.content.is_empty() {
        set.push(FieldUpdate::Content(draft.content));
    }
    if !draft.category.is_empty() {
        set.push(FieldUpdate::Category(draft.category));
    }
    if let Some(tags) = draft.tags {
        set.push(FieldUpdate::Tags(tags));
    }
    set.push(FieldUpdate::UpdatedAt(now));

    UpdateSet(set)
}

/// Which documents a list call returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    /// Every document in the collection.
    All,
    /// Documents whose title, content or any tag contains a match for the
    /// pattern, compared case-insensitively. The pattern is a regular
    /// expression, not a literal.
    Pattern(String),
}

/// Build the list filter for an optional search term.
pub fn build_search_filter(term: Option<&str>) -> SearchFilter {
    match term {
        Some(term) if !term.is_empty() => SearchFilter::Pattern(term.to_string()),
        _ => SearchFilter::All,
    }
}
