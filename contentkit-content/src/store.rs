//! Storage collaborator for content rows.
//!
//! The persistence layer lives outside this crate; [`ContentStore`] is the
//! interface it provides. [`MemoryContentStore`] keeps rows in memory and
//! backs tests and the command line tool.

use dashmap::DashMap;
use serde::Serialize;
use ulid::Ulid;

use crate::error::{ContentError, Result};
use crate::row::ContentRow;

/// One page of rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub items: Vec<ContentRow>,
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
}

impl Page {
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }
}

/// Trait for stores that persist content rows keyed by id and slug.
pub trait ContentStore: Send + Sync {
    /// Insert a new row. Fails when the id or slug is already taken.
    fn create(&self, row: ContentRow) -> Result<ContentRow>;

    fn get(&self, id: &Ulid) -> Result<Option<ContentRow>>;

    fn get_by_slug(&self, slug: &str) -> Result<Option<ContentRow>>;

    /// Replace an existing row.
    fn update(&self, row: ContentRow) -> Result<ContentRow>;

    /// Remove a row, returning whether it existed.
    fn delete(&self, id: &Ulid) -> Result<bool>;

    /// Rows oldest first, optionally restricted to one content type.
    fn paginate(&self, content_type: Option<&str>, page: usize, page_size: usize) -> Result<Page>;

    fn slug_exists(&self, slug: &str) -> Result<bool> {
        Ok(self.get_by_slug(slug)?.is_some())
    }
}

/// In-memory content store.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    rows: DashMap<Ulid, ContentRow>,
    slugs: DashMap<String, Ulid>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl ContentStore for MemoryContentStore {
    fn create(&self, row: ContentRow) -> Result<ContentRow> {
        if self.rows.contains_key(&row.id) {
            return Err(ContentError::Storage(format!("row {} already exists", row.id)));
        }
        match self.slugs.entry(row.slug.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(ContentError::DuplicateSlug { slug: row.slug });
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(row.id);
            }
        }
        self.rows.insert(row.id, row.clone());
        Ok(row)
    }

    fn get(&self, id: &Ulid) -> Result<Option<ContentRow>> {
        Ok(self.rows.get(id).map(|r| r.value().clone()))
    }

    fn get_by_slug(&self, slug: &str) -> Result<Option<ContentRow>> {
        let Some(id) = self.slugs.get(slug).map(|id| *id.value()) else {
            return Ok(None);
        };
        self.get(&id)
    }

    fn update(&self, row: ContentRow) -> Result<ContentRow> {
        let previous_slug = match self.rows.get(&row.id) {
            Some(existing) => existing.slug.clone(),
            None => {
                return Err(ContentError::NotFound {
                    id: row.id.to_string(),
                })
            }
        };
        if previous_slug != row.slug {
            match self.slugs.entry(row.slug.clone()) {
                dashmap::mapref::entry::Entry::Occupied(_) => {
                    return Err(ContentError::DuplicateSlug { slug: row.slug });
                }
                dashmap::mapref::entry::Entry::Vacant(slot) => {
                    slot.insert(row.id);
                }
            }
            self.slugs.remove(&previous_slug);
        }
        self.rows.insert(row.id, row.clone());
        Ok(row)
    }

    fn delete(&self, id: &Ulid) -> Result<bool> {
        match self.rows.remove(id) {
            Some((_, row)) => {
                self.slugs.remove(&row.slug);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn paginate(&self, content_type: Option<&str>, page: usize, page_size: usize) -> Result<Page> {
        let page = page.max(1);
        let mut rows: Vec<ContentRow> = self
            .rows
            .iter()
            .filter(|r| content_type.map_or(true, |ct| r.content_type == ct))
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by_key(|r| (r.created_at, r.id));
        let total = rows.len();
        let items = rows
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();
        Ok(Page {
            items,
            page,
            page_size,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str, content_type: &str) -> ContentRow {
        ContentRow::new_draft(title, content_type, "[]")
    }

    #[test]
    fn create_and_lookup() {
        let store = MemoryContentStore::new();
        let created = store.create(row("Hello", "site.page")).unwrap();
        assert_eq!(store.get(&created.id).unwrap(), Some(created.clone()));
        assert_eq!(store.get_by_slug("hello").unwrap(), Some(created));
        assert!(store.slug_exists("hello").unwrap());
        assert!(!store.slug_exists("bye").unwrap());
    }

    #[test]
    fn duplicate_slug_is_rejected() {
        let store = MemoryContentStore::new();
        store.create(row("Hello", "site.page")).unwrap();
        let err = store.create(row("hello", "site.page")).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateSlug { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_moves_slug_index() {
        let store = MemoryContentStore::new();
        let mut r = store.create(row("Hello", "site.page")).unwrap();
        r.slug = "greetings".into();
        store.update(r.clone()).unwrap();
        assert!(store.get_by_slug("hello").unwrap().is_none());
        assert_eq!(store.get_by_slug("greetings").unwrap().unwrap().id, r.id);
    }

    #[test]
    fn update_of_missing_row_is_not_found() {
        let store = MemoryContentStore::new();
        assert!(store.update(row("Ghost", "x")).unwrap_err().is_not_found());
    }

    #[test]
    fn delete_frees_slug() {
        let store = MemoryContentStore::new();
        let r = store.create(row("Hello", "site.page")).unwrap();
        assert!(store.delete(&r.id).unwrap());
        assert!(!store.delete(&r.id).unwrap());
        assert!(store.is_empty());
        store.create(row("Hello", "site.page")).unwrap();
    }

    #[test]
    fn paginate_filters_and_pages() {
        let store = MemoryContentStore::new();
        for i in 0..5 {
            store.create(row(&format!("Page {i}"), "site.page")).unwrap();
        }
        store.create(row("News", "site.news")).unwrap();

        let first = store.paginate(Some("site.page"), 1, 2).unwrap();
        assert_eq!(first.total, 5);
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.total_pages(), 3);

        let last = store.paginate(Some("site.page"), 3, 2).unwrap();
        assert_eq!(last.items.len(), 1);

        let all = store.paginate(None, 0, 10).unwrap();
        assert_eq!(all.page, 1);
        assert_eq!(all.total, 6);
    }
}
