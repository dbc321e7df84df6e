//! Content type discovery.
//!
//! The catalog is built lazily, exactly once, from a [`ContentTypeProvider`].
//! Readers see either no catalog or the complete one: the scan runs under a
//! mutex with a double-checked read, and the finished state is published in
//! one write.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::descriptor::{ContentTypeDef, ContentTypeSummary};

/// Source of content type descriptors.
pub trait ContentTypeProvider: Send + Sync {
    /// Every content type this provider knows, in any order.
    fn content_types(&self) -> Vec<ContentTypeDef>;
}

/// Content types declared in code.
#[derive(Debug, Clone, Default)]
pub struct StaticContentTypes {
    types: Vec<ContentTypeDef>,
}

impl StaticContentTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a content type.
    pub fn with(mut self, def: ContentTypeDef) -> Self {
        self.types.push(def);
        self
    }
}

impl From<Vec<ContentTypeDef>> for StaticContentTypes {
    fn from(types: Vec<ContentTypeDef>) -> Self {
        Self { types }
    }
}

impl ContentTypeProvider for StaticContentTypes {
    fn content_types(&self) -> Vec<ContentTypeDef> {
        self.types.clone()
    }
}

struct CatalogState {
    summaries: Arc<[ContentTypeSummary]>,
    by_id: HashMap<String, Arc<ContentTypeDef>>,
}

/// Process-wide catalog of content types, shared by reference.
pub struct ContentTypeCatalog {
    provider: Arc<dyn ContentTypeProvider>,
    state: RwLock<Option<Arc<CatalogState>>>,
    build_lock: Mutex<()>,
    scans: AtomicUsize,
}

impl ContentTypeCatalog {
    pub fn new(provider: Arc<dyn ContentTypeProvider>) -> Self {
        Self {
            provider,
            state: RwLock::new(None),
            build_lock: Mutex::new(()),
            scans: AtomicUsize::new(0),
        }
    }

    /// Summaries ordered by rank, then display name.
    pub fn list(&self) -> Arc<[ContentTypeSummary]> {
        self.state().summaries.clone()
    }

    pub fn get(&self, id: &str) -> Option<Arc<ContentTypeDef>> {
        self.state().by_id.get(id).cloned()
    }

    /// Full descriptors in listing order.
    pub fn content_types(&self) -> Vec<Arc<ContentTypeDef>> {
        let state = self.state();
        state
            .summaries
            .iter()
            .filter_map(|s| state.by_id.get(&s.system_type_id).cloned())
            .collect()
    }

    /// How many times the provider has been scanned.
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    pub fn is_built(&self) -> bool {
        self.published().is_some()
    }

    /// Drop the built catalog so the next read rescans the provider.
    pub fn invalidate(&self) {
        let _guard = self.build_lock.lock().unwrap_or_else(PoisonError::into_inner);
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn published(&self) -> Option<Arc<CatalogState>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn state(&self) -> Arc<CatalogState> {
        if let Some(state) = self.published() {
            return state;
        }
        let _guard = self.build_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(state) = self.published() {
            return state;
        }
        let state = Arc::new(self.scan());
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Some(state.clone());
        state
    }

    fn scan(&self) -> CatalogState {
        self.scans.fetch_add(1, Ordering::SeqCst);
        let mut by_id = HashMap::new();
        for def in self.provider.content_types() {
            if let Err(e) = def.validate() {
                warn!(id = %def.id, %e, "skipping invalid content type");
                continue;
            }
            if by_id.contains_key(&def.id) {
                warn!(id = %def.id, "skipping duplicate content type");
                continue;
            }
            by_id.insert(def.id.clone(), Arc::new(def));
        }

        let mut summaries: Vec<ContentTypeSummary> = by_id.values().map(|def| def.summary()).collect();
        summaries.sort_by(|a, b| {
            a.order_rank
                .cmp(&b.order_rank)
                .then_with(|| a.display_name.cmp(&b.display_name))
                .then_with(|| a.system_type_id.cmp(&b.system_type_id))
        });
        debug!(count = summaries.len(), "content type catalog built");

        CatalogState {
            summaries: summaries.into(),
            by_id,
        }
    }
}

impl std::fmt::Debug for ContentTypeCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentTypeCatalog")
            .field("built", &self.is_built())
            .field("scans", &self.scan_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldDecl;
    use std::thread;
    use std::time::Duration;

    /// Provider that is slow to scan, to widen the race window.
    struct SlowProvider {
        inner: StaticContentTypes,
    }

    impl ContentTypeProvider for SlowProvider {
        fn content_types(&self) -> Vec<ContentTypeDef> {
            thread::sleep(Duration::from_millis(20));
            self.inner.content_types()
        }
    }

    fn types() -> StaticContentTypes {
        StaticContentTypes::new()
            .with(ContentTypeDef::new("site.page", "Page").order(2))
            .with(ContentTypeDef::new("site.news", "News").order(1))
            .with(ContentTypeDef::new("site.faq", "FAQ").order(2))
            .with(
                ContentTypeDef::new("broken", "Broken")
                    .field(FieldDecl::new("A", "text"))
                    .field(FieldDecl::new("A", "text")),
            )
            .with(ContentTypeDef::new("site.page", "Page again"))
    }

    #[test]
    fn list_is_ordered_by_rank_then_name() {
        let catalog = ContentTypeCatalog::new(Arc::new(types()));
        let ids: Vec<_> = catalog
            .list()
            .iter()
            .map(|s| s.system_type_id.clone())
            .collect();
        assert_eq!(ids, vec!["site.news", "site.faq", "site.page"]);
    }

    #[test]
    fn invalid_and_duplicate_types_are_skipped() {
        let catalog = ContentTypeCatalog::new(Arc::new(types()));
        assert!(catalog.get("broken").is_none());
        assert_eq!(catalog.get("site.page").unwrap().display_name, "Page");
    }

    #[test]
    fn built_lazily_once() {
        let catalog = ContentTypeCatalog::new(Arc::new(types()));
        assert!(!catalog.is_built());
        assert_eq!(catalog.scan_count(), 0);
        catalog.list();
        catalog.get("site.faq");
        assert!(catalog.is_built());
        assert_eq!(catalog.scan_count(), 1);
    }

    #[test]
    fn concurrent_first_callers_scan_once() {
        let catalog = ContentTypeCatalog::new(Arc::new(SlowProvider { inner: types() }));
        thread::scope(|scope| {
            for _ in 0..16 {
                scope.spawn(|| assert_eq!(catalog.list().len(), 3));
            }
        });
        assert_eq!(catalog.scan_count(), 1);
    }

    #[test]
    fn invalidate_forces_rescan() {
        let catalog = ContentTypeCatalog::new(Arc::new(types()));
        catalog.list();
        catalog.invalidate();
        assert!(!catalog.is_built());
        catalog.list();
        assert_eq!(catalog.scan_count(), 2);
    }
}
