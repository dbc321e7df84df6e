//! ContentRepository — glue between content instances, the serializer and a store.

use std::sync::Arc;

use tracing::{debug, info};
use ulid::Ulid;

use crate::access::{DynamicContent, FieldAccess};
use crate::catalog::ContentTypeCatalog;
use crate::descriptor::ContentTypeDef;
use crate::error::{ContentError, Result};
use crate::row::ContentRow;
use crate::serializer::ContentSerializer;
use crate::store::{ContentStore, Page};
use crate::validate::validate_content;

/// Creates, reads and updates content rows for the API layer.
pub struct ContentRepository {
    catalog: Arc<ContentTypeCatalog>,
    serializer: Arc<ContentSerializer>,
    store: Arc<dyn ContentStore>,
}

impl ContentRepository {
    pub fn new(
        catalog: Arc<ContentTypeCatalog>,
        serializer: Arc<ContentSerializer>,
        store: Arc<dyn ContentStore>,
    ) -> Self {
        Self {
            catalog,
            serializer,
            store,
        }
    }

    pub fn catalog(&self) -> &Arc<ContentTypeCatalog> {
        &self.catalog
    }

    pub fn serializer(&self) -> &Arc<ContentSerializer> {
        &self.serializer
    }

    /// Descriptor for a content type id known to the catalog.
    pub fn content_type(&self, id: &str) -> Result<Arc<ContentTypeDef>> {
        self.catalog
            .get(id)
            .ok_or_else(|| ContentError::UnknownContentType { id: id.to_string() })
    }

    /// Validate and store `instance` as a new draft.
    pub fn create<T: FieldAccess + ?Sized>(&self, title: &str, instance: &T) -> Result<ContentRow> {
        let type_id = instance.content_type().id.clone();
        self.content_type(&type_id)?;
        self.check(instance)?;

        let json = self.serializer.serialize(instance)?;
        let mut row = ContentRow::new_draft(title, type_id, json);
        row.slug = self.unique_slug(&row.slug)?;
        let row = self.store.create(row)?;
        info!(id = %row.id, slug = %row.slug, content_type = %row.content_type, "content created");
        Ok(row)
    }

    /// Stored row by id.
    pub fn row(&self, id: &Ulid) -> Result<ContentRow> {
        self.store
            .get(id)?
            .ok_or_else(|| ContentError::NotFound { id: id.to_string() })
    }

    pub fn row_by_slug(&self, slug: &str) -> Result<ContentRow> {
        self.store
            .get_by_slug(slug)?
            .ok_or_else(|| ContentError::NotFound { id: slug.to_string() })
    }

    /// Load a row and reconstruct its statically described instance.
    pub fn load<T: FieldAccess + Default>(&self, id: &Ulid) -> Result<(ContentRow, T)> {
        let row = self.row(id)?;
        let instance: T = self.serializer.deserialize(&row.json_content);
        ensure_type(&row, instance.content_type())?;
        Ok((row, instance))
    }

    /// Load a row using the descriptor registered for its content type.
    pub fn load_dynamic(&self, id: &Ulid) -> Result<(ContentRow, DynamicContent)> {
        let row = self.row(id)?;
        let content_type = self.content_type(&row.content_type)?;
        let instance = self
            .serializer
            .deserialize_dynamic(content_type, &row.json_content);
        Ok((row, instance))
    }

    /// Replace the stored field data of a row wholesale.
    pub fn update<T: FieldAccess + ?Sized>(&self, id: &Ulid, instance: &T) -> Result<ContentRow> {
        let mut row = self.row(id)?;
        ensure_type(&row, instance.content_type())?;
        self.check(instance)?;
        row.replace_content(self.serializer.serialize(instance)?);
        let row = self.store.update(row)?;
        debug!(id = %row.id, "content updated");
        Ok(row)
    }

    pub fn publish(&self, id: &Ulid) -> Result<ContentRow> {
        let mut row = self.row(id)?;
        row.publish();
        let row = self.store.update(row)?;
        info!(id = %row.id, "content published");
        Ok(row)
    }

    pub fn unpublish(&self, id: &Ulid) -> Result<ContentRow> {
        let mut row = self.row(id)?;
        row.unpublish();
        self.store.update(row)
    }

    pub fn delete(&self, id: &Ulid) -> Result<bool> {
        self.store.delete(id)
    }

    pub fn list(&self, content_type: Option<&str>, page: usize, page_size: usize) -> Result<Page> {
        if let Some(id) = content_type {
            self.content_type(id)?;
        }
        self.store.paginate(content_type, page, page_size)
    }

    fn check<T: FieldAccess + ?Sized>(&self, instance: &T) -> Result<()> {
        let issues = validate_content(instance, &self.serializer);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ContentError::ValidationFailed { issues })
        }
    }

    /// `base`, or `base-2`, `base-3`, ... when taken.
    fn unique_slug(&self, base: &str) -> Result<String> {
        if !self.store.slug_exists(base)? {
            return Ok(base.to_string());
        }
        let mut n = 2usize;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.store.slug_exists(&candidate)? {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}

fn ensure_type(row: &ContentRow, content_type: &ContentTypeDef) -> Result<()> {
    if row.content_type == content_type.id {
        Ok(())
    } else {
        Err(ContentError::ContentTypeMismatch {
            expected: content_type.id.clone(),
            found: row.content_type.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticContentTypes;
    use crate::descriptor::FieldDecl;
    use crate::store::MemoryContentStore;
    use contentkit_fields::FieldTypeRegistry;

    fn note_type() -> ContentTypeDef {
        ContentTypeDef::new("notes.note", "Note")
            .field(FieldDecl::new("Body", "markdown").required())
            .field(FieldDecl::new("Color", "color"))
    }

    fn repository() -> ContentRepository {
        let catalog = ContentTypeCatalog::new(Arc::new(StaticContentTypes::new().with(note_type())));
        let serializer = ContentSerializer::new(Arc::new(FieldTypeRegistry::new()));
        ContentRepository::new(
            Arc::new(catalog),
            Arc::new(serializer),
            Arc::new(MemoryContentStore::new()),
        )
    }

    fn note(repo: &ContentRepository, body: &str, color: &str) -> DynamicContent {
        let registry = repo.serializer().registry().clone();
        let mut content = DynamicContent::with_empty_fields(repo.content_type("notes.note").unwrap(), &registry);
        content.set_value_string(&registry, "Body", body);
        content.set_value_string(&registry, "Color", color);
        content
    }

    #[test]
    fn create_then_load_dynamic() {
        let repo = repository();
        let row = repo.create("First note", &note(&repo, "# Hi", "#fff")).unwrap();
        assert_eq!(row.slug, "first-note");
        let (loaded, content) = repo.load_dynamic(&row.id).unwrap();
        assert_eq!(loaded, row);
        assert_eq!(content.field("Body").unwrap().as_text(), Some("# Hi"));
        assert_eq!(content.field("Color").unwrap().as_text(), Some("#fff"));
    }

    #[test]
    fn slugs_are_made_unique() {
        let repo = repository();
        let a = repo.create("Same", &note(&repo, "a", "")).unwrap();
        let b = repo.create("Same", &note(&repo, "b", "")).unwrap();
        let c = repo.create("Same", &note(&repo, "c", "")).unwrap();
        assert_eq!(
            (a.slug.as_str(), b.slug.as_str(), c.slug.as_str()),
            ("same", "same-2", "same-3")
        );
    }

    #[test]
    fn invalid_content_is_not_persisted() {
        let repo = repository();
        let err = repo.create("Empty", &note(&repo, "", "")).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(repo.list(None, 1, 10).unwrap().total, 0);
    }

    #[test]
    fn unknown_content_type_is_reported() {
        let repo = repository();
        let stray = DynamicContent::new(Arc::new(ContentTypeDef::new("stray", "Stray")));
        assert!(matches!(
            repo.create("Stray", &stray),
            Err(ContentError::UnknownContentType { .. })
        ));
        assert!(repo.list(Some("stray"), 1, 10).unwrap_err().is_not_found());
    }

    #[test]
    fn update_replaces_content_and_publish_is_independent() {
        let repo = repository();
        let row = repo.create("Note", &note(&repo, "v1", "")).unwrap();
        let published = repo.publish(&row.id).unwrap();
        assert!(published.is_published());

        let updated = repo.update(&row.id, &note(&repo, "v2", "#000")).unwrap();
        assert!(updated.is_published());
        assert!(updated.updated_at.is_some());
        let (_, content) = repo.load_dynamic(&row.id).unwrap();
        assert_eq!(content.field("Body").unwrap().as_text(), Some("v2"));

        let draft = repo.unpublish(&row.id).unwrap();
        assert!(!draft.is_published());
    }

    #[test]
    fn missing_rows_are_not_found() {
        let repo = repository();
        let id = Ulid::new();
        assert!(repo.load_dynamic(&id).unwrap_err().is_not_found());
        assert!(repo.publish(&id).unwrap_err().is_not_found());
        assert!(repo.row_by_slug("nope").unwrap_err().is_not_found());
        assert!(!repo.delete(&id).unwrap());
    }
}
