//! Field-level validation of a content instance before it is persisted.

use std::cmp::Ordering;
use std::sync::Arc;

use contentkit_fields::FieldValue;

use crate::access::{DynamicContent, FieldAccess};
use crate::descriptor::{Compare, ContentTypeDef, FieldDecl};
use crate::error::FieldIssue;
use crate::field_value::ContentFieldValue;
use crate::serializer::ContentSerializer;

/// Check every declared field of `instance` against its field type and rules.
///
/// A member holding a raw string that failed to decode is checked against
/// that string, so malformed input is reported rather than treated as empty.
/// Members whose field type does not resolve are not checked. An empty list
/// means the instance may be persisted.
pub fn validate_content<T: FieldAccess + ?Sized>(instance: &T, serializer: &ContentSerializer) -> Vec<FieldIssue> {
    collect_issues(instance, serializer, |decl| {
        instance
            .field(&decl.name)
            .map(|field| field.raw_for_validation())
            .unwrap_or_default()
    })
}

/// Check stored field values as written, before any decoding.
///
/// Each declared field's raw string (the first entry with its name, else
/// empty) must be the canonical encoding of a valid value. Cross-field
/// comparisons run on the decoded values.
pub fn validate_field_values(
    content_type: Arc<ContentTypeDef>,
    values: &[ContentFieldValue],
    serializer: &ContentSerializer,
) -> Vec<FieldIssue> {
    let mut content = DynamicContent::with_empty_fields(content_type, serializer.registry());
    serializer.from_field_values(&mut content, values);
    collect_issues(&content, serializer, |decl| {
        values
            .iter()
            .find(|v| v.field_name == decl.name)
            .map(|v| v.value.clone())
            .unwrap_or_default()
    })
}

fn collect_issues<T, F>(instance: &T, serializer: &ContentSerializer, raw_of: F) -> Vec<FieldIssue>
where
    T: FieldAccess + ?Sized,
    F: Fn(&FieldDecl) -> String,
{
    let content_type = instance.content_type();
    let mut issues = Vec::new();

    for decl in &content_type.fields {
        let Some(field_type) = serializer.resolve(&decl.field_type) else {
            continue;
        };
        if let Err(issue) = field_type.check(&raw_of(decl), Some(&decl.rules)) {
            issues.push(FieldIssue {
                field: decl.name.clone(),
                message: issue.to_string(),
            });
            continue;
        }
        if let Some(compare) = &decl.compare {
            if let Some(message) = check_compare(instance, decl, compare) {
                issues.push(FieldIssue {
                    field: decl.name.clone(),
                    message,
                });
            }
        }
    }
    issues
}

fn check_compare<T: FieldAccess + ?Sized>(instance: &T, decl: &FieldDecl, compare: &Compare) -> Option<String> {
    let this = instance.field(&decl.name)?.value()?;
    let other = instance.field(&compare.field)?.value()?;
    let ordering = compare_values(this, other)?;
    if compare.op.holds(ordering) {
        return None;
    }
    let other_label = instance
        .content_type()
        .field_decl(&compare.field)
        .map(FieldDecl::label)
        .unwrap_or(&compare.field);
    Some(
        compare
            .message
            .clone()
            .unwrap_or_else(|| format!("must be {} {}", compare.op.symbol(), other_label)),
    )
}

/// Order two decoded values of comparable kinds. Mixed or unordered kinds yield `None`.
fn compare_values(a: &FieldValue, b: &FieldValue) -> Option<Ordering> {
    match (a, b) {
        (FieldValue::DateTime(x), FieldValue::DateTime(y)) => Some(x.cmp(y)),
        (FieldValue::Text(x), FieldValue::Text(y)) => Some(x.cmp(y)),
        (FieldValue::Bool(x), FieldValue::Bool(y)) => Some(x.cmp(y)),
        (FieldValue::Int(x), FieldValue::Int(y)) => Some(x.cmp(y)),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}
