use crate::error::CatalogLoadError;
use crate::{Assessment, Attributes, DocId};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Immutable, ordered set of assessments loaded once at startup.
///
/// Insertion order is the file order and doubles as the ranking tie-break.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    assessments: Vec<Assessment>,
    by_id: HashMap<String, DocId>,
}

impl Catalog {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogLoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| CatalogLoadError::Io { path: path.to_path_buf(), source })?;
        let catalog = Self::from_json_str(&text)?;
        tracing::info!(path = %path.display(), assessments = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    pub fn from_json_str(text: &str) -> Result<Self, CatalogLoadError> {
        let json: Value = serde_json::from_str(text)?;
        let records = match json {
            Value::Array(arr) => arr,
            _ => return Err(CatalogLoadError::NotAnArray),
        };
        let mut assessments = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            assessments.push(parse_record(index, record)?);
        }
        Self::from_assessments(assessments)
    }

    /// Build from already-parsed records, enforcing the same invariants as `load`.
    pub fn from_assessments(assessments: Vec<Assessment>) -> Result<Self, CatalogLoadError> {
        let mut by_id = HashMap::with_capacity(assessments.len());
        for (index, a) in assessments.iter().enumerate() {
            if a.description.trim().is_empty() {
                return Err(CatalogLoadError::EmptyDescription { index, id: a.id.clone() });
            }
            if by_id.insert(a.id.clone(), index as DocId).is_some() {
                return Err(CatalogLoadError::DuplicateId { index, id: a.id.clone() });
            }
        }
        Ok(Self { assessments, by_id })
    }

    pub fn len(&self) -> usize { self.assessments.len() }
    pub fn is_empty(&self) -> bool { self.assessments.is_empty() }
    pub fn as_slice(&self) -> &[Assessment] { &self.assessments }
    pub fn iter(&self) -> std::slice::Iter<'_, Assessment> { self.assessments.iter() }

    pub fn doc(&self, doc_id: DocId) -> Option<&Assessment> {
        self.assessments.get(doc_id as usize)
    }

    pub fn get(&self, id: &str) -> Option<&Assessment> {
        self.by_id.get(id).and_then(|&doc_id| self.doc(doc_id))
    }

    /// Case-insensitive exact match on the display name.
    pub fn find_by_name(&self, name: &str) -> Option<&Assessment> {
        let wanted = name.to_lowercase();
        self.assessments.iter().find(|a| a.name.to_lowercase() == wanted)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Assessment;
    type IntoIter = std::slice::Iter<'a, Assessment>;
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

// Flat records (url, duration, test_type, ... next to the required fields) are
// folded into `attributes`; an explicit `attributes` object wins on conflicts.
fn parse_record(index: usize, record: Value) -> Result<Assessment, CatalogLoadError> {
    let mut obj = match record {
        Value::Object(obj) => obj,
        _ => return Err(CatalogLoadError::NotAnObject { index }),
    };
    let id = take_string(&mut obj, index, "id")?;
    let name = take_string(&mut obj, index, "name")?;
    let description = take_string(&mut obj, index, "description")?;

    let explicit = match obj.remove("attributes") {
        Some(Value::Object(map)) => map,
        Some(Value::Null) | None => Attributes::new(),
        Some(_) => return Err(CatalogLoadError::InvalidAttributes { index }),
    };
    let mut attributes = obj;
    attributes.extend(explicit);

    Ok(Assessment { id, name, description, attributes })
}

fn take_string(obj: &mut Attributes, index: usize, field: &'static str) -> Result<String, CatalogLoadError> {
    match obj.remove(field) {
        Some(Value::String(s)) => Ok(s),
        _ => Err(CatalogLoadError::MissingField { index, field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_nested_and_flat_attributes() {
        let catalog = Catalog::from_json_str(
            r#"[
                {"id": "a", "name": "Java 8", "description": "Java test", "attributes": {"duration": "30 minutes"}},
                {"id": "b", "name": "Sales", "description": "Sales test", "duration": "45 minutes", "test_type": "P"}
            ]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("a").unwrap().attributes["duration"], "30 minutes");
        let b = catalog.get("b").unwrap();
        assert_eq!(b.attributes["duration"], "45 minutes");
        assert_eq!(b.attributes["test_type"], "P");
        assert!(!b.attributes.contains_key("id"));
    }

    #[test]
    fn explicit_attributes_win() {
        let catalog = Catalog::from_json_str(
            r#"[{"id": "a", "name": "n", "description": "d", "url": "flat", "attributes": {"url": "nested"}}]"#,
        )
        .unwrap();
        assert_eq!(catalog.get("a").unwrap().attributes["url"], "nested");
    }

    #[test]
    fn rejects_missing_field() {
        let err = Catalog::from_json_str(r#"[{"id": "a", "description": "d"}]"#).unwrap_err();
        assert!(matches!(err, CatalogLoadError::MissingField { index: 0, field: "name" }));
    }

    #[test]
    fn rejects_blank_description_and_duplicates() {
        let err = Catalog::from_json_str(r#"[{"id": "a", "name": "n", "description": "  "}]"#).unwrap_err();
        assert!(matches!(err, CatalogLoadError::EmptyDescription { index: 0, .. }));

        let err = Catalog::from_json_str(
            r#"[{"id": "a", "name": "n", "description": "x"}, {"id": "a", "name": "m", "description": "y"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogLoadError::DuplicateId { index: 1, .. }));
    }

    #[test]
    fn rejects_non_array_and_garbage() {
        assert!(matches!(Catalog::from_json_str(r#"{"id": "a"}"#), Err(CatalogLoadError::NotAnArray)));
        assert!(matches!(Catalog::from_json_str("not json"), Err(CatalogLoadError::Parse(_))));
        assert!(matches!(Catalog::from_json_str("[1]"), Err(CatalogLoadError::NotAnObject { index: 0 })));
    }

    #[test]
    fn rejects_non_object_attributes() {
        let err = Catalog::from_json_str(r#"[{"id": "a", "name": "n", "description": "d", "attributes": 5}]"#).unwrap_err();
        assert!(matches!(err, CatalogLoadError::InvalidAttributes { index: 0 }));
        let err = Catalog::from_json_str(r#"[{"id": "a", "name": "n", "description": "d", "attributes": ["x"]}]"#).unwrap_err();
        assert!(matches!(err, CatalogLoadError::InvalidAttributes { index: 0 }));
        // null is treated as absent
        assert!(Catalog::from_json_str(r#"[{"id": "a", "name": "n", "description": "d", "attributes": null}]"#).is_ok());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Catalog::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, CatalogLoadError::Io { .. }));
    }

    #[test]
    fn find_by_name_ignores_case() {
        let catalog = Catalog::from_json_str(r#"[{"id": "a", "name": "Core Java", "description": "d"}]"#).unwrap();
        assert_eq!(catalog.find_by_name("core JAVA").unwrap().id, "a");
        assert!(catalog.find_by_name("python").is_none());
    }
}
