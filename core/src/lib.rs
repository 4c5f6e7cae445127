pub mod catalog;
pub mod duration;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod ranker;
pub mod tokenizer;
pub mod vectorizer;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::Deserialize;

pub use catalog::Catalog;
pub use engine::{RecommendOptions, Recommender};
pub use error::{CatalogLoadError, EvaluationError, InvalidInputError};
pub use vectorizer::{SparseVector, Vectorizer, Vocabulary};

pub type TermId = u32;
pub type DocId = u32;

/// Opaque metadata carried alongside an assessment (duration, test type, url, ...).
pub type Attributes = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
pub struct Assessment {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub attributes: Attributes,
}

/// A scored catalog entry. Borrows the assessment from the catalog it was ranked against.
#[derive(Debug, Clone, Copy)]
pub struct Recommendation<'a> {
    pub assessment: &'a Assessment,
    pub score: f32, // cosine similarity in [0, 1]
}

impl Serialize for Recommendation<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Recommendation", 5)?;
        s.serialize_field("assessment_id", &self.assessment.id)?;
        s.serialize_field("name", &self.assessment.name)?;
        s.serialize_field("description", &self.assessment.description)?;
        s.serialize_field("attributes", &self.assessment.attributes)?;
        s.serialize_field("score", &self.score)?;
        s.end()
    }
}
