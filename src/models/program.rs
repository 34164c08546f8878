use serde::Serialize;

/// A study program from the catalog
///
/// Built once at artifact load time and immutable afterwards. The combined
/// `text` field is the lowercase concatenation of name, description and tags,
/// used for lexical matching by the explanation generator.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Program {
    /// Unique identifier for the program
    #[serde(rename = "program_id")]
    pub id: String,
    /// Display name of the program
    pub name: String,
    /// Long-form description
    pub description: String,
    /// Comma-separated skill tags, surfaced to clients as "skills"
    pub tags_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    /// Combined lowercase text for lexical matching
    #[serde(skip)]
    pub text: String,
}

impl Program {
    /// Creates a program and derives its combined lowercase text
    pub fn new(id: String, name: String, description: String, tags_text: String) -> Self {
        let text = format!("{} {} {}", name, description, tags_text).to_lowercase();
        Self {
            id,
            name,
            description,
            tags_text,
            url: None,
            rating: None,
            text,
        }
    }
}
