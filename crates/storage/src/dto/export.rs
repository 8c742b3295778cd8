use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A printable document made of titled tables, ready for a PDF or print renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExportDocument {
    pub title: String,
    pub subtitle: Option<String>,
    pub note: Option<String>,
    pub file_name: String,
    pub sections: Vec<ExportSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExportSection {
    pub heading: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}
