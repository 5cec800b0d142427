use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The four operations the document proxy understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentOperation {
    Get,
    Add,
    Update,
    Delete,
}

impl fmt::Display for DocumentOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentOperation::Get => "get",
            DocumentOperation::Add => "add",
            DocumentOperation::Update => "update",
            DocumentOperation::Delete => "delete",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
}

/// A `where` clause applied to a `get`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            op: FilterOp::Equal,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentRequest {
    pub document_id: Option<String>,
    pub data: Option<Value>,
    pub filters: Vec<Filter>,
}

impl DocumentRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = Some(document_id.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Check the fields `operation` needs are present
    pub fn validate_for(&self, operation: DocumentOperation) -> AppResult<()> {
        let needs_id = matches!(
            operation,
            DocumentOperation::Update | DocumentOperation::Delete
        );
        let needs_data = matches!(operation, DocumentOperation::Add | DocumentOperation::Update);

        if needs_id && self.document_id.as_deref().map_or(true, str::is_empty) {
            return Err(AppError::InvalidInput(format!(
                "Document {} requires a document id",
                operation
            )));
        }
        if needs_data && !matches!(self.data, Some(Value::Object(_))) {
            return Err(AppError::InvalidInput(format!(
                "Document {} requires an object body",
                operation
            )));
        }
        Ok(())
    }
}

/// A stored document: its id plus its fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentResult {
    Records(Vec<DocumentRecord>),
    DocumentId(String),
    Empty,
}

impl DocumentResult {
    pub fn into_records(self) -> AppResult<Vec<DocumentRecord>> {
        match self {
            DocumentResult::Records(records) => Ok(records),
            other => Err(AppError::InternalError(format!(
                "Expected records from document store, got {:?}",
                other
            ))),
        }
    }

    pub fn into_document_id(self) -> AppResult<String> {
        match self {
            DocumentResult::DocumentId(id) => Ok(id),
            other => Err(AppError::InternalError(format!(
                "Expected a document id from document store, got {:?}",
                other
            ))),
        }
    }
}

/// Per-user document storage.
///
/// `collection_path` is relative to the signed-in user's namespace.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn perform_operation(
        &self,
        operation: DocumentOperation,
        collection_path: &str,
        request: DocumentRequest,
    ) -> AppResult<DocumentResult>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_requirements() {
        let bare = DocumentRequest::new();
        assert!(bare.validate_for(DocumentOperation::Get).is_ok());
        assert!(bare.validate_for(DocumentOperation::Delete).is_err());
        assert!(bare.validate_for(DocumentOperation::Add).is_err());

        let add = DocumentRequest::new().with_data(json!({ "title": "Mushishi" }));
        assert!(add.validate_for(DocumentOperation::Add).is_ok());
        assert!(add.validate_for(DocumentOperation::Update).is_err());

        let scalar = DocumentRequest::new().with_data(json!(3));
        assert!(scalar.validate_for(DocumentOperation::Add).is_err());
    }

    #[test]
    fn test_filter_wire_format() {
        let filter = Filter::eq("status", "watching");
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({ "field": "status", "op": "==", "value": "watching" })
        );
    }

    #[test]
    fn test_record_flattens_fields() {
        let record: DocumentRecord =
            serde_json::from_value(json!({ "id": "abc", "animeId": 5, "title": "Ping Pong" }))
                .unwrap();
        assert_eq!(record.id, "abc");
        assert_eq!(record.data["animeId"], json!(5));
        assert!(!record.data.contains_key("id"));
    }
}
