use crate::modules::collection::traits::{DocumentOperation, DocumentRecord, Filter};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/documents`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest<'a> {
    pub operation: DocumentOperation,
    pub collection_path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<&'a Value>,
    pub filters: &'a [Filter],
}

/// Reply for `get` (documents) and `add` (id)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyResponse {
    #[serde(default)]
    pub documents: Option<Vec<DocumentRecord>>,
    #[serde(default)]
    pub id: Option<String>,
}
