//! In-memory document verification registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Verification status of a registered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Verified,
    Revoked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub status: DocumentStatus,
    pub description: String,
    pub verified_by: String,
}

/// Answer to a `verify_document` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub document_id: String,
    /// `verified`, `revoked` or `not_found`.
    pub status: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    pub verification_successful: bool,
}

/// One row of a `list_documents` answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub document_id: String,
    pub status: DocumentStatus,
    pub description: String,
}

/// Documents keyed by id, iterated in id order.
#[derive(Debug, Clone, Default)]
pub struct DocumentRegistry {
    documents: BTreeMap<String, DocumentRecord>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the demonstration documents.
    pub fn seeded() -> Self {
        let mut registry = Self::new();
        registry.insert(
            "DOC001",
            DocumentStatus::Verified,
            "Contract Agreement 2024",
            "Agent B",
        );
        registry.insert(
            "DOC002",
            DocumentStatus::Verified,
            "Financial Report Q4",
            "Agent B",
        );
        registry.insert(
            "DOC003",
            DocumentStatus::Revoked,
            "Outdated Policy Document",
            "Agent B",
        );
        registry
    }

    pub fn insert(
        &mut self,
        id: impl Into<String>,
        status: DocumentStatus,
        description: impl Into<String>,
        verified_by: impl Into<String>,
    ) {
        self.documents.insert(
            id.into(),
            DocumentRecord {
                status,
                description: description.into(),
                verified_by: verified_by.into(),
            },
        );
    }

    pub fn get(&self, id: &str) -> Option<&DocumentRecord> {
        self.documents.get(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Look up a document. Unknown ids produce a `not_found` result rather
    /// than an error.
    pub fn verify(&self, id: &str) -> VerificationResult {
        match self.documents.get(id) {
            Some(record) => VerificationResult {
                document_id: id.to_string(),
                status: status_str(record.status).to_string(),
                description: record.description.clone(),
                verified_by: Some(record.verified_by.clone()),
                verification_successful: true,
            },
            None => VerificationResult {
                document_id: id.to_string(),
                status: "not_found".to_string(),
                description: "Document not found in verification database".to_string(),
                verified_by: None,
                verification_successful: false,
            },
        }
    }

    pub fn list(&self) -> Vec<DocumentSummary> {
        self.documents
            .iter()
            .map(|(id, record)| DocumentSummary {
                document_id: id.clone(),
                status: record.status,
                description: record.description.clone(),
            })
            .collect()
    }
}

fn status_str(status: DocumentStatus) -> &'static str {
    match status {
        DocumentStatus::Verified => "verified",
        DocumentStatus::Revoked => "revoked",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seeded_contents() {
        let registry = DocumentRegistry::seeded();
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.get("DOC003").unwrap().status,
            DocumentStatus::Revoked
        );
    }

    #[test]
    fn test_verify_known_document() {
        let result = DocumentRegistry::seeded().verify("DOC001");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "document_id": "DOC001",
                "status": "verified",
                "description": "Contract Agreement 2024",
                "verified_by": "Agent B",
                "verification_successful": true
            })
        );
    }

    #[test]
    fn test_verify_revoked_document_still_succeeds() {
        let result = DocumentRegistry::seeded().verify("DOC003");
        assert_eq!(result.status, "revoked");
        assert!(result.verification_successful);
    }

    #[test]
    fn test_verify_unknown_document() {
        let result = DocumentRegistry::seeded().verify("DOC999");
        assert_eq!(result.status, "not_found");
        assert!(!result.verification_successful);

        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("verified_by").is_none());
    }

    #[test]
    fn test_list_in_id_order() {
        let mut registry = DocumentRegistry::seeded();
        registry.insert("A000", DocumentStatus::Verified, "First", "Agent C");

        let ids: Vec<_> = registry.list().into_iter().map(|d| d.document_id).collect();
        assert_eq!(ids, vec!["A000", "DOC001", "DOC002", "DOC003"]);
    }

    #[test]
    fn test_empty_registry() {
        let registry = DocumentRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.list().is_empty());
    }
}
