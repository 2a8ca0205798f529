use std::collections::BTreeMap;

use super::document::{Document, DocumentContent, DocumentSet, DocumentSlot};

pub const VALID_MESSAGE: &str = "document valid";
pub const UNKNOWN_TYPE_MESSAGE: &str = "unknown document type";

/// Structural gate over one assessment session's documents.
///
/// Owns its slot registry: each call to [`DocumentValidator::validate`] overwrites the slots
/// it receives content for and leaves the others untouched.
#[derive(Debug, Clone, Default)]
pub struct DocumentValidator {
    documents: DocumentSet,
}

impl DocumentValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a custom registry instead of the five standard slots.
    pub fn with_documents(documents: DocumentSet) -> Self {
        Self { documents }
    }

    pub fn documents(&self) -> &DocumentSet {
        &self.documents
    }

    pub fn into_documents(self) -> DocumentSet {
        self.documents
    }

    /// Records submitted content per slot key and re-validates those slots.
    ///
    /// Keys that do not name a slot are ignored.
    pub fn validate(&mut self, provided: &BTreeMap<String, DocumentContent>) -> &DocumentSet {
        for (key, content) in provided {
            let Some(slot) = DocumentSlot::from_key(key) else {
                tracing::debug!(key = %key, "ignoring submission for unknown document slot");
                continue;
            };
            let Some(doc) = self.documents.get_mut(slot) else {
                continue;
            };
            doc.provided = true;
            doc.content = content.clone();
            let (status, message) = check_document(doc);
            if !status {
                tracing::debug!(slot = %slot, %message, "document failed validation");
            }
            doc.validation_status = status;
            doc.validation_message = message;
        }
        &self.documents
    }
}

/// Required-field check for a document's declared type.
pub fn check_document(document: &Document) -> (bool, String) {
    match document.kind.required_fields() {
        Some(fields) => check_required_fields(&document.content, fields),
        None => (false, UNKNOWN_TYPE_MESSAGE.to_string()),
    }
}

fn check_required_fields(content: &DocumentContent, fields: &[&str]) -> (bool, String) {
    let missing: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|f| !content.contains(f))
        .collect();
    if missing.is_empty() {
        (true, VALID_MESSAGE.to_string())
    } else {
        (false, format!("missing fields: {}", missing.join(", ")))
    }
}
