use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{RiskError, RiskResult};

/// A single field value extracted from a borrower document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Field name to value mapping of one submitted document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentContent(BTreeMap<String, FieldValue>);

impl DocumentContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric field, `0.0` when absent. Numeric text is accepted.
    pub(crate) fn number_or_zero(&self, document: &str, field: &str) -> RiskResult<f64> {
        let invalid = |reason: String| RiskError::InvalidField {
            document: document.to_string(),
            field: field.to_string(),
            reason,
        };
        let value = match self.0.get(field) {
            None => return Ok(0.0),
            Some(FieldValue::Number(v)) => *v,
            Some(FieldValue::Text(s)) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| invalid(format!("expected a number, got '{s}'")))?,
            Some(FieldValue::Flag(b)) => return Err(invalid(format!("expected a number, got {b}"))),
        };
        if !value.is_finite() {
            return Err(invalid(format!("expected a finite number, got {value}")));
        }
        Ok(value)
    }

    /// [`Self::number_or_zero`] for quantities that cannot be negative.
    pub(crate) fn non_negative_or_zero(&self, document: &str, field: &str) -> RiskResult<f64> {
        let value = self.number_or_zero(document, field)?;
        if value < 0.0 {
            return Err(RiskError::InvalidField {
                document: document.to_string(),
                field: field.to_string(),
                reason: format!("must be >= 0, got {value}"),
            });
        }
        Ok(value)
    }

    /// Text field, `""` when absent or not text.
    pub(crate) fn text_or_empty(&self, field: &str) -> &str {
        match self.0.get(field) {
            Some(FieldValue::Text(s)) => s,
            _ => "",
        }
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for DocumentContent {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Document type, which selects the required-field list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentKind {
    Financial,
    Income,
    Employment,
    Credit,
    Property,
    Unknown(String),
}

impl DocumentKind {
    /// Fields that must all be present for a document of this kind to validate.
    pub fn required_fields(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Financial => Some(&["assets", "liabilities", "revenue", "profit"]),
            Self::Income => Some(&["monthly_income", "employment_period", "position"]),
            Self::Employment => Some(&["contract_type", "start_date", "salary"]),
            Self::Credit => Some(&["credit_score", "payment_history", "active_loans"]),
            Self::Property => Some(&["property_value", "valuation_date", "property_type"]),
            Self::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Financial => "financial",
            Self::Income => "income",
            Self::Employment => "employment",
            Self::Credit => "credit",
            Self::Property => "property",
            Self::Unknown(s) => s,
        }
    }
}

impl From<String> for DocumentKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "financial" => Self::Financial,
            "income" => Self::Income,
            "employment" => Self::Employment,
            "credit" => Self::Credit,
            "property" => Self::Property,
            _ => Self::Unknown(value),
        }
    }
}

impl From<DocumentKind> for String {
    fn from(kind: DocumentKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One of the five fixed document slots of an assessment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSlot {
    FinancialStatement,
    IncomeStatement,
    EmploymentContract,
    CreditHistory,
    PropertyValuation,
}

impl DocumentSlot {
    pub const ALL: [Self; 5] = [
        Self::FinancialStatement,
        Self::IncomeStatement,
        Self::EmploymentContract,
        Self::CreditHistory,
        Self::PropertyValuation,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::FinancialStatement => "financial_statement",
            Self::IncomeStatement => "income_statement",
            Self::EmploymentContract => "employment_contract",
            Self::CreditHistory => "credit_history",
            Self::PropertyValuation => "property_valuation",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.key() == key)
    }

    /// Empty, unprovided document for this slot.
    pub fn blank_document(self) -> Document {
        match self {
            Self::FinancialStatement => {
                Document::new("Financial statement", DocumentKind::Financial, true)
            }
            Self::IncomeStatement => Document::new("Income certificate", DocumentKind::Income, true),
            Self::EmploymentContract => {
                Document::new("Employment contract", DocumentKind::Employment, true)
            }
            Self::CreditHistory => Document::new("Credit history", DocumentKind::Credit, true),
            Self::PropertyValuation => {
                Document::new("Property valuation", DocumentKind::Property, false)
            }
        }
    }
}

impl fmt::Display for DocumentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Display label, used when reporting missing documents.
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub content: DocumentContent,
    pub required: bool,
    pub provided: bool,
    pub validation_status: bool,
    pub validation_message: String,
}

impl Document {
    pub fn new(name: impl Into<String>, kind: DocumentKind, required: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            content: DocumentContent::new(),
            required,
            provided: false,
            validation_status: false,
            validation_message: String::new(),
        }
    }

    /// Whether this document blocks scoring.
    pub fn is_blocking(&self) -> bool {
        self.required && !(self.provided && self.validation_status)
    }
}

/// Registry of the assessment's document slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSet {
    slots: BTreeMap<DocumentSlot, Document>,
}

impl DocumentSet {
    /// All five slots, unprovided.
    pub fn standard() -> Self {
        Self {
            slots: DocumentSlot::ALL
                .into_iter()
                .map(|slot| (slot, slot.blank_document()))
                .collect(),
        }
    }

    pub fn get(&self, slot: DocumentSlot) -> Option<&Document> {
        self.slots.get(&slot)
    }

    pub(crate) fn get_mut(&mut self, slot: DocumentSlot) -> Option<&mut Document> {
        self.slots.get_mut(&slot)
    }

    /// Replaces the document definition held in a slot.
    pub fn set_slot(&mut self, slot: DocumentSlot, document: Document) {
        self.slots.insert(slot, document);
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocumentSlot, &Document)> {
        self.slots.iter().map(|(slot, doc)| (*slot, doc))
    }

    /// Content of a slot if the document was provided.
    pub fn provided_content(&self, slot: DocumentSlot) -> Option<&DocumentContent> {
        self.slots
            .get(&slot)
            .filter(|doc| doc.provided)
            .map(|doc| &doc.content)
    }

    /// Display names of required documents that are missing or failed validation.
    pub fn blocking_documents(&self) -> Vec<String> {
        self.slots
            .values()
            .filter(|doc| doc.is_blocking())
            .map(|doc| doc.name.clone())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.values().all(|doc| !doc.is_blocking())
    }
}

impl Default for DocumentSet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_set_has_four_required_slots() {
        let set = DocumentSet::standard();
        let required: Vec<_> = set
            .iter()
            .filter(|(_, doc)| doc.required)
            .map(|(slot, _)| slot)
            .collect();
        assert_eq!(required.len(), 4);
        assert!(!required.contains(&DocumentSlot::PropertyValuation));
        assert!(!set.is_complete());
        assert_eq!(set.blocking_documents().len(), 4);
    }

    #[test]
    fn numeric_fields_default_to_zero_and_accept_numeric_text() {
        let content = DocumentContent::new()
            .with("assets", 10.0)
            .with("revenue", "2500.5")
            .with("profit", "n/a");
        assert_eq!(content.number_or_zero("doc", "assets").unwrap(), 10.0);
        assert_eq!(content.number_or_zero("doc", "revenue").unwrap(), 2500.5);
        assert_eq!(content.number_or_zero("doc", "liabilities").unwrap(), 0.0);
        assert!(matches!(
            content.number_or_zero("doc", "profit"),
            Err(RiskError::InvalidField { .. })
        ));
    }

    #[test]
    fn non_negative_fields_reject_negative_values() {
        let content = DocumentContent::new()
            .with("assets", -1.0)
            .with("revenue", "-250")
            .with("liabilities", 0.0);
        for field in ["assets", "revenue"] {
            assert!(matches!(
                content.non_negative_or_zero("financial_statement", field),
                Err(RiskError::InvalidField { .. })
            ));
        }
        assert_eq!(content.non_negative_or_zero("doc", "liabilities").unwrap(), 0.0);
        assert_eq!(content.non_negative_or_zero("doc", "profit").unwrap(), 0.0);
    }

    #[test]
    fn content_deserializes_mixed_json() {
        let content: DocumentContent = serde_json::from_str(
            r#"{"contract_type": "permanent", "salary": 8000, "signed": true}"#,
        )
        .unwrap();
        assert_eq!(content.text_or_empty("contract_type"), "permanent");
        assert_eq!(content.get("salary"), Some(&FieldValue::Number(8000.0)));
        assert_eq!(content.get("signed"), Some(&FieldValue::Flag(true)));
    }

    #[test]
    fn slot_keys_round_trip() {
        for slot in DocumentSlot::ALL {
            assert_eq!(DocumentSlot::from_key(slot.key()), Some(slot));
        }
        assert_eq!(DocumentSlot::from_key("tax_return"), None);
    }
}
