//! Borrower documentation: typed slots, submitted content, and the validation gate.
//!
//! - `document`: [`Document`], [`DocumentSet`], [`DocumentContent`], and slot/type enums,
//! - `validation`: [`DocumentValidator`], the per-session registry that checks each
//!   document's required-field list.

pub mod document;
pub mod validation;

pub use document::{
    Document, DocumentContent, DocumentKind, DocumentSet, DocumentSlot, FieldValue,
};
pub use validation::{DocumentValidator, UNKNOWN_TYPE_MESSAGE, VALID_MESSAGE, check_document};
