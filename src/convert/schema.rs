//! Schema types for the tax-return extraction template
//!
//! The template is a fixed set of sections and typed fields. Extraction
//! fills values into this shape; the shape itself never changes between
//! documents.

use std::fmt;

/// Which kind of value a template field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, default empty string
    Text,
    /// Dollar amount, default zero
    Amount,
}

impl FieldKind {
    /// The default value for a field of this kind
    pub fn default_value(&self) -> FieldValue {
        match self {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Amount => FieldValue::Amount(0.0),
        }
    }
}

/// A typed value extracted for a single template field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Amount(f64),
}

impl FieldValue {
    /// Whether this value is still the schema default for its kind
    ///
    /// Fields at their default are reported as "left blank" in the
    /// extraction summary.
    pub fn is_default(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Amount(a) => *a == 0.0,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Amount(a) => write!(f, "{}", a),
        }
    }
}

/// One filled template slot, positioned by section and field name
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedField {
    pub section: &'static str,
    pub field: &'static str,
    pub value: FieldValue,
}
