//! Best-effort field extraction from document text
//!
//! Walks the rule table against the full document text. Extraction is a pure
//! function of the text and the rules: the same input always yields the same
//! filled template.

use regex::RegexBuilder;

use crate::convert::rules::TAX_TEMPLATE;
use crate::convert::schema::{ExtractedField, FieldKind, FieldValue};
use crate::error::{FiscusError, Result};

/// Fill the tax-return template from raw document text
///
/// For each field, patterns are tried in order and the first match wins.
/// Fields with no matching pattern keep their defaults. Unparseable dollar
/// amounts are skipped, never fatal.
///
/// # Errors
///
/// Returns [`FiscusError::EmptyDocument`] when the text is empty or
/// whitespace-only, so callers can tell "nothing extractable" apart from a
/// document that simply matched no rules.
pub fn extract(text: &str) -> Result<Vec<ExtractedField>> {
    if text.trim().is_empty() {
        return Err(FiscusError::EmptyDocument.into());
    }

    let mut fields = Vec::with_capacity(TAX_TEMPLATE.len());
    for rule in TAX_TEMPLATE {
        let value = match rule.kind {
            FieldKind::Text => FieldValue::Text(find_text(text, rule.patterns)?),
            FieldKind::Amount => FieldValue::Amount(find_amount(text, rule.patterns)?),
        };
        fields.push(ExtractedField {
            section: rule.section,
            field: rule.field,
            value,
        });
    }

    Ok(fields)
}

/// Search for the first matching pattern, return the trimmed capture group
fn find_text(text: &str, patterns: &[&str]) -> Result<String> {
    for pattern in patterns {
        let re = compile(pattern)?;
        if let Some(m) = re.captures(text).and_then(|caps| caps.get(1)) {
            return Ok(m.as_str().trim().to_string());
        }
    }
    Ok(String::new())
}

/// Search for a dollar amount near a keyword, return it as a float
///
/// Thousands separators and currency symbols are stripped before parsing.
/// A capture that fails to parse falls through to the next pattern.
fn find_amount(text: &str, patterns: &[&str]) -> Result<f64> {
    for pattern in patterns {
        let re = compile(pattern)?;
        if let Some(m) = re.captures(text).and_then(|caps| caps.get(1)) {
            let raw = m.as_str().replace(',', "").replace('$', "");
            if let Ok(value) = raw.trim().parse::<f64>() {
                return Ok(value);
            }
        }
    }
    Ok(0.0)
}

fn compile(pattern: &str) -> Result<regex::Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| {
            FiscusError::Document(format!("Invalid extraction pattern '{}': {}", pattern, e))
                .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of<'a>(fields: &'a [ExtractedField], field: &str) -> &'a FieldValue {
        &fields
            .iter()
            .find(|f| f.field == field)
            .unwrap_or_else(|| panic!("field {} missing", field))
            .value
    }

    fn filled_count(fields: &[ExtractedField]) -> usize {
        fields.iter().filter(|f| !f.value.is_default()).count()
    }

    #[test]
    fn test_extract_empty_text_is_an_error() {
        let result = extract("");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("No text could be extracted"));
    }

    #[test]
    fn test_extract_whitespace_only_text_is_an_error() {
        assert!(extract("   \n\t  \n").is_err());
    }

    #[test]
    fn test_extract_unrecognized_text_keeps_all_defaults() {
        let fields = extract("The quick brown fox jumps over the lazy dog").unwrap();
        assert_eq!(fields.len(), 26);
        assert_eq!(filled_count(&fields), 0);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let text = "Taxpayer: Jane Doe\nWages: $88,200.50\nTax Year: 2024";
        let first = extract(text).unwrap();
        let second = extract(text).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_wages_and_filing_status() {
        let fields = extract("Wages: $55,000.00, Filing Status: Single").unwrap();

        assert_eq!(value_of(&fields, "W-2 Wages"), &FieldValue::Amount(55000.0));
        assert_eq!(
            value_of(&fields, "Filing Status"),
            &FieldValue::Text("Single".to_string())
        );
        assert_eq!(filled_count(&fields), 2);
    }

    #[test]
    fn test_extract_full_name_and_ssn() {
        let text = "Name: John Q Public\nSSN: xxx-xx-4321";
        let fields = extract(text).unwrap();

        assert_eq!(
            value_of(&fields, "Full Name"),
            &FieldValue::Text("John Q Public".to_string())
        );
        assert_eq!(
            value_of(&fields, "SSN (last 4 digits)"),
            &FieldValue::Text("4321".to_string())
        );
    }

    #[test]
    fn test_extract_matching_is_case_insensitive() {
        let fields = extract("FILING STATUS: Head of Household").unwrap();
        assert_eq!(
            value_of(&fields, "Filing Status"),
            &FieldValue::Text("Head of Household".to_string())
        );
    }

    #[test]
    fn test_extract_tax_year_falls_back_to_bare_year() {
        let fields = extract("Return prepared in 2023 for review").unwrap();
        assert_eq!(
            value_of(&fields, "Tax Year"),
            &FieldValue::Text("2023".to_string())
        );
    }

    #[test]
    fn test_extract_first_pattern_wins() {
        // Both the explicit label and a bare year are present; the explicit
        // label's pattern is listed first.
        let fields = extract("Issued 2020. Tax Year: 2024").unwrap();
        assert_eq!(
            value_of(&fields, "Tax Year"),
            &FieldValue::Text("2024".to_string())
        );
    }

    #[test]
    fn test_extract_amount_strips_separators_and_currency() {
        let fields = extract("Mortgage Interest paid: $12,345.67").unwrap();
        assert_eq!(
            value_of(&fields, "Mortgage Interest"),
            &FieldValue::Amount(12345.67)
        );
    }

    #[test]
    fn test_extract_unparseable_amount_falls_through_to_next_pattern() {
        // The wages pattern captures only commas, which cannot parse; the
        // W-2 pattern then supplies the value.
        let fields = extract("wages ,, w2 $500").unwrap();
        assert_eq!(value_of(&fields, "W-2 Wages"), &FieldValue::Amount(500.0));
    }

    #[test]
    fn test_extract_deduction_type() {
        let fields = extract("Claimed the Standard Deduction this year").unwrap();
        assert_eq!(
            value_of(&fields, "Deduction Type"),
            &FieldValue::Text("Standard".to_string())
        );
    }

    #[test]
    fn test_extract_refund_amount() {
        let fields = extract("Refund expected: $1,250").unwrap();
        assert_eq!(
            value_of(&fields, "Refund / Amount Due"),
            &FieldValue::Amount(1250.0)
        );
    }

    #[test]
    fn test_extract_manual_fields_stay_default() {
        let text = "Other Income: $900\nOther Deductions: $800\nTotal Deductions: $700";
        let fields = extract(text).unwrap();
        assert_eq!(value_of(&fields, "Other Income"), &FieldValue::Amount(0.0));
        assert_eq!(
            value_of(&fields, "Other Deductions"),
            &FieldValue::Amount(0.0)
        );
        assert_eq!(
            value_of(&fields, "Total Deductions"),
            &FieldValue::Amount(0.0)
        );
    }

    #[test]
    fn test_extract_w2_form_sample() {
        let text = "\
            Form W-2 Wage and Tax Statement\n\
            Tax Year: 2024\n\
            Employee name: Ada Lovelace\n\
            Wages and tips: $88,200.00\n\
            Federal income tax withheld: $9,460.00\n\
            Filing Status: Married Filing Jointly\n";
        let fields = extract(text).unwrap();

        assert_eq!(
            value_of(&fields, "Tax Year"),
            &FieldValue::Text("2024".to_string())
        );
        assert_eq!(value_of(&fields, "W-2 Wages"), &FieldValue::Amount(88200.0));
        assert_eq!(
            value_of(&fields, "Taxes Already Paid (W-2 withholding)"),
            &FieldValue::Amount(9460.0)
        );
        assert_eq!(
            value_of(&fields, "Filing Status"),
            &FieldValue::Text("Married Filing Jointly".to_string())
        );
    }
}
