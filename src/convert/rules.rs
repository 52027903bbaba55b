//! Extraction rule table for the tax-return template
//!
//! Each row names a template slot and the ordered, case-insensitive patterns
//! used to find its value. Rules are data, not control flow: the extractor
//! walks this table with one generic engine. Rows with no patterns are never
//! matched and always keep their defaults.

use crate::convert::schema::FieldKind;

/// One row of the template: where the value lands and how to find it
#[derive(Debug)]
pub struct FieldRule {
    /// Section the field belongs to
    pub section: &'static str,
    /// Field name within the section
    pub field: &'static str,
    /// Value type, which also fixes the default
    pub kind: FieldKind,
    /// Patterns tried in order; the first match wins. Capture group 1 holds
    /// the raw value.
    pub patterns: &'static [&'static str],
}

/// The fixed tax-return template with its extraction rules.
///
/// Rows are grouped by section in export order. Edit the defaults and
/// patterns here to tune what the converter looks for.
pub const TAX_TEMPLATE: &[FieldRule] = &[
    // --- Personal Information ---
    FieldRule {
        section: "Personal Information",
        field: "Full Name",
        kind: FieldKind::Text,
        patterns: &[r"name[:\s]+([A-Za-z ,'-]+)", r"taxpayer[:\s]+([A-Za-z ,'-]+)"],
    },
    FieldRule {
        section: "Personal Information",
        field: "SSN (last 4 digits)",
        kind: FieldKind::Text,
        patterns: &[r"ssn.*?(\d{4})\b", r"social security.*?(\d{4})\b"],
    },
    FieldRule {
        section: "Personal Information",
        field: "Filing Status",
        kind: FieldKind::Text,
        patterns: &[
            r"filing status[:\s]+(\w[\w /]+)",
            r"(single|married filing jointly|married filing separately|head of household)",
        ],
    },
    FieldRule {
        section: "Personal Information",
        field: "Tax Year",
        kind: FieldKind::Text,
        patterns: &[r"tax year[:\s]+(\d{4})", r"\b(20\d{2})\b"],
    },
    // --- Income ---
    FieldRule {
        section: "Income",
        field: "W-2 Wages",
        kind: FieldKind::Amount,
        patterns: &[r"wages.*?\$?([\d,]+\.?\d*)", r"w-?2.*?\$?([\d,]+\.?\d*)"],
    },
    FieldRule {
        section: "Income",
        field: "Self-Employment / Freelance Income",
        kind: FieldKind::Amount,
        patterns: &[
            r"self.employ.*?\$?([\d,]+\.?\d*)",
            r"freelance.*?\$?([\d,]+\.?\d*)",
            r"1099.*?\$?([\d,]+\.?\d*)",
        ],
    },
    FieldRule {
        section: "Income",
        field: "Interest Income (1099-INT)",
        kind: FieldKind::Amount,
        patterns: &[
            r"interest income.*?\$?([\d,]+\.?\d*)",
            r"1099-int.*?\$?([\d,]+\.?\d*)",
        ],
    },
    FieldRule {
        section: "Income",
        field: "Dividend Income (1099-DIV)",
        kind: FieldKind::Amount,
        patterns: &[
            r"dividend.*?\$?([\d,]+\.?\d*)",
            r"1099-div.*?\$?([\d,]+\.?\d*)",
        ],
    },
    FieldRule {
        section: "Income",
        field: "Capital Gains / Losses",
        kind: FieldKind::Amount,
        patterns: &[r"capital gain.*?\$?([\d,]+\.?\d*)"],
    },
    FieldRule {
        section: "Income",
        field: "Other Income",
        kind: FieldKind::Amount,
        patterns: &[],
    },
    // --- Deductions ---
    FieldRule {
        section: "Deductions",
        field: "Deduction Type",
        kind: FieldKind::Text,
        patterns: &[r"(standard|itemized) deduction"],
    },
    FieldRule {
        section: "Deductions",
        field: "Mortgage Interest",
        kind: FieldKind::Amount,
        patterns: &[r"mortgage interest.*?\$?([\d,]+\.?\d*)"],
    },
    FieldRule {
        section: "Deductions",
        field: "Charitable Contributions",
        kind: FieldKind::Amount,
        patterns: &[r"charit.*?\$?([\d,]+\.?\d*)"],
    },
    FieldRule {
        section: "Deductions",
        field: "Medical Expenses",
        kind: FieldKind::Amount,
        patterns: &[r"medical.*?\$?([\d,]+\.?\d*)"],
    },
    FieldRule {
        section: "Deductions",
        field: "State & Local Taxes (SALT)",
        kind: FieldKind::Amount,
        patterns: &[
            r"salt.*?\$?([\d,]+\.?\d*)",
            r"state.*?local.*?tax.*?\$?([\d,]+\.?\d*)",
        ],
    },
    FieldRule {
        section: "Deductions",
        field: "Other Deductions",
        kind: FieldKind::Amount,
        patterns: &[],
    },
    // --- Tax Credits ---
    FieldRule {
        section: "Tax Credits",
        field: "Child Tax Credit",
        kind: FieldKind::Amount,
        patterns: &[r"child tax credit.*?\$?([\d,]+\.?\d*)"],
    },
    FieldRule {
        section: "Tax Credits",
        field: "Education Credit",
        kind: FieldKind::Amount,
        patterns: &[r"education credit.*?\$?([\d,]+\.?\d*)"],
    },
    FieldRule {
        section: "Tax Credits",
        field: "EV / Energy Credit",
        kind: FieldKind::Amount,
        patterns: &[r"(?:ev|electric vehicle|energy) credit.*?\$?([\d,]+\.?\d*)"],
    },
    FieldRule {
        section: "Tax Credits",
        field: "Other Credits",
        kind: FieldKind::Amount,
        patterns: &[],
    },
    // --- Summary ---
    FieldRule {
        section: "Summary",
        field: "Gross Income",
        kind: FieldKind::Amount,
        patterns: &[
            r"gross income.*?\$?([\d,]+\.?\d*)",
            r"total income.*?\$?([\d,]+\.?\d*)",
        ],
    },
    FieldRule {
        section: "Summary",
        field: "Total Deductions",
        kind: FieldKind::Amount,
        patterns: &[],
    },
    FieldRule {
        section: "Summary",
        field: "Taxable Income",
        kind: FieldKind::Amount,
        patterns: &[r"taxable income.*?\$?([\d,]+\.?\d*)"],
    },
    FieldRule {
        section: "Summary",
        field: "Estimated Tax Owed",
        kind: FieldKind::Amount,
        patterns: &[
            r"tax owed.*?\$?([\d,]+\.?\d*)",
            r"total tax.*?\$?([\d,]+\.?\d*)",
        ],
    },
    FieldRule {
        section: "Summary",
        field: "Taxes Already Paid (W-2 withholding)",
        kind: FieldKind::Amount,
        patterns: &[
            r"withhold.*?\$?([\d,]+\.?\d*)",
            r"federal.*?withheld.*?\$?([\d,]+\.?\d*)",
        ],
    },
    FieldRule {
        section: "Summary",
        field: "Refund / Amount Due",
        kind: FieldKind::Amount,
        patterns: &[
            r"refund.*?\$?([\d,]+\.?\d*)",
            r"amount due.*?\$?([\d,]+\.?\d*)",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;

    #[test]
    fn test_template_has_expected_shape() {
        assert_eq!(TAX_TEMPLATE.len(), 26);

        let mut sections = Vec::new();
        for rule in TAX_TEMPLATE {
            if sections.last() != Some(&rule.section) {
                sections.push(rule.section);
            }
        }
        assert_eq!(
            sections,
            vec![
                "Personal Information",
                "Income",
                "Deductions",
                "Tax Credits",
                "Summary"
            ]
        );
    }

    #[test]
    fn test_sections_are_contiguous() {
        // Export relies on rows being grouped by section.
        let mut seen = Vec::new();
        for rule in TAX_TEMPLATE {
            if seen.last() != Some(&rule.section) {
                assert!(
                    !seen.contains(&rule.section),
                    "section {} appears twice",
                    rule.section
                );
                seen.push(rule.section);
            }
        }
    }

    #[test]
    fn test_all_patterns_compile() {
        for rule in TAX_TEMPLATE {
            for pattern in rule.patterns {
                let result = RegexBuilder::new(pattern).case_insensitive(true).build();
                assert!(
                    result.is_ok(),
                    "pattern {:?} for {} > {} does not compile",
                    pattern,
                    rule.section,
                    rule.field
                );
            }
        }
    }

    #[test]
    fn test_field_names_are_unique_within_sections() {
        for (i, a) in TAX_TEMPLATE.iter().enumerate() {
            for b in &TAX_TEMPLATE[i + 1..] {
                assert!(
                    !(a.section == b.section && a.field == b.field),
                    "duplicate field {} > {}",
                    a.section,
                    a.field
                );
            }
        }
    }

    #[test]
    fn test_manual_fields_have_no_patterns() {
        // These totals are for the user to fill in, never extracted.
        let manual = ["Other Income", "Other Deductions", "Other Credits", "Total Deductions"];
        for rule in TAX_TEMPLATE {
            if manual.contains(&rule.field) {
                assert!(rule.patterns.is_empty(), "{} should have no patterns", rule.field);
            } else {
                assert!(!rule.patterns.is_empty(), "{} should have patterns", rule.field);
            }
        }
    }
}
