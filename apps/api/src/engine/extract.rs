//! Factor extraction — pulls one raw numeric signal out of a record.
//!
//! Extraction is declarative: a rubric names what to read, this module reads
//! it. `None` means Missing (the attribute is absent or wrongly typed),
//! which downstream normalization treats differently from a low value.

use chrono::NaiveDate;

use crate::engine::record::ScorableRecord;

/// How to derive one factor's raw value from a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// Numeric attribute read as-is.
    Number(String),
    /// Boolean attribute mapped to 1.0 / 0.0.
    Flag(String),
    /// Length of a tag-array attribute.
    TagCount(String),
    /// Whole days between a date attribute and `as_of`. Future dates clamp
    /// to 0 rather than going negative.
    DaysSince(String),
    /// Sum of the named numeric attributes. Missing only when none of them
    /// is present, so `base + bonus` still works with bonus absent.
    Sum(Vec<String>),
    /// Fraction (0.0–1.0) of `targets` found in the record's tag array.
    /// Matching is case-insensitive.
    TagOverlap { attr: String, targets: Vec<String> },
}

/// Extracts the raw value for one factor. Pure; never panics on a
/// well-formed record.
pub fn extract(record: &ScorableRecord, extraction: &Extraction, as_of: NaiveDate) -> Option<f64> {
    match extraction {
        Extraction::Number(attr) => record.number(attr),
        Extraction::Flag(attr) => record.flag(attr).map(|b| if b { 1.0 } else { 0.0 }),
        Extraction::TagCount(attr) => record.tags(attr).map(|t| t.len() as f64),
        Extraction::DaysSince(attr) => record
            .date(attr)
            .map(|d| (as_of - d).num_days().max(0) as f64),
        Extraction::Sum(attrs) => {
            let present: Vec<f64> = attrs.iter().filter_map(|a| record.number(a)).collect();
            if present.is_empty() {
                None
            } else {
                Some(present.iter().sum())
            }
        }
        Extraction::TagOverlap { attr, targets } => {
            let tags = record.tags(attr)?;
            if targets.is_empty() {
                // Vacuous overlap; rubric validation rejects this before
                // any scoring call can reach here.
                return None;
            }
            let tags_lower: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();
            let hits = targets
                .iter()
                .filter(|t| tags_lower.contains(&t.to_lowercase()))
                .count();
            Some(hits as f64 / targets.len() as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    #[test]
    fn test_number_extraction() {
        let record = ScorableRecord::new("r").with_number("pto_days", 25.0);
        assert_eq!(
            extract(&record, &Extraction::Number("pto_days".into()), as_of()),
            Some(25.0)
        );
    }

    #[test]
    fn test_absent_attribute_is_missing_not_zero() {
        let record = ScorableRecord::new("r");
        assert_eq!(
            extract(&record, &Extraction::Number("equity".into()), as_of()),
            None
        );
    }

    #[test]
    fn test_wrong_type_is_missing() {
        let record = ScorableRecord::new("r").with_text("equity", "10k");
        assert_eq!(
            extract(&record, &Extraction::Number("equity".into()), as_of()),
            None
        );
    }

    #[test]
    fn test_flag_maps_to_unit_interval() {
        let record = ScorableRecord::new("r").with_bool("remote", true);
        assert_eq!(
            extract(&record, &Extraction::Flag("remote".into()), as_of()),
            Some(1.0)
        );
    }

    #[test]
    fn test_tag_count_is_array_length() {
        let record = ScorableRecord::new("r")
            .with_tags("benefits", vec!["401k".into(), "dental".into()]);
        assert_eq!(
            extract(&record, &Extraction::TagCount("benefits".into()), as_of()),
            Some(2.0)
        );
    }

    #[test]
    fn test_days_since_counts_whole_days() {
        let record = ScorableRecord::new("r")
            .with_date("last_contact", NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(
            extract(
                &record,
                &Extraction::DaysSince("last_contact".into()),
                as_of()
            ),
            Some(30.0)
        );
    }

    #[test]
    fn test_days_since_future_date_clamps_to_zero() {
        let record = ScorableRecord::new("r")
            .with_date("last_contact", NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
        assert_eq!(
            extract(
                &record,
                &Extraction::DaysSince("last_contact".into()),
                as_of()
            ),
            Some(0.0)
        );
    }

    #[test]
    fn test_sum_ignores_absent_components() {
        let record = ScorableRecord::new("r").with_number("base", 140000.0);
        let extraction = Extraction::Sum(vec!["base".into(), "bonus".into()]);
        assert_eq!(extract(&record, &extraction, as_of()), Some(140000.0));
    }

    #[test]
    fn test_sum_all_absent_is_missing() {
        let record = ScorableRecord::new("r");
        let extraction = Extraction::Sum(vec!["base".into(), "bonus".into()]);
        assert_eq!(extract(&record, &extraction, as_of()), None);
    }

    #[test]
    fn test_tag_overlap_is_case_insensitive_fraction() {
        let record = ScorableRecord::new("r")
            .with_tags("tags", vec!["Rust".into(), "backend".into()]);
        let extraction = Extraction::TagOverlap {
            attr: "tags".into(),
            targets: vec!["rust".into(), "frontend".into()],
        };
        assert_eq!(extract(&record, &extraction, as_of()), Some(0.5));
    }

    #[test]
    fn test_tag_overlap_missing_tags_attr() {
        let record = ScorableRecord::new("r");
        let extraction = Extraction::TagOverlap {
            attr: "tags".into(),
            targets: vec!["rust".into()],
        };
        assert_eq!(extract(&record, &extraction, as_of()), None);
    }
}
