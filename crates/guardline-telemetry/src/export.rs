//! Export for compliance reporting
//!
//! Renders analysis history and retention records to JSON or CSV strings.
//! Set-typed columns are joined with `;` in CSV output.

use guardline_core::{Analysis, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::retention::RetentionRecord;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Pretty-printed JSON array
    Json,
    /// CSV with a header row
    Csv,
}

/// Render analyses in the requested format
pub fn export_analyses(analyses: &[Analysis], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(analyses)?),
        ExportFormat::Csv => {
            let mut out = String::new();
            let _ = writeln!(
                out,
                "message_hash,is_safe,risk_level,confidence,categories,keywords,patterns,ml_score,duration_us,created_at"
            );

            for analysis in analyses {
                let categories = analysis
                    .categories
                    .iter()
                    .map(|c| c.label())
                    .collect::<Vec<_>>()
                    .join(";");
                let keywords = join_csv_safe(analysis.keywords_matched.iter());
                let patterns = join_csv_safe(analysis.patterns_matched.iter());

                let _ = writeln!(
                    out,
                    "{},{},{},{:.4},{},{},{},{:.4},{},{}",
                    analysis.message_hash,
                    analysis.is_safe,
                    analysis.risk_level.label(),
                    analysis.confidence,
                    categories,
                    keywords,
                    patterns,
                    analysis.ml_score,
                    analysis.analysis_duration_us,
                    analysis.created_at.to_rfc3339(),
                );
            }
            Ok(out)
        }
    }
}

/// Render retention records in the requested format
pub fn export_retention(records: &[RetentionRecord], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        ExportFormat::Csv => {
            let mut out = String::new();
            let _ = writeln!(
                out,
                "id,content_hash,user_id,risk_level,categories,flagged_at,review_status,auto_delete_after"
            );

            for record in records {
                let categories = record
                    .categories
                    .iter()
                    .map(|c| c.label())
                    .collect::<Vec<_>>()
                    .join(";");

                let _ = writeln!(
                    out,
                    "{},{},{},{},{},{},{:?},{}",
                    record.id,
                    record.content_hash,
                    record.user_id.as_deref().unwrap_or(""),
                    record.risk_level.label(),
                    categories,
                    record.flagged_at.to_rfc3339(),
                    record.review_status,
                    record.auto_delete_after.to_rfc3339(),
                );
            }
            Ok(out)
        }
    }
}

fn join_csv_safe<'a>(items: impl Iterator<Item = &'a String>) -> String {
    items
        .map(|s| s.replace(',', ";"))
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use guardline_core::{Category, Severity};

    fn analysis() -> Analysis {
        Analysis {
            message_hash: "cafe".to_string(),
            is_safe: false,
            risk_level: Severity::High,
            confidence: 0.85,
            categories: [Category::Dangerous].into_iter().collect(),
            keywords_matched: ["make a bomb".to_string()].into_iter().collect(),
            patterns_matched: Default::default(),
            ml_score: 0.83,
            analysis_duration_us: 120,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_json_export_round_trips() {
        let json = export_analyses(&[analysis()], ExportFormat::Json).unwrap();
        let back: Vec<Analysis> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].message_hash, "cafe");
    }

    #[test]
    fn test_csv_export_has_header_and_rows() {
        let csv = export_analyses(&[analysis()], ExportFormat::Csv).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("message_hash,"));
        assert!(lines[1].contains("dangerous"));
        assert!(lines[1].contains("cafe"));
    }

    #[test]
    fn test_csv_escapes_commas_in_keywords() {
        let mut a = analysis();
        a.keywords_matched = ["one, two".to_string()].into_iter().collect();

        let csv = export_analyses(&[a], ExportFormat::Csv).unwrap();
        // Each data row keeps a stable column count
        let header_cols = csv.lines().next().unwrap().split(',').count();
        let row_cols = csv.lines().nth(1).unwrap().split(',').count();
        assert_eq!(header_cols, row_cols);
    }

    #[test]
    fn test_format_serde() {
        assert_eq!(
            serde_json::from_str::<ExportFormat>("\"csv\"").unwrap(),
            ExportFormat::Csv
        );
        assert_eq!(
            serde_json::from_str::<ExportFormat>("\"json\"").unwrap(),
            ExportFormat::Json
        );
    }
}
