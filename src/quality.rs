// ✅ Data Quality - Non-blocking anomaly flags
// None of these block form generation; the engine makes its best
// deterministic choice and records what it saw.

use crate::address::NormalizedAddress;
use crate::record::EntityRecord;
use crate::resolver::has_valid_ssn;
use crate::stakeholders::StakeholderGraph;
use serde::{Deserialize, Serialize};

// ============================================================================
// ISSUES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Data is questionable or incomplete.
    Warning,
    /// Data is valid but could be improved.
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityIssue {
    pub severity: Severity,
    pub field: String,
    pub issue: String,
    pub recommendation: String,
}

/// Per-entity anomaly report, generated alongside the form bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub company_name: String,
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    pub fn has_warnings(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Warning)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} issue(s), {} warning(s)",
            self.issues.len(),
            self.issues
                .iter()
                .filter(|i| i.severity == Severity::Warning)
                .count()
        )
    }
}

// ============================================================================
// ASSESSMENT
// ============================================================================

/// Tolerance for the ownership-sums-to-100 check.
const OWNERSHIP_SUM_TOLERANCE: f64 = 0.5;

/// Inspect the record and graph for data-quality anomalies. Logged and
/// reported, never blocking.
pub fn assess(
    record: &EntityRecord,
    graph: &StakeholderGraph,
    company_address: &NormalizedAddress,
) -> QualityReport {
    let mut issues = Vec::new();

    if record.entity_type.is_corp() {
        for officer in &graph.officers {
            if officer.officer_title.trim().is_empty() {
                issues.push(QualityIssue {
                    severity: Severity::Warning,
                    field: format!("Officer {} Title", officer.slot),
                    issue: format!("officer {:?} has no title", officer.name),
                    recommendation: "Add the officer's title; corp forms require one".to_string(),
                });
            }
        }
    }

    if company_address.is_unparsed() {
        issues.push(QualityIssue {
            severity: Severity::Warning,
            field: "Company Address".to_string(),
            issue: "address could not be split into city/state/zip".to_string(),
            recommendation: "Use 'street, city, ST zip' format".to_string(),
        });
    }

    if !graph.owners.is_empty() {
        let total = graph.total_ownership();
        if (total - 100.0).abs() > OWNERSHIP_SUM_TOLERANCE {
            issues.push(QualityIssue {
                severity: Severity::Warning,
                field: "Ownership".to_string(),
                issue: format!("ownership percentages sum to {total:.2}, expected 100"),
                recommendation: "Check each owner's ownership percentage".to_string(),
            });
        }
    }

    for owner in &graph.owners {
        if !has_valid_ssn(&owner.ssn) {
            issues.push(QualityIssue {
                severity: Severity::Info,
                field: format!("Owner {} SSN", owner.slot),
                issue: format!("owner {:?} has no usable SSN", owner.name),
                recommendation: "Foreign owners are annotated with the N/A-FOREIGN marker"
                    .to_string(),
            });
        }
    }

    for issue in issues.iter().filter(|i| i.severity == Severity::Warning) {
        tracing::warn!(field = %issue.field, issue = %issue.issue, "data quality anomaly");
    }

    QualityReport {
        company_name: record.company_name.clone(),
        issues,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::parse_address;
    use serde_json::json;

    fn assess_record(value: serde_json::Value) -> QualityReport {
        let record = EntityRecord::from_json(&value).unwrap();
        let graph = StakeholderGraph::from_record(&record);
        let addr = parse_address(&record.company_address);
        assess(&record, &graph, &addr)
    }

    #[test]
    fn test_clean_record_has_no_warnings() {
        let report = assess_record(json!({
            "Entity Type": "LLC",
            "Company Name": "Acme LLC",
            "Company Address": "123 Main St, Miami, FL 33101",
            "Owner 1 Name": "Jane Roe",
            "Owner 1 SSN": "111-11-1111",
            "Owner 1 Ownership": 100,
        }));
        assert!(!report.has_warnings());
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_missing_officer_title_is_flagged() {
        let report = assess_record(json!({
            "Entity Type": "C-Corp",
            "Company Name": "Acme Inc",
            "Company Address": "123 Main St, Miami, FL 33101",
            "Officer 1 Name": "Jane Roe",
            "Officer 1 SSN": "111-11-1111",
        }));
        assert!(report.has_warnings());
        assert!(report.issues.iter().any(|i| i.field == "Officer 1 Title"));
    }

    #[test]
    fn test_ownership_sum_mismatch_is_flagged() {
        let report = assess_record(json!({
            "Entity Type": "LLC",
            "Company Name": "Acme LLC",
            "Company Address": "123 Main St, Miami, FL 33101",
            "Owner 1 Name": "Jane Roe",
            "Owner 1 SSN": "111-11-1111",
            "Owner 1 Ownership": 60,
            "Owner 2 Name": "John Doe",
            "Owner 2 SSN": "222-22-2222",
            "Owner 2 Ownership": 30,
        }));
        assert!(report.issues.iter().any(|i| i.field == "Ownership"));
    }

    #[test]
    fn test_unparseable_address_is_flagged() {
        let report = assess_record(json!({
            "Entity Type": "LLC",
            "Company Name": "Acme LLC",
            "Company Address": "Calle 50, Ciudad de Panama, Panama",
            "Owner 1 Name": "Jane Roe",
            "Owner 1 SSN": "111-11-1111",
            "Owner 1 Ownership": 100,
        }));
        assert!(report.issues.iter().any(|i| i.field == "Company Address"));
    }
}
