// 📋 Form Assembler - SS-4 / 2848 / 8821
// Composes the resolver, address normalizer and purpose pipeline outputs
// into the flat field sets the PDF renderer consumes. Key names are a
// byte-for-byte contract with that renderer. Assembly itself is
// side-effect-free; the purpose pipeline holds the only network step.

use crate::address::{parse_address, NormalizedAddress};
use crate::error::EngineError;
use crate::purpose::{derive_purpose, BusinessPurposeDerivative, PurposeCategory};
use crate::quality::{assess, QualityReport};
use crate::record::{EntityRecord, EntityType};
use crate::resolver::{resolve, ResolvedResponsibleParty};
use crate::stakeholders::StakeholderGraph;
use crate::summarizer::Summarizer;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// STATIC DESIGNEE BLOCK
// ============================================================================

// Fixed third-party designee / representative identity printed on every
// form. Part of the renderer contract.
const DESIGNEE_NAME: &str = "FORMATION FILINGS LLC";
const DESIGNEE_ADDRESS: &str = "100 SE 2ND ST, SUITE 2000, MIAMI, FL 33131";
const DESIGNEE_PHONE: &str = "(305) 555-0144";
const DESIGNEE_FAX: &str = "(305) 555-0145";
const DESIGNEE_CAF: &str = "0000-00000R";
const DESIGNEE_PTIN: &str = "P00000000";

/// Closing month of the accounting year written on SS-4 line 12.
const ACCOUNTING_YEAR_CLOSE: &str = "DECEMBER";

// ============================================================================
// FORM TYPES
// ============================================================================

/// The three IRS forms this engine fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormKind {
    /// SS-4: Application for Employer Identification Number.
    Ss4,
    /// 2848: Power of Attorney and Declaration of Representative.
    F2848,
    /// 8821: Tax Information Authorization.
    F8821,
}

impl FormKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::Ss4 => "SS-4",
            FormKind::F2848 => "2848",
            FormKind::F8821 => "8821",
        }
    }
}

/// One assembled form: a flat key → value map for the PDF renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembledForm {
    pub kind: FormKind,
    pub fields: BTreeMap<String, String>,
}

/// Everything produced for one entity in one generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormBundle {
    pub responsible_party: ResolvedResponsibleParty,
    pub ss4: AssembledForm,
    pub f2848: AssembledForm,
    pub f8821: AssembledForm,
    pub quality: QualityReport,
}

// ============================================================================
// ASSEMBLY
// ============================================================================

/// Generate all three forms for one entity. All-or-nothing: the only `Err`
/// is the resolver's fatal case, and then nothing is produced.
pub async fn assemble_forms<S: Summarizer + Sync>(
    record: &EntityRecord,
    summarizer: &S,
) -> Result<FormBundle, EngineError> {
    let graph = StakeholderGraph::from_record(record);
    let party = resolve(&graph, record.entity_type)?;

    let purpose = derive_purpose(&record.business_purpose, summarizer).await;

    let company_address = parse_address(&record.company_address);
    let party_address = parse_address(&party.address);
    let quality = assess(record, &graph, &company_address);

    Ok(FormBundle {
        ss4: assemble_ss4(record, &graph, &party, &purpose, &company_address, &party_address),
        f2848: assemble_authorization(FormKind::F2848, record, &party, &company_address),
        f8821: assemble_authorization(FormKind::F8821, record, &party, &company_address),
        responsible_party: party,
        quality,
    })
}

fn assemble_ss4(
    record: &EntityRecord,
    graph: &StakeholderGraph,
    party: &ResolvedResponsibleParty,
    purpose: &BusinessPurposeDerivative,
    company_address: &NormalizedAddress,
    party_address: &NormalizedAddress,
) -> AssembledForm {
    let mut f = BTreeMap::new();

    f.insert("Line 1 Legal Name".to_string(), record.company_name.clone());
    f.insert("Line 4a Mailing Address".to_string(), mailing_line(company_address));
    f.insert(
        "Line 4b City State ZIP".to_string(),
        company_address.city_state_zip(),
    );
    f.insert(
        "Line 6 County and State".to_string(),
        record.formation_state.clone(),
    );
    f.insert("Line 7a Responsible Party".to_string(), party.name.clone());
    f.insert("Line 7b SSN ITIN EIN".to_string(), party.ssn.clone());

    let is_llc = record.entity_type == EntityType::Llc;
    f.insert("Line 8a Is LLC".to_string(), yes_no(is_llc));
    f.insert(
        "Line 8b LLC Members".to_string(),
        if is_llc {
            graph.owners.len().to_string()
        } else {
            String::new()
        },
    );
    f.insert(
        "Line 9a Entity Classification".to_string(),
        record.entity_type.as_str().to_string(),
    );

    f.insert("Line 10 Reason".to_string(), purpose.short_reason.clone());
    f.insert(
        "Line 11 Date Business Started".to_string(),
        format_start_date(&record.payment_date),
    );
    f.insert(
        "Line 12 Closing Month".to_string(),
        ACCOUNTING_YEAR_CLOSE.to_string(),
    );
    f.insert("Line 13 Employees Expected".to_string(), "0".to_string());

    f.insert(
        "Line 16 Category".to_string(),
        purpose.category.as_str().to_string(),
    );
    f.insert(
        "Line 16 Other Text".to_string(),
        if purpose.category == PurposeCategory::Other {
            purpose.category_other_text.clone()
        } else {
            String::new()
        },
    );
    f.insert(
        "Line 17 Principal Activity".to_string(),
        purpose.principal_activity_text.clone(),
    );

    f.insert("Business Phone".to_string(), record.business_phone.clone());
    f.insert(
        "Responsible Party Address".to_string(),
        mailing_line(party_address),
    );
    f.insert(
        "Responsible Party City State ZIP".to_string(),
        party_address.city_state_zip(),
    );

    f.insert("Designee Name".to_string(), DESIGNEE_NAME.to_string());
    f.insert("Designee Address".to_string(), DESIGNEE_ADDRESS.to_string());
    f.insert("Designee Phone".to_string(), DESIGNEE_PHONE.to_string());
    f.insert("Designee Fax".to_string(), DESIGNEE_FAX.to_string());

    f.insert(
        "Signature Name and Title".to_string(),
        party.signature_line.clone(),
    );

    AssembledForm {
        kind: FormKind::Ss4,
        fields: f,
    }
}

/// 2848 and 8821 share the taxpayer + representative layout; they differ
/// in kind and in the representative block's CAF/PTIN usage.
fn assemble_authorization(
    kind: FormKind,
    record: &EntityRecord,
    party: &ResolvedResponsibleParty,
    company_address: &NormalizedAddress,
) -> AssembledForm {
    let mut f = BTreeMap::new();

    f.insert("Taxpayer Name".to_string(), record.company_name.clone());
    f.insert("Taxpayer Address".to_string(), mailing_line(company_address));
    f.insert(
        "Taxpayer City State ZIP".to_string(),
        company_address.city_state_zip(),
    );
    f.insert("Taxpayer Phone".to_string(), record.business_phone.clone());

    f.insert("Representative Name".to_string(), DESIGNEE_NAME.to_string());
    f.insert(
        "Representative Address".to_string(),
        DESIGNEE_ADDRESS.to_string(),
    );
    f.insert("Representative Phone".to_string(), DESIGNEE_PHONE.to_string());
    f.insert("Representative Fax".to_string(), DESIGNEE_FAX.to_string());
    f.insert("Representative CAF".to_string(), DESIGNEE_CAF.to_string());
    if kind == FormKind::F2848 {
        f.insert("Representative PTIN".to_string(), DESIGNEE_PTIN.to_string());
    }

    f.insert("Tax Matters".to_string(), "Income".to_string());
    f.insert(
        "Tax Form Number".to_string(),
        record.entity_type.tax_form_number().to_string(),
    );
    f.insert("Years or Periods".to_string(), year_range(&record.payment_date));

    f.insert("Signer Name".to_string(), party.name.clone());
    f.insert("Signer Title".to_string(), party.title.clone());
    f.insert(
        "Signature Name and Title".to_string(),
        party.signature_line.clone(),
    );

    AssembledForm { kind, fields: f }
}

/// "street" or "street, line2" as a single mailing line; falls back to the
/// raw line1 when nothing else was parsed.
fn mailing_line(addr: &NormalizedAddress) -> String {
    if addr.line2.is_empty() {
        addr.line1.clone()
    } else {
        format!("{}, {}", addr.line1, addr.line2)
    }
}

fn yes_no(v: bool) -> String {
    if v { "Yes" } else { "No" }.to_string()
}

/// Parse the payment date in either upstream format; unparseable input is
/// passed through untouched rather than guessed at.
fn parse_payment_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
}

fn format_start_date(raw: &str) -> String {
    match parse_payment_date(raw) {
        Some(date) => date.format("%m/%d/%Y").to_string(),
        None => raw.trim().to_string(),
    }
}

/// Covered filing years for 2848/8821: payment year through payment
/// year + 2.
fn year_range(raw: &str) -> String {
    match parse_payment_date(raw) {
        Some(date) => {
            use chrono::Datelike;
            let year = date.year();
            format!("{}-{}", year, year + 2)
        }
        None => String::new(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarizer::{CategoryAnswer, NoopSummarizer, StubSummarizer};
    use serde_json::json;

    fn llc_record() -> EntityRecord {
        EntityRecord::from_json(&json!({
            "Company Name": "Acme Widgets LLC",
            "Company Address": "123 Main St, Miami, FL 33101",
            "Entity Type": "LLC",
            "Formation State": "Miami-Dade, Florida",
            "Business Purpose": "Retail sale of handmade furniture and home decor items",
            "Business Phone": "305-555-0100",
            "Payment Date": "2024-03-15",
            "Owner Count": 1,
            "Owner 1 Name": "Jane Roe",
            "Owner 1 SSN": "123-45-6789",
            "Owner 1 Ownership": 100,
            "Owner 1 Address": "99 Elm Street, New York, NY 10001",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_ss4_assembly() {
        let bundle = assemble_forms(&llc_record(), &NoopSummarizer).await.unwrap();
        let f = &bundle.ss4.fields;

        assert_eq!(f["Line 1 Legal Name"], "Acme Widgets LLC");
        assert_eq!(f["Line 4a Mailing Address"], "123 Main St");
        assert_eq!(f["Line 4b City State ZIP"], "Miami, FL 33101");
        assert_eq!(f["Line 7a Responsible Party"], "Jane Roe");
        assert_eq!(f["Line 7b SSN ITIN EIN"], "123-45-6789");
        assert_eq!(f["Line 8a Is LLC"], "Yes");
        assert_eq!(f["Line 8b LLC Members"], "1");
        assert_eq!(f["Line 11 Date Business Started"], "03/15/2024");
        assert_eq!(f["Line 12 Closing Month"], "DECEMBER");
        assert_eq!(f["Line 16 Category"], "Retail");
        assert_eq!(f["Line 16 Other Text"], "");
        assert_eq!(f["Signature Name and Title"], "Jane Roe,SOLE MEMBER");
        assert!(f["Line 10 Reason"].chars().count() <= 35);
        assert!(f["Line 17 Principal Activity"].chars().count() <= 75);
    }

    #[tokio::test]
    async fn test_authorization_forms_share_taxpayer_block() {
        let bundle = assemble_forms(&llc_record(), &NoopSummarizer).await.unwrap();

        for form in [&bundle.f2848, &bundle.f8821] {
            let f = &form.fields;
            assert_eq!(f["Taxpayer Name"], "Acme Widgets LLC");
            assert_eq!(f["Tax Form Number"], "1065");
            assert_eq!(f["Years or Periods"], "2024-2026");
            assert_eq!(f["Representative Name"], DESIGNEE_NAME);
            assert_eq!(f["Signer Title"], "SOLE MEMBER");
        }
        // PTIN is a 2848-only field
        assert!(bundle.f2848.fields.contains_key("Representative PTIN"));
        assert!(!bundle.f8821.fields.contains_key("Representative PTIN"));
    }

    #[tokio::test]
    async fn test_assembly_is_idempotent_with_stubbed_summarizer() {
        let stub = StubSummarizer {
            short_reason: "RETAIL FURNITURE SALES".to_string(),
            category: CategoryAnswer {
                category: "retail".to_string(),
                other_specify: None,
            },
            principal_activity: "RETAIL SALE OF HANDMADE FURNITURE".to_string(),
        };
        let record = llc_record();

        let a = assemble_forms(&record, &stub).await.unwrap();
        let b = assemble_forms(&record, &stub).await.unwrap();

        // byte-identical field sets, BTreeMap keeps key order deterministic
        assert_eq!(
            serde_json::to_string(&a.ss4).unwrap(),
            serde_json::to_string(&b.ss4).unwrap()
        );
        assert_eq!(a.f2848, b.f2848);
        assert_eq!(a.f8821, b.f8821);
    }

    #[tokio::test]
    async fn test_scorp_fatal_produces_no_output() {
        let record = EntityRecord::from_json(&json!({
            "Company Name": "Broken Corp",
            "Company Address": "123 Main St, Miami, FL 33101",
            "Entity Type": "S-Corp",
            "Business Purpose": "Consulting",
            "Officer 1 Name": "The Treasurer",
            "Officer 1 Title": "Treasurer",
            "Officer 1 SSN": "111-11-1111",
        }))
        .unwrap();

        let err = assemble_forms(&record, &NoopSummarizer).await.unwrap_err();
        assert!(matches!(err, EngineError::NoEligibleSigner { .. }));
    }

    #[tokio::test]
    async fn test_ccorp_return_number() {
        let record = EntityRecord::from_json(&json!({
            "Company Name": "Acme Inc",
            "Company Address": "123 Main St, Miami, FL 33101",
            "Entity Type": "C-Corp",
            "Business Purpose": "Manufacturing of widgets",
            "Payment Date": "01/05/2025",
            "Officer 1 Name": "The President",
            "Officer 1 Title": "President",
            "Officer 1 SSN": "111-11-1111",
        }))
        .unwrap();

        let bundle = assemble_forms(&record, &NoopSummarizer).await.unwrap();
        assert_eq!(bundle.f2848.fields["Tax Form Number"], "1120");
        assert_eq!(bundle.f2848.fields["Years or Periods"], "2025-2027");
        assert_eq!(bundle.ss4.fields["Line 8a Is LLC"], "No");
        assert_eq!(bundle.ss4.fields["Line 8b LLC Members"], "");
        assert_eq!(
            bundle.ss4.fields["Signature Name and Title"],
            "The President, PRESIDENT"
        );
        assert_eq!(bundle.ss4.fields["Line 16 Category"], "Manufacturing");
    }
}
