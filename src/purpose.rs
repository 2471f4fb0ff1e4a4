// 📝 Business-Purpose Text Pipeline
// Three independent derivations from one free-text business description:
// short reason (Line 10), category + override text (Line 16), principal
// activity (Line 17). Each has an advisory summarizer path and a
// deterministic fallback; the truncation + dangling-word safety net runs on
// whichever path produced the raw text.

use crate::summarizer::{CategoryAnswer, SummaryRequest, Summarizer, SummarizerError};
use serde::{Deserialize, Serialize};

/// Line 10 short-reason bound.
pub const SHORT_REASON_LIMIT: usize = 35;
/// Line 16 "other" override-text bound.
pub const CATEGORY_OTHER_LIMIT: usize = 45;
/// Line 17 principal-activity bound.
pub const PRINCIPAL_ACTIVITY_LIMIT: usize = 75;

/// Generic phrase the short-reason path rejects; the IRS wants a specific
/// reason, not this boilerplate.
const GENERIC_REASON: &str = "STARTED NEW BUSINESS";

/// Trailing function words that make truncated text read as incomplete.
/// English prepositions/conjunctions/articles plus Spanish equivalents.
const DANGLING_WORDS: &[&str] = &[
    "FOR", "TO", "IN", "OF", "WITH", "AND", "OR", "THE", "A", "AN", "BY", "AT", "ON", "FROM",
    "AS", "BUT", "NOR", "SO", "YET", "INTO", "UPON", "THROUGH", "BETWEEN", "AMONG", "HACIA",
    "PARA", "EN", "DE", "Y", "CON",
];

// ============================================================================
// TRUNCATION + DANGLING-WORD SAFETY NET
// ============================================================================

/// Cut at the last space before `limit` if that space is past 60% of the
/// limit, otherwise hard-cut; then strip dangling trailing words. The
/// result is always ≤ `limit` characters and never ends mid-phrase.
pub fn truncate_at_word_boundary(text: &str, limit: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= limit {
        return strip_dangling_words(trimmed);
    }

    let cut: String = trimmed.chars().take(limit).collect();
    let floor = limit * 60 / 100;
    let truncated = match cut.rfind(' ') {
        Some(pos) if pos >= floor => cut[..pos].trim_end().to_string(),
        _ => cut.trim_end().to_string(),
    };
    strip_dangling_words(&truncated)
}

/// Repeatedly drop the last word while it is a dangling function word,
/// stopping when the text ends cleanly or one word remains.
pub fn strip_dangling_words(text: &str) -> String {
    let mut words: Vec<&str> = text.split_whitespace().collect();
    while words.len() > 1 {
        let last = words[words.len() - 1]
            .trim_end_matches(|c: char| matches!(c, ',' | '.' | ';' | ':'))
            .to_uppercase();
        if DANGLING_WORDS.contains(&last.as_str()) {
            words.pop();
        } else {
            break;
        }
    }
    words.join(" ")
}

// ============================================================================
// CATEGORY
// ============================================================================

/// The 12 fixed IRS principal-activity categories (SS-4 Line 16).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurposeCategory {
    Construction,
    RentalLeasing,
    Transportation,
    HealthCare,
    AccommodationFood,
    WholesaleAgentBroker,
    WholesaleOther,
    Retail,
    RealEstate,
    Manufacturing,
    Finance,
    Other,
}

impl PurposeCategory {
    /// Label exactly as the form checkbox reads.
    pub fn as_str(&self) -> &'static str {
        match self {
            PurposeCategory::Construction => "Construction",
            PurposeCategory::RentalLeasing => "Rental & leasing",
            PurposeCategory::Transportation => "Transportation & warehousing",
            PurposeCategory::HealthCare => "Health care & social assistance",
            PurposeCategory::AccommodationFood => "Accommodation & food service",
            PurposeCategory::WholesaleAgentBroker => "Wholesale-agent/broker",
            PurposeCategory::WholesaleOther => "Wholesale-other",
            PurposeCategory::Retail => "Retail",
            PurposeCategory::RealEstate => "Real estate",
            PurposeCategory::Manufacturing => "Manufacturing",
            PurposeCategory::Finance => "Finance & insurance",
            PurposeCategory::Other => "Other",
        }
    }

    /// Parse the summarizer's wire keyword ("construction", "retail", ...).
    pub fn from_wire(raw: &str) -> Option<Self> {
        let key: String = raw
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match key.as_str() {
            "construction" => Some(PurposeCategory::Construction),
            "rental" | "rentalleasing" | "leasing" => Some(PurposeCategory::RentalLeasing),
            "transportation" | "transportationwarehousing" => Some(PurposeCategory::Transportation),
            "healthcare" | "healthcaresocialassistance" => Some(PurposeCategory::HealthCare),
            "accommodationfood" | "accommodationfoodservice" | "food" => {
                Some(PurposeCategory::AccommodationFood)
            }
            "wholesaleagentbroker" | "wholesalebroker" => Some(PurposeCategory::WholesaleAgentBroker),
            "wholesaleother" | "wholesale" => Some(PurposeCategory::WholesaleOther),
            "retail" => Some(PurposeCategory::Retail),
            "realestate" => Some(PurposeCategory::RealEstate),
            "manufacturing" => Some(PurposeCategory::Manufacturing),
            "finance" | "financeinsurance" | "insurance" => Some(PurposeCategory::Finance),
            "other" => Some(PurposeCategory::Other),
            _ => None,
        }
    }
}

/// Ordered keyword triggers for the deterministic category fallback. First
/// matching group wins, so more specific groups come first.
const CATEGORY_TRIGGERS: &[(PurposeCategory, &[&str])] = &[
    (
        PurposeCategory::Construction,
        &["CONSTRUCTION", "CONTRACTOR", "REMODEL", "RENOVAT", "ROOFING", "PLUMBING", "CARPENTRY"],
    ),
    (PurposeCategory::RentalLeasing, &["RENTAL", "LEASING", "LEASE"]),
    (
        PurposeCategory::Transportation,
        &["TRANSPORT", "TRUCKING", "FREIGHT", "LOGISTICS", "DELIVERY", "WAREHOUS"],
    ),
    (
        PurposeCategory::HealthCare,
        &["HEALTH", "MEDICAL", "CLINIC", "DENTAL", "THERAPY", "NURSING", "PHARMAC"],
    ),
    (
        PurposeCategory::AccommodationFood,
        &["RESTAURANT", "CATERING", "FOOD", "CAFE", "BAKERY", "HOTEL", "LODGING"],
    ),
    (
        PurposeCategory::WholesaleAgentBroker,
        &["WHOLESALE BROKER", "WHOLESALE AGENT"],
    ),
    (PurposeCategory::WholesaleOther, &["WHOLESALE", "DISTRIBUT"]),
    (
        PurposeCategory::Retail,
        &["RETAIL", "STORE", "E-COMMERCE", "ECOMMERCE", "ONLINE SALES", "SELL"],
    ),
    (PurposeCategory::RealEstate, &["REAL ESTATE", "REALTY", "PROPERTY"]),
    (
        PurposeCategory::Manufacturing,
        &["MANUFACTUR", "FABRICAT", "PRODUCTION"],
    ),
    (
        PurposeCategory::Finance,
        &["FINANC", "INSURANCE", "LENDING", "INVESTMENT", "BANKING"],
    ),
];

/// Categorized business purpose: the category plus, for `Other`, the
/// override text written on the form's specify line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedPurpose {
    pub category: PurposeCategory,
    /// Required iff `category == Other`; empty otherwise.
    pub other_text: String,
}

/// Deterministic keyword categorization over the fixed ordered trigger
/// list. Unmatched text lands in `Other` with the truncated source as the
/// override text.
pub fn categorize_by_keywords(source: &str) -> CategorizedPurpose {
    let upper = source.to_uppercase();
    for (category, triggers) in CATEGORY_TRIGGERS {
        if triggers.iter().any(|t| upper.contains(t)) {
            return CategorizedPurpose {
                category: *category,
                other_text: String::new(),
            };
        }
    }
    CategorizedPurpose {
        category: PurposeCategory::Other,
        other_text: truncate_at_word_boundary(&upper, CATEGORY_OTHER_LIMIT),
    }
}

// ============================================================================
// DERIVATION
// ============================================================================

/// The three bounded fields derived from one business-purpose string. The
/// fields are derived independently and may legitimately disagree in
/// phrasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessPurposeDerivative {
    /// ≤35 chars, Line 10 style.
    pub short_reason: String,
    pub category: PurposeCategory,
    /// ≤45 chars, required iff `category == Other`.
    pub category_other_text: String,
    /// ≤75 chars, Line 17 style.
    pub principal_activity_text: String,
}

/// Derive all three fields. The three advisory calls are independent and
/// issued concurrently; any failure, slow response, or non-conforming
/// answer collapses to the deterministic fallback for that field alone.
pub async fn derive_purpose<S: Summarizer + Sync>(
    source: &str,
    summarizer: &S,
) -> BusinessPurposeDerivative {
    let (reason, category, activity) = tokio::join!(
        summarizer.summarize(SummaryRequest {
            instruction: "State the specific reason for applying, e.g. the business line being started. Never answer 'started new business'.".to_string(),
            source_text: source.to_string(),
            max_length: SHORT_REASON_LIMIT,
        }),
        summarizer.categorize(source),
        summarizer.summarize(SummaryRequest {
            instruction: "Describe the principal business activity as one self-contained phrase that does not end on a preposition, conjunction or article.".to_string(),
            source_text: source.to_string(),
            max_length: PRINCIPAL_ACTIVITY_LIMIT,
        }),
    );

    let categorized = accept_category(category, source);

    BusinessPurposeDerivative {
        short_reason: accept_short_reason(reason, source),
        category: categorized.category,
        category_other_text: categorized.other_text,
        principal_activity_text: accept_principal_activity(activity, source),
    }
}

/// Line 10: reject empty, generic, or unusably short answers, then apply
/// the safety net. Fallback is the truncated, uppercased source.
fn accept_short_reason(answer: Result<String, SummarizerError>, source: &str) -> String {
    let fallback = || truncate_at_word_boundary(&source.to_uppercase(), SHORT_REASON_LIMIT);

    let text = match answer {
        Ok(text) => text.trim().to_uppercase(),
        Err(err) => {
            tracing::debug!(%err, "short-reason summarization failed, using fallback");
            return fallback();
        }
    };

    if text.is_empty() || text.chars().count() < 5 || text.eq_ignore_ascii_case(GENERIC_REASON) {
        tracing::debug!(rejected = %text, "short-reason answer rejected, using fallback");
        return fallback();
    }
    truncate_at_word_boundary(&text, SHORT_REASON_LIMIT)
}

/// Line 16: validate the service's category answer; non-conforming answers
/// (unknown category, missing override text for Other) fall back to keyword
/// matching. Override text always passes through the safety net.
fn accept_category(
    answer: Result<CategoryAnswer, SummarizerError>,
    source: &str,
) -> CategorizedPurpose {
    let answer = match answer {
        Ok(a) => a,
        Err(err) => {
            tracing::debug!(%err, "categorization failed, using keyword fallback");
            return categorize_by_keywords(source);
        }
    };

    let Some(category) = PurposeCategory::from_wire(&answer.category) else {
        tracing::debug!(category = %answer.category, "unknown category, using keyword fallback");
        return categorize_by_keywords(source);
    };

    if category == PurposeCategory::Other {
        let other = answer.other_specify.unwrap_or_default();
        let other = truncate_at_word_boundary(&other.trim().to_uppercase(), CATEGORY_OTHER_LIMIT);
        if other.is_empty() {
            tracing::debug!("'other' category without override text, using keyword fallback");
            return categorize_by_keywords(source);
        }
        return CategorizedPurpose {
            category,
            other_text: other,
        };
    }

    CategorizedPurpose {
        category,
        other_text: String::new(),
    }
}

/// Line 17: the safety net runs even on primary-path output so the phrase
/// never ends on a dangling word.
fn accept_principal_activity(answer: Result<String, SummarizerError>, source: &str) -> String {
    let text = match answer {
        Ok(text) if !text.trim().is_empty() => text.trim().to_uppercase(),
        Ok(_) => source.to_uppercase(),
        Err(err) => {
            tracing::debug!(%err, "principal-activity summarization failed, using fallback");
            source.to_uppercase()
        }
    };
    truncate_at_word_boundary(&text, PRINCIPAL_ACTIVITY_LIMIT)
}

// ============================================================================
// TESTS
// ============================================================================
