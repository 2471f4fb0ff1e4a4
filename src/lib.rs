// Tax-Filing Field Resolution Engine - Core Library
// Deterministic rules that turn a loosely-structured entity record into the
// exact field values required by IRS forms SS-4, 2848 and 8821.

pub mod address;      // Address Normalizer
pub mod error;        // Error taxonomy (one fatal case)
pub mod forms;        // Form Assembler: SS-4 / 2848 / 8821
pub mod purpose;      // Business-purpose text pipeline
pub mod quality;      // Non-blocking data-quality flags
pub mod record;       // System boundary: flat field map → typed record
pub mod resolver;     // Responsible-party resolver
pub mod signature;    // Signature line formatting
pub mod stakeholders; // Stakeholder graph
pub mod summarizer;   // Advisory summarization client

// Re-export commonly used types
pub use address::{parse_address, NormalizedAddress};
pub use error::EngineError;
pub use forms::{assemble_forms, AssembledForm, FormBundle, FormKind};
pub use purpose::{
    categorize_by_keywords, derive_purpose, strip_dangling_words, truncate_at_word_boundary,
    BusinessPurposeDerivative, CategorizedPurpose, PurposeCategory,
};
pub use quality::{QualityIssue, QualityReport, Severity};
pub use record::{EntityRecord, EntityType, Role, MAX_SLOTS};
pub use resolver::{has_valid_ssn, is_president, resolve, ResolvedResponsibleParty};
pub use signature::{format_signature, signature_title, SOLE_MEMBER_THRESHOLD};
pub use stakeholders::{StakeholderGraph, StakeholderRecord, SSN_SENTINEL};
pub use summarizer::{
    CategoryAnswer, HttpSummarizer, NoopSummarizer, StubSummarizer, SummarizerError,
    SummaryRequest, Summarizer,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
