// Error Taxonomy
// Only one condition in the whole engine is fatal: an S-Corp without a
// President holding a valid SSN. Everything else degrades to a documented
// fallback value and at most produces a quality flag.

/// Errors surfaced to callers of the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No stakeholder satisfies the signer-eligibility rules and no
    /// fallback tier applies. Blocking: form generation for this entity
    /// must not proceed.
    #[error("no eligible signer for {entity_type}: {detail}")]
    NoEligibleSigner {
        /// Entity type that was being resolved.
        entity_type: String,
        /// Which tier chain was exhausted and why.
        detail: String,
    },

    /// The raw record is missing a field the engine cannot work without,
    /// or carries a value it cannot interpret (e.g. an unknown entity type).
    #[error("malformed entity record: {0}")]
    MalformedRecord(String),
}
