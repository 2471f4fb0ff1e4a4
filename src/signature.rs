// ✍️ Signature Formatter
// Derives the display name/title used on signature lines. The corp/LLC
// punctuation difference ("Name, TITLE" vs "Name,TITLE") is a contract with
// the upstream PDF templates and must be preserved byte-for-byte.

use crate::record::EntityType;

/// Ownership at or above this is treated as a sole member, absorbing
/// float/rounding noise from percentage storage.
pub const SOLE_MEMBER_THRESHOLD: f64 = 99.99;

/// Title portion of the signature line.
///
/// - Corporations: the resolved officer role, uppercased; empty defaults to
///   PRESIDENT (logged, not user-facing).
/// - LLC: SOLE MEMBER for a single ~100% owner, MEMBER otherwise.
pub fn signature_title(
    entity_type: EntityType,
    officer_role: &str,
    owner_count: usize,
    sole_owner_percent: f64,
) -> String {
    match entity_type {
        EntityType::CCorp | EntityType::SCorp => {
            let title = officer_role.trim().to_uppercase();
            if title.is_empty() {
                tracing::warn!(
                    entity_type = entity_type.as_str(),
                    "corp signer has no officer title, defaulting to PRESIDENT"
                );
                "PRESIDENT".to_string()
            } else {
                title
            }
        }
        EntityType::Llc => {
            if owner_count == 1 && sole_owner_percent >= SOLE_MEMBER_THRESHOLD {
                "SOLE MEMBER".to_string()
            } else {
                "MEMBER".to_string()
            }
        }
    }
}

/// Full signature line. Returns `None` for an empty name: title fields may
/// use generic placeholders, name fields may not.
pub fn format_signature(name: &str, title: &str, entity_type: EntityType) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        tracing::warn!("refusing to format a signature line with an empty name");
        return None;
    }
    Some(match entity_type {
        EntityType::CCorp | EntityType::SCorp => format!("{}, {}", name, title),
        EntityType::Llc => format!("{},{}", name, title),
    })
}

// ============================================================================
// TESTS
// ============================================================================
