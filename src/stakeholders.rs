// 👥 Stakeholder Graph - Stable identity + role records
// Builds the typed per-role view of one entity's people from the numbered
// record slots. Each person gets a UUID at build time; officers/managers
// that link back to an owner share the owner's id.
//
// "A name is a VALUE (can be misspelled), the stakeholder id is IDENTITY"

use crate::record::{EntityRecord, Role, MAX_SLOTS};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// SSN marker for a stakeholder with no usable SSN. The empty-vs-sentinel
/// distinction only matters while the resolver is still searching; the form
/// assembler must never see an empty SSN.
pub const SSN_SENTINEL: &str = "N/A-FOREIGN";

// ============================================================================
// STAKEHOLDER RECORD
// ============================================================================

/// One person in one role. A person linked across roles keeps role-specific
/// address/title overrides but shares id, SSN and ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeholderRecord {
    /// Stable identity. Shared across role records for the same person.
    pub id: Uuid,
    pub role: Role,
    /// 1-based slot this record came from; resolver tie-break order.
    pub slot: usize,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    /// Raw SSN, the sentinel, or empty while unresolved.
    pub ssn: String,
    /// Free-text mailing address as given on the record.
    pub address: String,
    /// Ownership in the 0–100 space (decimals in (0,1] scaled ×100 at parse).
    pub ownership_percent: f64,
    /// Free-text officer title ("President", "CFO", ...), may be empty.
    pub officer_title: String,
}

impl StakeholderRecord {
    /// Case-insensitive full-name equality, the degraded linking path when
    /// no explicit person id is present on the record.
    pub fn name_matches(&self, other_name: &str) -> bool {
        !self.name.trim().is_empty()
            && self.name.trim().eq_ignore_ascii_case(other_name.trim())
    }
}

// ============================================================================
// STAKEHOLDER GRAPH
// ============================================================================

/// In-memory view of Owners, Officers, Directors and Managers for one
/// entity. Slot order is preserved within each role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StakeholderGraph {
    pub owners: Vec<StakeholderRecord>,
    pub officers: Vec<StakeholderRecord>,
    pub directors: Vec<StakeholderRecord>,
    pub managers: Vec<StakeholderRecord>,
}

impl StakeholderGraph {
    /// Build the graph from a parsed record: read up to [`MAX_SLOTS`] slots
    /// per role, skip blank-name slots, normalize ownership, then cross-link
    /// officers/managers to owners.
    pub fn from_record(record: &EntityRecord) -> Self {
        let mut graph = StakeholderGraph {
            owners: read_role(record, Role::Owner),
            officers: read_role(record, Role::Officer),
            directors: read_role(record, Role::Director),
            managers: read_role(record, Role::Manager),
        };

        let owners = graph.owners.clone();
        link_to_owners(&owners, &mut graph.officers);
        link_to_owners(&owners, &mut graph.managers);

        graph
    }

    /// Total declared ownership across owners, 0–100 space.
    pub fn total_ownership(&self) -> f64 {
        self.owners.iter().map(|o| o.ownership_percent).sum()
    }
}

fn read_role(record: &EntityRecord, role: Role) -> Vec<StakeholderRecord> {
    let cap = record.role_count(role).unwrap_or(MAX_SLOTS).min(MAX_SLOTS);
    let mut out = Vec::new();

    for slot in 1..=cap {
        let name = record.slot_field(role, slot, "Name").trim().to_string();
        if name.is_empty() {
            continue;
        }

        // An upstream-supplied person id wins over a generated one so the
        // same person carries one identity across role records.
        let id = record
            .slot_field(role, slot, "Person Id")
            .trim()
            .parse::<Uuid>()
            .unwrap_or_else(|_| Uuid::new_v4());

        let (first_name, last_name) = split_name(
            &name,
            record.slot_field(role, slot, "First Name").trim(),
            record.slot_field(role, slot, "Last Name").trim(),
        );

        out.push(StakeholderRecord {
            id,
            role,
            slot,
            name,
            first_name,
            last_name,
            ssn: record.slot_field(role, slot, "SSN").trim().to_string(),
            address: record.slot_field(role, slot, "Address").trim().to_string(),
            ownership_percent: normalize_ownership(record.slot_field(role, slot, "Ownership")),
            officer_title: record.slot_field(role, slot, "Title").trim().to_string(),
        });
    }

    out
}

/// Prefer the record's explicit first/last fields; otherwise split the full
/// name at the last space.
fn split_name(full: &str, first: &str, last: &str) -> (String, String) {
    if !first.is_empty() || !last.is_empty() {
        return (first.to_string(), last.to_string());
    }
    match full.rfind(' ') {
        Some(pos) => (full[..pos].trim().to_string(), full[pos + 1..].trim().to_string()),
        None => (full.to_string(), String::new()),
    }
}

/// Normalize an ownership value to the 0–100 space. Decimals in (0,1] are
/// scaled ×100 before any comparison happens anywhere in the engine.
fn normalize_ownership(raw: &str) -> f64 {
    let cleaned = raw.trim().trim_end_matches('%');
    let value: f64 = match cleaned.parse() {
        Ok(v) => v,
        Err(_) => return 0.0,
    };
    if value > 0.0 && value <= 1.0 {
        value * 100.0
    } else {
        value.max(0.0)
    }
}

/// Cross-link: inherit SSN/ownership/address from a matching owner when the
/// officer/manager record lacks them. Linking is by shared person id first,
/// case-insensitive exact name second. A mismatch leaves the record
/// unlinked with whatever fields it was given directly.
fn link_to_owners(owners: &[StakeholderRecord], records: &mut [StakeholderRecord]) {
    for rec in records.iter_mut() {
        let owner = owners
            .iter()
            .find(|o| o.id == rec.id)
            .or_else(|| owners.iter().find(|o| o.name_matches(&rec.name)));

        let Some(owner) = owner else { continue };

        rec.id = owner.id;
        if rec.ssn.trim().is_empty() {
            rec.ssn = owner.ssn.clone();
        }
        if rec.ownership_percent == 0.0 {
            rec.ownership_percent = owner.ownership_percent;
        }
        if rec.address.is_empty() {
            rec.address = owner.address.clone();
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
