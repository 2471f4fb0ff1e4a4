// ⚖️ Responsible-Party Resolver
// Tiered signer selection per entity type, first matching tier wins, ties
// within a tier broken by declared slot order. Pure function of the
// stakeholder graph; the single fatal case is an S-Corp without a
// President holding a valid SSN.

use crate::error::EngineError;
use crate::record::EntityType;
use crate::signature::{format_signature, signature_title};
use crate::stakeholders::{StakeholderGraph, StakeholderRecord, SSN_SENTINEL};
use serde::{Deserialize, Serialize};

// ============================================================================
// PREDICATES
// ============================================================================

/// True iff the SSN is usable: non-empty, not "N/A", and not a FOREIGN
/// marker of any spelling.
pub fn has_valid_ssn(ssn: &str) -> bool {
    let s = ssn.trim().to_uppercase();
    !s.is_empty() && s != "N/A" && !s.contains("FOREIGN")
}

/// True iff the title denotes the President proper. "Vice President" and
/// "Co-President" variants are excluded.
pub fn is_president(title: &str) -> bool {
    let t = title.trim().to_uppercase();
    if t.contains("VICE") || t.contains("CO-") {
        return false;
    }
    t.starts_with("PRESIDENT")
}

// ============================================================================
// RESOLVED PARTY
// ============================================================================

/// The one individual the IRS forms designate as accountable/signing for
/// the entity. Created once per form-generation invocation; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedResponsibleParty {
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    /// A valid SSN or the [`SSN_SENTINEL`]; never empty.
    pub ssn: String,
    /// Raw address string from the winning stakeholder record.
    pub address: String,
    /// Declared role on the form ("PRESIDENT", "TREASURER", ...). Empty for
    /// an LLC member.
    pub officer_role: String,
    /// Title portion of the signature line (MEMBER / SOLE MEMBER for LLCs).
    pub title: String,
    /// Full signature line, "{Name}, {TITLE}" (corp) or "{Name},{TITLE}" (LLC).
    pub signature_line: String,
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Pick exactly one responsible party for the entity, honoring the
/// per-entity-type tier chain. Returns `Err` only for the S-Corp fatal
/// case and for a graph with no stakeholders to fall back on.
pub fn resolve(
    graph: &StakeholderGraph,
    entity_type: EntityType,
) -> Result<ResolvedResponsibleParty, EngineError> {
    let selection = match entity_type {
        EntityType::SCorp => resolve_s_corp(graph)?,
        EntityType::CCorp => resolve_c_corp(graph)?,
        EntityType::Llc => resolve_llc(graph)?,
    };
    Ok(finish(selection, graph, entity_type))
}

/// Winning stakeholder plus how the tier chain classified them.
struct Selection<'a> {
    stakeholder: &'a StakeholderRecord,
    /// Resolved via the President tier.
    via_president: bool,
    /// SSN search failed; emit the sentinel instead of the record's value.
    ssn_sentinel: bool,
}

fn resolve_s_corp(graph: &StakeholderGraph) -> Result<Selection<'_>, EngineError> {
    // Tier 1 only: President with a valid SSN. No fallback — an S-Corp
    // signer without an SSN is not IRS-acceptable.
    graph
        .officers
        .iter()
        .find(|o| is_president(&o.officer_title) && has_valid_ssn(&o.ssn))
        .map(|stakeholder| Selection {
            stakeholder,
            via_president: true,
            ssn_sentinel: false,
        })
        .ok_or_else(|| EngineError::NoEligibleSigner {
            entity_type: EntityType::SCorp.as_str().to_string(),
            detail: "no President with a valid SSN on record".to_string(),
        })
}

fn resolve_c_corp(graph: &StakeholderGraph) -> Result<Selection<'_>, EngineError> {
    // Tier 1: President with valid SSN.
    if let Some(s) = graph
        .officers
        .iter()
        .find(|o| is_president(&o.officer_title) && has_valid_ssn(&o.ssn))
    {
        return Ok(Selection { stakeholder: s, via_president: true, ssn_sentinel: false });
    }

    // Tier 2: first officer with a valid SSN. Deliberately first-match, not
    // highest-ownership; see the pinning test below.
    if let Some(s) = graph.officers.iter().find(|o| has_valid_ssn(&o.ssn)) {
        return Ok(Selection { stakeholder: s, via_president: false, ssn_sentinel: false });
    }

    // Tier 3: highest-ownership officer/owner, SSN degraded to the sentinel.
    if let Some(s) = highest_ownership(graph.officers.iter().chain(graph.owners.iter())) {
        tracing::warn!(name = %s.name, "C-Corp signer resolved without a valid SSN");
        return Ok(Selection { stakeholder: s, via_president: false, ssn_sentinel: true });
    }

    // Tier 4: no ownership data at all — first officer, then first owner.
    if let Some(s) = graph.officers.first().or_else(|| graph.owners.first()) {
        tracing::warn!(name = %s.name, "C-Corp signer resolved with no SSN or ownership data");
        return Ok(Selection { stakeholder: s, via_president: false, ssn_sentinel: true });
    }

    Err(EngineError::NoEligibleSigner {
        entity_type: EntityType::CCorp.as_str().to_string(),
        detail: "no officers or owners on record".to_string(),
    })
}

fn resolve_llc(graph: &StakeholderGraph) -> Result<Selection<'_>, EngineError> {
    // Tier 1: highest-ownership owner with a valid SSN.
    if let Some(s) = highest_ownership(graph.owners.iter().filter(|o| has_valid_ssn(&o.ssn))) {
        if s.ownership_percent > 0.0 {
            return Ok(Selection { stakeholder: s, via_president: false, ssn_sentinel: false });
        }
    }

    // Tier 2: any owner with a valid SSN (no ownership data to rank by).
    if let Some(s) = graph.owners.iter().find(|o| has_valid_ssn(&o.ssn)) {
        return Ok(Selection { stakeholder: s, via_president: false, ssn_sentinel: false });
    }

    // Tier 3: manager with a valid SSN.
    if let Some(s) = graph.managers.iter().find(|m| has_valid_ssn(&m.ssn)) {
        return Ok(Selection { stakeholder: s, via_president: false, ssn_sentinel: false });
    }

    // Tier 4: highest-ownership owner with the sentinel; Owner 1 last resort.
    if let Some(s) = highest_ownership(graph.owners.iter()).or_else(|| graph.owners.first()) {
        tracing::warn!(name = %s.name, "LLC signer resolved without a valid SSN");
        return Ok(Selection { stakeholder: s, via_president: false, ssn_sentinel: true });
    }

    Err(EngineError::NoEligibleSigner {
        entity_type: EntityType::Llc.as_str().to_string(),
        detail: "no owners on record".to_string(),
    })
}

/// Strictly-greater comparison keeps the earliest slot on ties.
fn highest_ownership<'a, I>(candidates: I) -> Option<&'a StakeholderRecord>
where
    I: Iterator<Item = &'a StakeholderRecord>,
{
    candidates.fold(None, |best: Option<&StakeholderRecord>, s| match best {
        Some(b) if s.ownership_percent > b.ownership_percent => Some(s),
        None => Some(s),
        _ => best,
    })
}

/// Fill in role, title and the signature line for the winning stakeholder.
fn finish(
    selection: Selection<'_>,
    graph: &StakeholderGraph,
    entity_type: EntityType,
) -> ResolvedResponsibleParty {
    let s = selection.stakeholder;

    let officer_role = if selection.via_president {
        "PRESIDENT".to_string()
    } else {
        let declared = s.officer_title.trim().to_uppercase();
        if declared.is_empty() && entity_type.is_corp() {
            // Corp forms require *a* title.
            "PRESIDENT".to_string()
        } else {
            declared
        }
    };

    let sole_owner_percent = graph
        .owners
        .first()
        .map(|o| o.ownership_percent)
        .unwrap_or(0.0);
    let title = signature_title(entity_type, &officer_role, graph.owners.len(), sole_owner_percent);
    let signature_line = format_signature(&s.name, &title, entity_type).unwrap_or_default();

    let ssn = if selection.ssn_sentinel || !has_valid_ssn(&s.ssn) {
        SSN_SENTINEL.to_string()
    } else {
        s.ssn.clone()
    };

    ResolvedResponsibleParty {
        name: s.name.clone(),
        first_name: s.first_name.clone(),
        last_name: s.last_name.clone(),
        ssn,
        address: s.address.clone(),
        officer_role,
        title,
        signature_line,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::EntityRecord;
    use serde_json::json;

    fn graph(value: serde_json::Value) -> StakeholderGraph {
        StakeholderGraph::from_record(&EntityRecord::from_json(&value).unwrap())
    }

    #[test]
    fn test_ssn_predicate() {
        assert!(has_valid_ssn("123-45-6789"));
        assert!(!has_valid_ssn(""));
        assert!(!has_valid_ssn("  "));
        assert!(!has_valid_ssn("N/A"));
        assert!(!has_valid_ssn("n/a"));
        assert!(!has_valid_ssn("N/A-FOREIGN"));
        assert!(!has_valid_ssn("foreign national"));
    }

    #[test]
    fn test_president_predicate() {
        assert!(is_president("President"));
        assert!(is_president("  PRESIDENT  "));
        assert!(is_president("President / CEO"));
        assert!(!is_president("Vice President"));
        assert!(!is_president("Co-President"));
        assert!(!is_president("Treasurer"));
        assert!(!is_president(""));
    }

    #[test]
    fn test_llc_picks_highest_ownership_owner_not_first() {
        let g = graph(json!({
            "Entity Type": "LLC",
            "Owner 1 Name": "Minor Owner",
            "Owner 1 SSN": "111-11-1111",
            "Owner 1 Ownership": 20,
            "Owner 2 Name": "Major Owner",
            "Owner 2 SSN": "222-22-2222",
            "Owner 2 Ownership": 80,
        }));
        let party = resolve(&g, EntityType::Llc).unwrap();
        assert_eq!(party.name, "Major Owner");
        assert_eq!(party.ssn, "222-22-2222");
        assert_eq!(party.title, "MEMBER");
        assert_eq!(party.signature_line, "Major Owner,MEMBER");
    }

    #[test]
    fn test_llc_ownership_tie_keeps_slot_order() {
        let g = graph(json!({
            "Entity Type": "LLC",
            "Owner 1 Name": "First Equal",
            "Owner 1 SSN": "111-11-1111",
            "Owner 1 Ownership": 50,
            "Owner 2 Name": "Second Equal",
            "Owner 2 SSN": "222-22-2222",
            "Owner 2 Ownership": 50,
        }));
        assert_eq!(resolve(&g, EntityType::Llc).unwrap().name, "First Equal");
    }

    #[test]
    fn test_llc_falls_back_to_manager_ssn() {
        let g = graph(json!({
            "Entity Type": "LLC",
            "Owner 1 Name": "Foreign Owner",
            "Owner 1 SSN": "N/A-FOREIGN",
            "Owner 1 Ownership": 100,
            "Manager 1 Name": "Local Manager",
            "Manager 1 SSN": "333-33-3333",
        }));
        let party = resolve(&g, EntityType::Llc).unwrap();
        assert_eq!(party.name, "Local Manager");
        assert_eq!(party.ssn, "333-33-3333");
    }

    #[test]
    fn test_llc_sentinel_when_nobody_has_ssn() {
        let g = graph(json!({
            "Entity Type": "LLC",
            "Owner 1 Name": "Foreign Minor",
            "Owner 1 Ownership": 30,
            "Owner 2 Name": "Foreign Major",
            "Owner 2 Ownership": 70,
        }));
        let party = resolve(&g, EntityType::Llc).unwrap();
        assert_eq!(party.name, "Foreign Major");
        assert_eq!(party.ssn, SSN_SENTINEL);
    }

    #[test]
    fn test_llc_sole_member_signature() {
        let g = graph(json!({
            "Entity Type": "LLC",
            "Owner 1 Name": "Only Owner",
            "Owner 1 SSN": "111-11-1111",
            "Owner 1 Ownership": 100,
        }));
        let party = resolve(&g, EntityType::Llc).unwrap();
        assert_eq!(party.title, "SOLE MEMBER");
        assert_eq!(party.signature_line, "Only Owner,SOLE MEMBER");
    }

    #[test]
    fn test_ccorp_president_tier_wins() {
        let g = graph(json!({
            "Entity Type": "C-Corp",
            "Officer 1 Name": "The Treasurer",
            "Officer 1 Title": "Treasurer",
            "Officer 1 SSN": "111-11-1111",
            "Officer 2 Name": "The President",
            "Officer 2 Title": "President",
            "Officer 2 SSN": "222-22-2222",
        }));
        let party = resolve(&g, EntityType::CCorp).unwrap();
        assert_eq!(party.name, "The President");
        assert_eq!(party.officer_role, "PRESIDENT");
        assert_eq!(party.signature_line, "The President, PRESIDENT");
    }

    #[test]
    fn test_ccorp_tier2_prefers_first_officer_not_highest_ownership() {
        // Pins the deliberate asymmetry with the LLC path: tier 2 is
        // first-match over slot order even when a later officer owns more.
        let g = graph(json!({
            "Entity Type": "C-Corp",
            "Officer 1 Name": "Small Officer",
            "Officer 1 Title": "Secretary",
            "Officer 1 SSN": "111-11-1111",
            "Officer 1 Ownership": 10,
            "Officer 2 Name": "Big Officer",
            "Officer 2 Title": "Treasurer",
            "Officer 2 SSN": "222-22-2222",
            "Officer 2 Ownership": 90,
        }));
        let party = resolve(&g, EntityType::CCorp).unwrap();
        assert_eq!(party.name, "Small Officer");
        assert_eq!(party.officer_role, "SECRETARY");
    }

    #[test]
    fn test_ccorp_no_ssn_uses_sentinel_never_empty() {
        let g = graph(json!({
            "Entity Type": "C-Corp",
            "Officer 1 Name": "Foreign Officer",
            "Officer 1 Title": "CEO",
            "Officer 1 Ownership": 40,
            "Owner 1 Name": "Foreign Majority",
            "Owner 1 Ownership": 60,
        }));
        let party = resolve(&g, EntityType::CCorp).unwrap();
        assert_eq!(party.name, "Foreign Majority");
        assert_eq!(party.ssn, SSN_SENTINEL);
        assert!(!party.ssn.is_empty());
    }

    #[test]
    fn test_ccorp_tier4_first_officer_when_no_ownership_data() {
        let g = graph(json!({
            "Entity Type": "C-Corp",
            "Officer 1 Name": "Foreign CEO",
            "Officer 1 Title": "CEO",
            "Officer 2 Name": "Foreign CFO",
            "Officer 2 Title": "CFO",
        }));
        let party = resolve(&g, EntityType::CCorp).unwrap();
        assert_eq!(party.name, "Foreign CEO");
        assert_eq!(party.ssn, SSN_SENTINEL);
    }

    #[test]
    fn test_scorp_without_president_ssn_is_fatal() {
        let g = graph(json!({
            "Entity Type": "S-Corp",
            "Officer 1 Name": "The Treasurer",
            "Officer 1 Title": "Treasurer",
            "Officer 1 SSN": "111-11-1111",
        }));
        let err = resolve(&g, EntityType::SCorp).unwrap_err();
        assert!(matches!(err, EngineError::NoEligibleSigner { .. }));
    }

    #[test]
    fn test_scorp_vice_president_does_not_count() {
        let g = graph(json!({
            "Entity Type": "S-Corp",
            "Officer 1 Name": "The VP",
            "Officer 1 Title": "Vice President",
            "Officer 1 SSN": "111-11-1111",
        }));
        assert!(resolve(&g, EntityType::SCorp).is_err());
    }

    #[test]
    fn test_scorp_president_resolves() {
        let g = graph(json!({
            "Entity Type": "S-Corp",
            "Officer 1 Name": "The President",
            "Officer 1 Title": "President",
            "Officer 1 SSN": "111-11-1111",
        }));
        let party = resolve(&g, EntityType::SCorp).unwrap();
        assert_eq!(party.officer_role, "PRESIDENT");
        assert_eq!(party.ssn, "111-11-1111");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let v = json!({
            "Entity Type": "LLC",
            "Owner 1 Name": "Jane Roe",
            "Owner 1 SSN": "111-11-1111",
            "Owner 1 Ownership": 55,
            "Owner 2 Name": "John Doe",
            "Owner 2 SSN": "222-22-2222",
            "Owner 2 Ownership": 45,
        });
        let first = resolve(&graph(v.clone()), EntityType::Llc).unwrap();
        let second = resolve(&graph(v), EntityType::Llc).unwrap();
        // ids differ run to run, the resolved identity must not
        assert_eq!(first.name, second.name);
        assert_eq!(first.ssn, second.ssn);
        assert_eq!(first.signature_line, second.signature_line);
    }
}
