// 🗂️ Entity Record - System Boundary
// Parses the Airtable-shaped flat field map ("Owner 3 SSN"-style keys)
// exactly once. Downstream modules only ever see typed data; no synthesized
// string keys escape this file and stakeholders.rs.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum numbered slots per role in the source record (Owner 1..6 etc.).
pub const MAX_SLOTS: usize = 6;

// ============================================================================
// ENTITY TYPE
// ============================================================================

/// Legal entity type. Determines which resolver ruleset and which title
/// vocabulary apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityType {
    Llc,
    CCorp,
    SCorp,
}

impl EntityType {
    /// Human-readable name as it appears on the record.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Llc => "LLC",
            EntityType::CCorp => "C-Corp",
            EntityType::SCorp => "S-Corp",
        }
    }

    /// IRS income tax return number filed by this entity type.
    pub fn tax_form_number(&self) -> &'static str {
        match self {
            EntityType::Llc => "1065",
            EntityType::CCorp => "1120",
            EntityType::SCorp => "1120-S",
        }
    }

    /// True for the two corporation types (officer/title rules apply).
    pub fn is_corp(&self) -> bool {
        matches!(self, EntityType::CCorp | EntityType::SCorp)
    }

    /// Parse the record's `Entity Type` value. Accepts the common spelling
    /// variants seen in source data ("S-Corp", "S Corp", "SCORP").
    pub fn parse(raw: &str) -> Result<Self, EngineError> {
        let normalized: String = raw
            .to_uppercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "LLC" => Ok(EntityType::Llc),
            "CCORP" | "CCORPORATION" => Ok(EntityType::CCorp),
            "SCORP" | "SCORPORATION" => Ok(EntityType::SCorp),
            _ => Err(EngineError::MalformedRecord(format!(
                "unknown entity type: {raw:?}"
            ))),
        }
    }
}

// ============================================================================
// STAKEHOLDER ROLE
// ============================================================================

/// Role a numbered slot belongs to. The record carries up to [`MAX_SLOTS`]
/// slots per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Owner,
    Officer,
    Director,
    Manager,
}

impl Role {
    /// Key prefix used by the source record ("Owner 1 Name", ...).
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Role::Owner => "Owner",
            Role::Officer => "Officer",
            Role::Director => "Director",
            Role::Manager => "Manager",
        }
    }

    /// Count field name for this role, when the record provides one.
    fn count_key(&self) -> &'static str {
        match self {
            Role::Owner => "Owner Count",
            Role::Officer => "Officers Count",
            Role::Director => "Directors Count",
            Role::Manager => "Managers Count",
        }
    }
}

// ============================================================================
// ENTITY RECORD
// ============================================================================

/// One company-formation record, parsed from the flat field map.
///
/// Company-level fields are typed; the numbered stakeholder slots stay in
/// `fields` and are consumed by the stakeholder graph builder, which is the
/// only other module allowed to touch raw keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecord {
    pub company_name: String,
    pub company_address: String,
    pub entity_type: EntityType,
    pub formation_state: String,
    pub business_purpose: String,
    pub business_phone: String,
    /// Raw payment date string; format varies by upstream ("2024-03-15"
    /// or "03/15/2024"). Parsed lazily where a date is actually needed.
    pub payment_date: String,

    fields: BTreeMap<String, String>,
}

impl EntityRecord {
    /// Build a record from a flat JSON object of Airtable-style keys.
    /// Numeric values (ownership percentages, counts) are stringified so a
    /// single map type covers the whole record.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, EngineError> {
        let obj = value.as_object().ok_or_else(|| {
            EngineError::MalformedRecord("expected a JSON object of record fields".to_string())
        })?;

        let mut fields = BTreeMap::new();
        for (key, val) in obj {
            let text = match val {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            fields.insert(key.clone(), text);
        }

        let get = |key: &str| fields.get(key).cloned().unwrap_or_default();

        let entity_type_raw = get("Entity Type");
        if entity_type_raw.trim().is_empty() {
            return Err(EngineError::MalformedRecord(
                "missing required field: Entity Type".to_string(),
            ));
        }
        let entity_type = EntityType::parse(&entity_type_raw)?;

        Ok(EntityRecord {
            company_name: get("Company Name"),
            company_address: get("Company Address"),
            entity_type,
            formation_state: get("Formation State"),
            business_purpose: get("Business Purpose"),
            business_phone: get("Business Phone"),
            payment_date: get("Payment Date"),
            fields,
        })
    }

    /// Raw slot attribute lookup, e.g. `slot_field(Role::Owner, 3, "SSN")`
    /// reads `"Owner 3 SSN"`. Restricted to the boundary modules.
    pub(crate) fn slot_field(&self, role: Role, slot: usize, attribute: &str) -> &str {
        let key = format!("{} {} {}", role.key_prefix(), slot, attribute);
        self.fields.get(&key).map(String::as_str).unwrap_or("")
    }

    /// Declared slot count for a role, when present and parseable.
    pub(crate) fn role_count(&self, role: Role) -> Option<usize> {
        self.fields
            .get(role.count_key())
            .and_then(|v| v.trim().parse::<f64>().ok())
            .map(|n| n.max(0.0) as usize)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_type_parse_variants() {
        assert_eq!(EntityType::parse("LLC").unwrap(), EntityType::Llc);
        assert_eq!(EntityType::parse("llc").unwrap(), EntityType::Llc);
        assert_eq!(EntityType::parse("S-Corp").unwrap(), EntityType::SCorp);
        assert_eq!(EntityType::parse("S Corp").unwrap(), EntityType::SCorp);
        assert_eq!(EntityType::parse("C-Corp").unwrap(), EntityType::CCorp);
        assert!(EntityType::parse("Partnership").is_err());
    }

    #[test]
    fn test_tax_form_number_mapping() {
        assert_eq!(EntityType::Llc.tax_form_number(), "1065");
        assert_eq!(EntityType::SCorp.tax_form_number(), "1120-S");
        assert_eq!(EntityType::CCorp.tax_form_number(), "1120");
    }

    #[test]
    fn test_record_from_json() {
        let value = json!({
            "Company Name": "Acme Widgets LLC",
            "Company Address": "123 Main St, Miami, FL 33101",
            "Entity Type": "LLC",
            "Formation State": "Florida",
            "Business Purpose": "Retail sale of widgets",
            "Business Phone": "305-555-0100",
            "Payment Date": "2024-03-15",
            "Owner Count": 2,
            "Owner 1 Name": "Jane Roe",
            "Owner 1 Ownership": 0.6,
        });

        let record = EntityRecord::from_json(&value).unwrap();
        assert_eq!(record.company_name, "Acme Widgets LLC");
        assert_eq!(record.entity_type, EntityType::Llc);
        assert_eq!(record.role_count(Role::Owner), Some(2));
        assert_eq!(record.slot_field(Role::Owner, 1, "Name"), "Jane Roe");
        assert_eq!(record.slot_field(Role::Owner, 1, "Ownership"), "0.6");
        assert_eq!(record.slot_field(Role::Owner, 2, "Name"), "");
    }

    #[test]
    fn test_record_missing_entity_type() {
        let value = json!({ "Company Name": "Acme" });
        assert!(EntityRecord::from_json(&value).is_err());
    }
}
