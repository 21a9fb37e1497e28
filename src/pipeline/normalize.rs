use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants;
use crate::pipeline::validate::RequiredFields;
use crate::types::{field_text, ContactInfo, OwnerRecord, RawRow};

// Trailing legal-entity suffix and anything after it. The word boundary keeps
// names like "Incline Energy" intact; "Acme LLC, a Delaware LLC" still loses the tail.
static LEGAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+(LLC|INC|LP|CORP)\b.*$").expect("static suffix regex"));

/// Owner name with a trailing LLC/INC/LP/CORP suffix removed
pub fn canonical_name(owner_name: &str) -> String {
    LEGAL_SUFFIX
        .replace(owner_name.trim(), "")
        .trim()
        .to_string()
}

fn trimmed(row: &RawRow, field: &str) -> Option<String> {
    field_text(row, field).map(|s| s.trim().to_string())
}

pub fn contact_info(row: &RawRow) -> ContactInfo {
    ContactInfo {
        phone: trimmed(row, constants::PHONE),
        email: trimmed(row, constants::EMAIL),
        address: trimmed(row, constants::ADDRESS),
        status: trimmed(row, constants::STATUS),
        last_updated: trimmed(row, constants::LAST_UPDATED),
    }
}

/// Build the record for a row that already passed validation
pub fn build_owner(row: &RawRow, fields: RequiredFields, section: u8) -> OwnerRecord {
    let owner_name = fields.owner_name.trim().to_string();
    let canonical_name =
        trimmed(row, constants::CANONICAL_NAME).unwrap_or_else(|| canonical_name(&owner_name));

    OwnerRecord {
        canonical_name,
        owner_name,
        entity_type: trimmed(row, constants::ENTITY_TYPE)
            .unwrap_or_else(|| constants::DEFAULT_ENTITY_TYPE.to_string()),
        county: fields.county.trim().to_string(),
        township: fields.township.trim().to_string(),
        township_direction: trimmed(row, constants::TWP_DIR)
            .unwrap_or_else(|| constants::DEFAULT_TWP_DIR.to_string()),
        range: fields.range.trim().to_string(),
        range_direction: trimmed(row, constants::RNG_DIR)
            .unwrap_or_else(|| constants::DEFAULT_RNG_DIR.to_string()),
        section,
        dsu_key: fields.dsu_key.trim().to_string(),
        wi_signal: fields.wi_signal.trim().to_string(),
        evidence_link: fields.evidence_link.trim().to_string(),
        contact: contact_info(row),
    }
}
