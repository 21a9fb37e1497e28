use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One loosely-typed spreadsheet row keyed by header name, as handed over by the workbook loader
pub type RawRow = serde_json::Map<String, Value>;

/// Optional contact details carried alongside an owner when the source sheet has them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(rename = "Phone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "Email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "Address", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "Last_Updated", default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        self.phone.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.status.is_none()
            && self.last_updated.is_none()
    }

    /// Values in `constants::CONTACT_COLUMNS` order
    pub fn values(&self) -> [Option<&str>; 5] {
        [
            self.phone.as_deref(),
            self.email.as_deref(),
            self.address.as_deref(),
            self.status.as_deref(),
            self.last_updated.as_deref(),
        ]
    }
}

/// A validated non-operated working interest owner for one drilling spacing unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRecord {
    #[serde(rename = "Owner_Name")]
    pub owner_name: String,
    #[serde(rename = "Canonical_Name")]
    pub canonical_name: String,
    #[serde(rename = "Entity_Type")]
    pub entity_type: String,
    #[serde(rename = "County")]
    pub county: String,
    #[serde(rename = "Twp")]
    pub township: String,
    #[serde(rename = "Twp_Dir")]
    pub township_direction: String,
    #[serde(rename = "Rng")]
    pub range: String,
    #[serde(rename = "Rng_Dir")]
    pub range_direction: String,
    #[serde(rename = "Sec")]
    pub section: u8,
    #[serde(rename = "DSU_Key")]
    pub dsu_key: String,
    #[serde(rename = "WI_Signal")]
    pub wi_signal: String,
    #[serde(rename = "Evidence_Link")]
    pub evidence_link: String,
    #[serde(flatten)]
    pub contact: ContactInfo,
}

impl OwnerRecord {
    /// Composite key used for deduplication
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.canonical_name, &self.dsu_key)
    }

    pub fn township_token(&self) -> String {
        format!("{}{}", self.township, self.township_direction)
    }

    pub fn range_token(&self) -> String {
        format!("{}{}", self.range, self.range_direction)
    }

    /// PLSS location in query-token form, e.g. `6S-95W-12`
    pub fn location(&self) -> String {
        format!("{}-{}-{}", self.township_token(), self.range_token(), self.section)
    }

    /// Exclusion labels from the order analysis start with "Exclude" (royalty, ORRI, NPRI)
    pub fn is_working_interest(&self) -> bool {
        let signal = self.wi_signal.trim().to_ascii_lowercase();
        !(signal.starts_with("exclude") || signal == "unknown")
    }

    /// Column values in `constants::OWNER_COLUMNS` order
    pub fn column_values(&self) -> [String; 12] {
        [
            self.owner_name.clone(),
            self.canonical_name.clone(),
            self.entity_type.clone(),
            self.county.clone(),
            self.township.clone(),
            self.township_direction.clone(),
            self.range.clone(),
            self.range_direction.clone(),
            self.section.to_string(),
            self.dsu_key.clone(),
            self.wi_signal.clone(),
            self.evidence_link.clone(),
        ]
    }
}

/// Render a scalar cell the way a spreadsheet shows it. Whole floats lose their `.0`
/// so a numeric `6` cell reads as "6". Arrays and objects are not scalar cells.
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64().map(|f| {
                    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                        (f as i64).to_string()
                    } else {
                        f.to_string()
                    }
                })
            }
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Field text if present and not blank. The returned text is untrimmed.
pub fn field_text(row: &RawRow, field: &str) -> Option<String> {
    row.get(field)
        .and_then(cell_text)
        .filter(|s| !s.trim().is_empty())
}
