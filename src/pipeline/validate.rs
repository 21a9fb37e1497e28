use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::constants;
use crate::error::RowError;
use crate::pipeline::normalize::build_owner;
use crate::types::{field_text, OwnerRecord, RawRow};

// ASCII digits only; `\d` would also accept other Unicode decimal digits
static TOWNSHIP_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+[NS]$").expect("static township regex"));
static RANGE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+[EW]$").expect("static range regex"));

/// Required cell text pulled from a row, untrimmed
#[derive(Debug, Clone)]
pub struct RequiredFields {
    pub owner_name: String,
    pub county: String,
    pub township: String,
    pub range: String,
    pub section: String,
    pub dsu_key: String,
    pub wi_signal: String,
    pub evidence_link: String,
}

/// Spreadsheet row number for a zero-based data index; row 1 is the header
pub fn sheet_row_number(index: usize) -> usize {
    index + 2
}

/// Validate one raw row and build its owner record.
///
/// Checks run in a fixed order and stop at the first failure: required fields,
/// township token, range token, section range, evidence link.
pub fn validate_row(row: &RawRow, index: usize) -> Result<OwnerRecord, RowError> {
    let row_number = sheet_row_number(index);

    let fields = required_fields(row, row_number)?;

    let twp_dir = field_text(row, constants::TWP_DIR);
    let township = format!(
        "{}{}",
        fields.township,
        twp_dir.as_deref().unwrap_or(constants::DEFAULT_TWP_DIR)
    );
    if !TOWNSHIP_TOKEN.is_match(&township) {
        return Err(RowError::InvalidTownship { row: row_number });
    }

    let rng_dir = field_text(row, constants::RNG_DIR);
    let range = format!(
        "{}{}",
        fields.range,
        rng_dir.as_deref().unwrap_or(constants::DEFAULT_RNG_DIR)
    );
    if !RANGE_TOKEN.is_match(&range) {
        return Err(RowError::InvalidRange { row: row_number });
    }

    let section = parse_section(&fields.section)
        .ok_or(RowError::SectionOutOfRange { row: row_number })?;

    if !is_absolute_url(&fields.evidence_link) {
        return Err(RowError::InvalidEvidenceLink { row: row_number });
    }

    Ok(build_owner(row, fields, section))
}

fn required_fields(row: &RawRow, row_number: usize) -> Result<RequiredFields, RowError> {
    let require = |field: &'static str| {
        field_text(row, field).ok_or(RowError::MissingField {
            row: row_number,
            field,
        })
    };

    // Same order as constants::REQUIRED_FIELDS so the first missing field is reported
    Ok(RequiredFields {
        owner_name: require(constants::OWNER_NAME)?,
        county: require(constants::COUNTY)?,
        township: require(constants::TWP)?,
        range: require(constants::RNG)?,
        section: require(constants::SEC)?,
        dsu_key: require(constants::DSU_KEY)?,
        wi_signal: require(constants::WI_SIGNAL)?,
        evidence_link: require(constants::EVIDENCE_LINK)?,
    })
}

/// Whole number in 1..=36. Fractional text such as "12.5" is rejected.
pub fn parse_section(text: &str) -> Option<u8> {
    let value: i64 = text.trim().parse().ok()?;
    if (constants::MIN_SECTION..=constants::MAX_SECTION).contains(&value) {
        u8::try_from(value).ok()
    } else {
        None
    }
}

pub fn is_absolute_url(text: &str) -> bool {
    Url::parse(text.trim()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn row(value: Value) -> RawRow {
        value.as_object().cloned().unwrap()
    }

    fn valid_row() -> Value {
        json!({
            "Owner_Name": "Acme Resources LLC",
            "County": "Garfield",
            "Twp": "6",
            "Rng": "95",
            "Sec": 12,
            "DSU_Key": "6S-95W-SEC12",
            "WI_Signal": "Order-WI",
            "Evidence_Link": "https://example.com/order.pdf"
        })
    }

    fn with(field: &str, value: Value) -> RawRow {
        let mut r = row(valid_row());
        r.insert(field.to_string(), value);
        r
    }

    #[test]
    fn test_valid_row_with_defaults() {
        let owner = validate_row(&row(valid_row()), 0).unwrap();
        assert_eq!(owner.township_direction, "S");
        assert_eq!(owner.range_direction, "W");
        assert_eq!(owner.section, 12);
        assert_eq!(owner.canonical_name, "Acme Resources");
        assert_eq!(owner.entity_type, "LLC");
    }

    #[test]
    fn test_each_missing_field_reports_that_field() {
        for field in constants::REQUIRED_FIELDS {
            let mut r = row(valid_row());
            r.remove(field);
            let err = validate_row(&r, 3).unwrap_err();
            assert_eq!(err, RowError::MissingField { row: 5, field });
            assert_eq!(
                err.to_string(),
                format!("Row 5: Missing required field '{}'", field)
            );
        }
    }

    #[test]
    fn test_blank_and_null_count_as_missing() {
        let err = validate_row(&with("County", json!("   ")), 0).unwrap_err();
        assert_eq!(err, RowError::MissingField { row: 2, field: "County" });

        let err = validate_row(&with("WI_Signal", Value::Null), 0).unwrap_err();
        assert_eq!(err, RowError::MissingField { row: 2, field: "WI_Signal" });
    }

    #[test]
    fn test_first_missing_field_wins() {
        let mut r = row(valid_row());
        r.remove("Evidence_Link");
        r.remove("Twp");
        let err = validate_row(&r, 0).unwrap_err();
        assert_eq!(err, RowError::MissingField { row: 2, field: "Twp" });
    }

    #[test]
    fn test_township_token() {
        assert!(validate_row(&with("Twp", json!(6)), 0).is_ok());
        assert_eq!(
            validate_row(&with("Twp", json!("6X")), 0).unwrap_err(),
            RowError::InvalidTownship { row: 2 }
        );

        let mut r = with("Twp", json!("6X"));
        r.insert("Twp_Dir".to_string(), json!("N"));
        assert!(matches!(validate_row(&r, 0), Err(RowError::InvalidTownship { .. })));

        // direction already baked into Twp doubles up
        assert!(matches!(
            validate_row(&with("Twp", json!("6S")), 0),
            Err(RowError::InvalidTownship { .. })
        ));

        let mut north = row(valid_row());
        north.insert("Twp_Dir".to_string(), json!("N"));
        assert_eq!(validate_row(&north, 0).unwrap().township_direction, "N");

        assert!(matches!(
            validate_row(&with("Twp_Dir", json!("s")), 0),
            Err(RowError::InvalidTownship { .. })
        ));
    }

    #[test]
    fn test_range_token() {
        assert!(validate_row(&with("Rng", json!(95)), 0).is_ok());
        assert_eq!(
            validate_row(&with("Rng", json!("abc")), 4).unwrap_err(),
            RowError::InvalidRange { row: 6 }
        );
        assert!(matches!(
            validate_row(&with("Rng_Dir", json!("N")), 0),
            Err(RowError::InvalidRange { .. })
        ));
        let owner = validate_row(&with("Rng_Dir", json!("E")), 0).unwrap();
        assert_eq!(owner.range_direction, "E");
    }

    #[test]
    fn test_section_bounds() {
        for ok in [json!(1), json!(36), json!("18"), json!(" 7 "), json!(12.0)] {
            assert!(validate_row(&with("Sec", ok.clone()), 0).is_ok(), "{ok}");
        }
        for bad in [json!(0), json!(37), json!(-3), json!("twelve"), json!("12.5"), json!(12.5)] {
            assert_eq!(
                validate_row(&with("Sec", bad.clone()), 0).unwrap_err(),
                RowError::SectionOutOfRange { row: 2 },
                "{bad}"
            );
        }
    }

    #[test]
    fn test_evidence_link() {
        assert!(validate_row(&with("Evidence_Link", json!("https://example.com/order.pdf")), 0).is_ok());
        assert_eq!(
            validate_row(&with("Evidence_Link", json!("not a url")), 0).unwrap_err(),
            RowError::InvalidEvidenceLink { row: 2 }
        );
        assert!(validate_row(&with("Evidence_Link", json!("/orders/201.pdf")), 0).is_err());
    }

    #[test]
    fn test_parse_section() {
        assert_eq!(parse_section("1"), Some(1));
        assert_eq!(parse_section("36"), Some(36));
        assert_eq!(parse_section("0"), None);
        assert_eq!(parse_section(""), None);
        assert_eq!(parse_section("99999999999999999999"), None);
    }
}
