//! Column and domain constants shared across the importer, exporter and CLI.
//! Column names match the OWNERS sheet written by the ECMC scraper script exactly.

// OWNERS sheet columns
pub const OWNER_NAME: &str = "Owner_Name";
pub const CANONICAL_NAME: &str = "Canonical_Name";
pub const ENTITY_TYPE: &str = "Entity_Type";
pub const COUNTY: &str = "County";
pub const TWP: &str = "Twp";
pub const TWP_DIR: &str = "Twp_Dir";
pub const RNG: &str = "Rng";
pub const RNG_DIR: &str = "Rng_Dir";
pub const SEC: &str = "Sec";
pub const DSU_KEY: &str = "DSU_Key";
pub const WI_SIGNAL: &str = "WI_Signal";
pub const EVIDENCE_LINK: &str = "Evidence_Link";

// Optional contact columns
pub const PHONE: &str = "Phone";
pub const EMAIL: &str = "Email";
pub const ADDRESS: &str = "Address";
pub const STATUS: &str = "Status";
pub const LAST_UPDATED: &str = "Last_Updated";

/// Fixed export column order
pub const OWNER_COLUMNS: [&str; 12] = [
    OWNER_NAME,
    CANONICAL_NAME,
    ENTITY_TYPE,
    COUNTY,
    TWP,
    TWP_DIR,
    RNG,
    RNG_DIR,
    SEC,
    DSU_KEY,
    WI_SIGNAL,
    EVIDENCE_LINK,
];

pub const CONTACT_COLUMNS: [&str; 5] = [PHONE, EMAIL, ADDRESS, STATUS, LAST_UPDATED];

/// Fields that must be present and non-blank on every imported row, checked in this order
pub const REQUIRED_FIELDS: [&str; 8] = [
    OWNER_NAME,
    COUNTY,
    TWP,
    RNG,
    SEC,
    DSU_KEY,
    WI_SIGNAL,
    EVIDENCE_LINK,
];

pub const DEFAULT_TWP_DIR: &str = "S";
pub const DEFAULT_RNG_DIR: &str = "W";
pub const DEFAULT_ENTITY_TYPE: &str = "LLC";

pub const MIN_SECTION: i64 = 1;
pub const MAX_SECTION: i64 = 36;

/// Preferred sheet name in uploaded workbooks (matched case-insensitively)
pub const OWNERS_SHEET: &str = "OWNERS";

/// Number of errors surfaced in an import summary
pub const DEFAULT_ERROR_DISPLAY_CAP: usize = 10;

// Counties
pub const GARFIELD: &str = "Garfield";
pub const RIO_BLANCO: &str = "Rio Blanco";

/// Counties offered by the PLSS query form
pub fn get_supported_counties() -> Vec<&'static str> {
    vec![GARFIELD, RIO_BLANCO]
}

// Piceance Basin preset grid: 5S-9S, 94W-98W
pub const PRESET_TOWNSHIPS: std::ops::RangeInclusive<u32> = 5..=9;
pub const PRESET_RANGES: std::ops::RangeInclusive<u32> = 94..=98;
pub const PRESET_SECTIONS: [u8; 7] = [1, 6, 12, 18, 24, 30, 36];
pub const PRESET_COUNTY: &str = GARFIELD;
pub const PRESET_NAME: &str = "piceance";

/// Tokens handed to one scraper invocation by the bootstrap script
pub const SCRAPER_BATCH_SIZE: usize = 10;

pub const BOOTSTRAP_SCRIPT: &str = "piceance_agent_bootstrap.sh";
pub const EVIDENCE_SEARCH_URL: &str = "https://ecmc.state.co.us/cogisapp/search";
