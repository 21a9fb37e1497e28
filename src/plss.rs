use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants;
use crate::error::{NowiError, Result};

static PLSS_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+)([NS])-([0-9]+)([EW])-([0-9]+)$").expect("static PLSS regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TownshipDir {
    N,
    S,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeDir {
    E,
    W,
}

impl fmt::Display for TownshipDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TownshipDir::N => "N",
            TownshipDir::S => "S",
        })
    }
}

impl fmt::Display for RangeDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RangeDir::E => "E",
            RangeDir::W => "W",
        })
    }
}

/// A Public Land Survey System location, written `6S-95W-12`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlssToken {
    pub township: u32,
    pub township_dir: TownshipDir,
    pub range: u32,
    pub range_dir: RangeDir,
    pub section: u8,
}

impl PlssToken {
    pub fn new(
        township: u32,
        township_dir: TownshipDir,
        range: u32,
        range_dir: RangeDir,
        section: u8,
    ) -> Result<Self> {
        if !(constants::MIN_SECTION..=constants::MAX_SECTION).contains(&(section as i64)) {
            return Err(NowiError::InvalidPlss(format!(
                "section {} is outside 1-36",
                section
            )));
        }
        Ok(Self {
            township,
            township_dir,
            range,
            range_dir,
            section,
        })
    }

    /// The manual-entry form only covers the Piceance quadrant (south townships, west ranges)
    pub fn south_west(township: u32, range: u32, section: u8) -> Result<Self> {
        Self::new(township, TownshipDir::S, range, RangeDir::W, section)
    }

    /// Drilling spacing unit key, e.g. `6S-95W-SEC12`
    pub fn dsu_key(&self) -> String {
        dsu_key(
            &self.township.to_string(),
            &self.township_dir.to_string(),
            &self.range.to_string(),
            &self.range_dir.to_string(),
            self.section,
        )
    }
}

/// Conventional DSU key layout used by the scraper: `<twp><dir>-<rng><dir>-SEC<sec:02>`, upper-cased
pub fn dsu_key(township: &str, township_dir: &str, range: &str, range_dir: &str, section: u8) -> String {
    format!(
        "{}{}-{}{}-SEC{:02}",
        township, township_dir, range, range_dir, section
    )
    .to_uppercase()
}

impl fmt::Display for PlssToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}-{}{}-{}",
            self.township, self.township_dir, self.range, self.range_dir, self.section
        )
    }
}

impl FromStr for PlssToken {
    type Err = NowiError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase();
        let caps = PLSS_TOKEN
            .captures(&normalized)
            .ok_or_else(|| NowiError::InvalidPlss(format!("Bad PLSS: {}", s.trim())))?;

        let number = |i: usize| -> Result<u32> {
            caps[i]
                .parse::<u32>()
                .map_err(|_| NowiError::InvalidPlss(format!("Bad PLSS: {}", s.trim())))
        };

        let township = number(1)?;
        let township_dir = if &caps[2] == "N" { TownshipDir::N } else { TownshipDir::S };
        let range = number(3)?;
        let range_dir = if &caps[4] == "E" { RangeDir::E } else { RangeDir::W };
        let section = u8::try_from(number(5)?)
            .map_err(|_| NowiError::InvalidPlss(format!("section {} is outside 1-36", &caps[5])))?;

        Self::new(township, township_dir, range, range_dir, section)
    }
}

/// Parse a comma-separated token list, skipping blanks
pub fn parse_token_list(s: &str) -> Result<Vec<PlssToken>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(PlssToken::from_str)
        .collect()
}

/// Match `name` against the supported counties ignoring case and surrounding whitespace
pub fn resolve_county(name: &str) -> Result<&'static str> {
    let name = name.trim();
    constants::get_supported_counties()
        .into_iter()
        .find(|county| county.eq_ignore_ascii_case(name))
        .ok_or_else(|| NowiError::UnsupportedCounty(name.to_string()))
}

/// Ordered, duplicate-free set of locations to query, scoped to one county
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlssQueue {
    entries: Vec<PlssToken>,
    county: Option<String>,
}

impl PlssQueue {
    pub fn new(county: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            county: Some(county.into()),
        }
    }

    /// Piceance Basin preset: 5S-9S, 94W-98W, sections 1/6/12/18/24/30/36 in Garfield County
    pub fn piceance_preset() -> Self {
        let mut queue = Self::new(constants::PRESET_COUNTY);
        for township in constants::PRESET_TOWNSHIPS {
            for range in constants::PRESET_RANGES {
                for section in constants::PRESET_SECTIONS {
                    queue.entries.push(PlssToken {
                        township,
                        township_dir: TownshipDir::S,
                        range,
                        range_dir: RangeDir::W,
                        section,
                    });
                }
            }
        }
        queue
    }

    /// Returns false when the token is already queued
    pub fn add(&mut self, token: PlssToken) -> bool {
        if self.entries.contains(&token) {
            return false;
        }
        self.entries.push(token);
        true
    }

    pub fn add_str(&mut self, token: &str) -> Result<bool> {
        Ok(self.add(token.parse()?))
    }

    pub fn extend_from_list(&mut self, list: &str) -> Result<usize> {
        let mut added = 0;
        for token in parse_token_list(list)? {
            if self.add(token) {
                added += 1;
            }
        }
        Ok(added)
    }

    pub fn remove(&mut self, token: &PlssToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|t| t != token);
        self.entries.len() != before
    }

    pub fn set_county(&mut self, county: impl Into<String>) {
        self.county = Some(county.into());
    }

    pub fn county(&self) -> Option<&str> {
        self.county.as_deref()
    }

    pub fn entries(&self) -> &[PlssToken] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Comma-joined batch as passed to `--plss`
    pub fn to_batch_string(&self) -> String {
        self.entries
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Rough scraper runtime: two minutes per batch of ten locations
    pub fn estimated_minutes(&self) -> usize {
        self.entries.len().div_ceil(constants::SCRAPER_BATCH_SIZE) * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let token: PlssToken = "6S-95W-12".parse().unwrap();
        assert_eq!(token.township, 6);
        assert_eq!(token.township_dir, TownshipDir::S);
        assert_eq!(token.range, 95);
        assert_eq!(token.range_dir, RangeDir::W);
        assert_eq!(token.section, 12);
        assert_eq!(token.to_string(), "6S-95W-12");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let token: PlssToken = " 1n-65w-16 ".parse().unwrap();
        assert_eq!(token.to_string(), "1N-65W-16");
    }

    #[test]
    fn test_parse_rejects_bad_tokens() {
        assert!("6X-95W-12".parse::<PlssToken>().is_err());
        assert!("6S-95W".parse::<PlssToken>().is_err());
        assert!("6S-95W-0".parse::<PlssToken>().is_err());
        assert!("6S-95W-37".parse::<PlssToken>().is_err());
        assert!("6S-95W-999".parse::<PlssToken>().is_err());
    }

    #[test]
    fn test_dsu_key_zero_pads_section() {
        let token = PlssToken::south_west(6, 95, 1).unwrap();
        assert_eq!(token.dsu_key(), "6S-95W-SEC01");
        assert_eq!(dsu_key("1", "n", "65", "w", 16), "1N-65W-SEC16");
    }

    #[test]
    fn test_queue_rejects_duplicates_and_removes() {
        let mut queue = PlssQueue::new("Garfield");
        assert!(queue.add_str("6S-95W-12").unwrap());
        assert!(!queue.add_str("6S-95W-12").unwrap());
        assert!(queue.add_str("7S-96W-1").unwrap());
        assert_eq!(queue.to_batch_string(), "6S-95W-12,7S-96W-1");

        let token = PlssToken::south_west(6, 95, 12).unwrap();
        assert!(queue.remove(&token));
        assert!(!queue.remove(&token));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_piceance_preset() {
        let queue = PlssQueue::piceance_preset();
        assert_eq!(queue.len(), 175);
        assert_eq!(queue.county(), Some("Garfield"));
        assert_eq!(queue.entries()[0].to_string(), "5S-94W-1");
        assert_eq!(queue.entries()[174].to_string(), "9S-98W-36");
        assert_eq!(queue.estimated_minutes(), 36);
    }

    #[test]
    fn test_resolve_county() {
        assert_eq!(resolve_county("garfield").unwrap(), "Garfield");
        assert_eq!(resolve_county("  RIO BLANCO ").unwrap(), "Rio Blanco");
        assert!(matches!(resolve_county("Mesa"), Err(NowiError::UnsupportedCounty(_))));
        assert!(resolve_county("Garfield; rm -rf /").is_err());
    }

    #[test]
    fn test_estimated_minutes() {
        let mut queue = PlssQueue::new("Rio Blanco");
        assert_eq!(queue.estimated_minutes(), 0);
        queue.extend_from_list("5S-94W-1, 5S-94W-6,,").unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.estimated_minutes(), 2);
    }
}
