use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

use crate::app::ports::OwnerSource;
use crate::constants;
use crate::error::{NowiError, Result};
use crate::pipeline::canonical_name;
use crate::plss::PlssToken;
use crate::types::{ContactInfo, OwnerRecord};

pub const MOCK_ECMC_SOURCE: &str = "mock_ecmc";

const FIRST_NAMES: &[&str] = &[
    "John", "Mary", "Robert", "Jennifer", "Michael", "Linda", "David", "Patricia", "James",
    "Susan", "William", "Elizabeth", "Christopher", "Barbara", "Daniel", "Jessica", "Matthew",
    "Sarah", "Anthony", "Karen",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Anderson", "Taylor", "Thomas", "Hernandez", "Moore", "Martin", "Jackson",
    "Thompson", "White", "Lopez",
];

const COMPANIES: &[&str] = &[
    "Piceance Energy Holdings LLC",
    "Colorado Basin Resources Inc",
    "Mountain West Oil & Gas Co",
    "Denver Energy Partners LLC",
    "Rocky Mountain Minerals Corp",
    "Western Slope Energy LLC",
    "Garfield County Resources Inc",
    "Mesa Verde Oil Company",
    "High Plains Energy Partners",
    "Colorado Natural Gas LLC",
];

const WI_SIGNALS: &[&str] = &[
    "12.5%", "25%", "6.25%", "18.75%", "8.33%", "16.67%", "20%", "10%", "15%", "5%",
];

const AREA_CODES: &[&str] = &["303", "720", "970", "719"];

const EMAIL_DOMAINS: &[&str] = &["gmail.com", "yahoo.com", "outlook.com", "energycorp.com", "oilgas.net"];

const CITIES: &[&str] = &[
    "Denver",
    "Colorado Springs",
    "Rifle",
    "Grand Junction",
    "Glenwood Springs",
    "Parachute",
    "Battlement Mesa",
];

/// Stand-in for the ECMC orders scraper. Produces one plausible owner per location;
/// real scraping happens in the generated bootstrap script.
pub struct MockEcmcSource {
    rng: Mutex<StdRng>,
    delay: Duration,
}

impl MockEcmcSource {
    pub fn new(seed: Option<u64>, delay: Duration) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
            delay,
        }
    }

    fn generate_owner(&self, token: &PlssToken, county: &str) -> Result<OwnerRecord> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| NowiError::Config("mock source rng poisoned".to_string()))?;
        Ok(owner_for(&mut *rng, token, county))
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

/// `https://ecmc.state.co.us/cogisapp/search?county=<county>&plss=<token>`, query-encoded
pub fn evidence_link(county: &str, token: &PlssToken) -> String {
    match Url::parse_with_params(
        constants::EVIDENCE_SEARCH_URL,
        &[("county", county), ("plss", token.to_string().as_str())],
    ) {
        Ok(url) => url.to_string(),
        // only reachable if EVIDENCE_SEARCH_URL is malformed
        Err(_) => format!("{}?plss={}", constants::EVIDENCE_SEARCH_URL, token),
    }
}

fn owner_for<R: Rng + ?Sized>(rng: &mut R, token: &PlssToken, county: &str) -> OwnerRecord {
    let is_company = rng.gen_bool(0.3);
    let first_name = pick(rng, FIRST_NAMES);
    let last_name = pick(rng, LAST_NAMES);
    let company = pick(rng, COMPANIES);

    let owner_name = if is_company {
        company.to_string()
    } else {
        format!("{} {}", first_name, last_name)
    };
    let entity_type = match (is_company, company.contains("LLC")) {
        (true, true) => "LLC",
        (true, false) => "Corporation",
        (false, _) => "Individual",
    };

    let phone = format!(
        "{}-{}-{}",
        pick(rng, AREA_CODES),
        rng.gen_range(100..1000),
        rng.gen_range(1000..10000)
    );
    let email = if is_company {
        let slug: String = company
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase())
            .collect();
        format!("info@{}.com", slug)
    } else {
        format!(
            "{}.{}@{}",
            first_name.to_ascii_lowercase(),
            last_name.to_ascii_lowercase(),
            pick(rng, EMAIL_DOMAINS)
        )
    };
    let address = format!(
        "{} {} St, {}, CO {}",
        rng.gen_range(1..10000),
        pick(rng, LAST_NAMES),
        pick(rng, CITIES),
        rng.gen_range(80000..170000)
    );
    let status = if rng.gen_bool(0.2) { "Verified" } else { "Active" };
    let last_updated = (Utc::now() - ChronoDuration::days(rng.gen_range(0..365)))
        .format("%Y-%m-%d")
        .to_string();

    OwnerRecord {
        canonical_name: canonical_name(&owner_name),
        owner_name,
        entity_type: entity_type.to_string(),
        county: county.to_string(),
        township: token.township.to_string(),
        township_direction: token.township_dir.to_string(),
        range: token.range.to_string(),
        range_direction: token.range_dir.to_string(),
        section: token.section,
        dsu_key: token.dsu_key(),
        wi_signal: pick(rng, WI_SIGNALS).to_string(),
        evidence_link: evidence_link(county, token),
        contact: ContactInfo {
            phone: Some(phone),
            email: Some(email),
            address: Some(address),
            status: Some(status.to_string()),
            last_updated: Some(last_updated),
        },
    }
}

#[async_trait]
impl OwnerSource for MockEcmcSource {
    fn source_name(&self) -> &'static str {
        MOCK_ECMC_SOURCE
    }

    #[instrument(skip(self, tokens), fields(source = MOCK_ECMC_SOURCE, tokens = tokens.len()))]
    async fn fetch_owners(&self, county: &str, tokens: &[PlssToken]) -> Result<Vec<OwnerRecord>> {
        info!("Generating mock ECMC owners for {} locations in {}", tokens.len(), county);

        let mut owners = Vec::with_capacity(tokens.len());
        for token in tokens {
            owners.push(self.generate_owner(token, county)?);
            debug!("Generated owner for {}", token);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }
        Ok(owners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ImportPipeline;
    use crate::types::RawRow;

    fn tokens() -> Vec<PlssToken> {
        vec![
            "6S-95W-12".parse().unwrap(),
            "7S-96W-1".parse().unwrap(),
            "9S-98W-36".parse().unwrap(),
        ]
    }

    #[tokio::test]
    async fn test_one_owner_per_token() {
        let source = MockEcmcSource::new(Some(42), Duration::ZERO);
        let owners = source.fetch_owners("Garfield", &tokens()).await.unwrap();

        assert_eq!(owners.len(), 3);
        assert_eq!(owners[0].dsu_key, "6S-95W-SEC12");
        assert_eq!(owners[1].dsu_key, "7S-96W-SEC01");
        assert_eq!(owners[2].section, 36);
        assert!(owners.iter().all(|o| o.county == "Garfield"));
        assert!(owners.iter().all(|o| o.contact.phone.is_some()));
    }

    #[tokio::test]
    async fn test_seed_makes_output_reproducible() {
        let a = MockEcmcSource::new(Some(7), Duration::ZERO)
            .fetch_owners("Garfield", &tokens())
            .await
            .unwrap();
        let b = MockEcmcSource::new(Some(7), Duration::ZERO)
            .fetch_owners("Garfield", &tokens())
            .await
            .unwrap();

        let names_a: Vec<_> = a.iter().map(|o| (&o.owner_name, &o.wi_signal)).collect();
        let names_b: Vec<_> = b.iter().map(|o| (&o.owner_name, &o.wi_signal)).collect();
        assert_eq!(names_a, names_b);
    }

    #[test]
    fn test_evidence_link_is_query_encoded() {
        let token: PlssToken = "6S-95W-12".parse().unwrap();
        assert_eq!(
            evidence_link("Rio Blanco", &token),
            "https://ecmc.state.co.us/cogisapp/search?county=Rio+Blanco&plss=6S-95W-12"
        );
    }

    #[tokio::test]
    async fn test_mock_output_passes_import_validation() {
        let source = MockEcmcSource::new(Some(1), Duration::ZERO);
        let owners = source.fetch_owners("Rio Blanco", &tokens()).await.unwrap();

        let rows: Vec<RawRow> = owners
            .iter()
            .map(|o| serde_json::to_value(o).unwrap().as_object().cloned().unwrap())
            .collect();
        let outcome = ImportPipeline::new().run(&rows).unwrap();
        assert_eq!(outcome.summary.error_count, 0);
        assert_eq!(outcome.owners.len(), 3);
    }
}
