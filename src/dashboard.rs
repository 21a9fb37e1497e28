use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;

use crate::types::OwnerRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_owners: usize,
    pub working_interest: usize,
    pub exclusions: usize,
    /// Distinct DSU keys with at least one owner
    pub sections_covered: usize,
    pub owners_by_county: BTreeMap<String, usize>,
    pub owners_by_entity_type: BTreeMap<String, usize>,
}

impl DashboardStats {
    pub fn from_owners(owners: &[OwnerRecord]) -> Self {
        let mut stats = DashboardStats {
            total_owners: owners.len(),
            ..Default::default()
        };
        let mut sections = HashSet::new();

        for owner in owners {
            if owner.is_working_interest() {
                stats.working_interest += 1;
            } else {
                stats.exclusions += 1;
            }
            sections.insert(owner.dsu_key.as_str());
            *stats.owners_by_county.entry(owner.county.clone()).or_default() += 1;
            *stats
                .owners_by_entity_type
                .entry(owner.entity_type.clone())
                .or_default() += 1;
        }

        stats.sections_covered = sections.len();
        stats
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Total owners:        {}", self.total_owners);
        let _ = writeln!(out, "Working interest:    {}", self.working_interest);
        let _ = writeln!(out, "Exclusions:          {}", self.exclusions);
        let _ = writeln!(out, "Sections covered:    {}", self.sections_covered);
        for (county, count) in &self.owners_by_county {
            let _ = writeln!(out, "  {} County: {}", county, count);
        }
        for (entity_type, count) in &self.owners_by_entity_type {
            let _ = writeln!(out, "  {}: {}", entity_type, count);
        }
        out
    }
}

/// Case-insensitive match on owner, canonical name, county, DSU key or WI signal
pub fn filter_owners<'a>(owners: &'a [OwnerRecord], query: &str) -> Vec<&'a OwnerRecord> {
    let needle = query.trim().to_lowercase();
    owners
        .iter()
        .filter(|o| {
            needle.is_empty()
                || [&o.owner_name, &o.canonical_name, &o.county, &o.dsu_key, &o.wi_signal]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{:<width$}", text, width = width)
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

const COLUMNS: [(&str, usize); 6] = [
    ("Owner", 32),
    ("County", 12),
    ("Location", 12),
    ("DSU Key", 14),
    ("WI Signal", 12),
    ("Evidence", 48),
];

/// Fixed-width text table of owners
pub fn render_table(owners: &[&OwnerRecord]) -> String {
    let mut out = String::new();

    let header: Vec<String> = COLUMNS.iter().map(|(name, w)| fit(name, *w)).collect();
    let _ = writeln!(out, "{}", header.join(" ").trim_end());
    let rule: Vec<String> = COLUMNS.iter().map(|(_, w)| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join(" "));

    for owner in owners {
        let cells = [
            owner.owner_name.clone(),
            owner.county.clone(),
            owner.location(),
            owner.dsu_key.clone(),
            owner.wi_signal.clone(),
            owner.evidence_link.clone(),
        ];
        let row: Vec<String> = cells
            .iter()
            .zip(COLUMNS.iter())
            .map(|(cell, (_, w))| fit(cell, *w))
            .collect();
        let _ = writeln!(out, "{}", row.join(" ").trim_end());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContactInfo;

    fn owner(name: &str, county: &str, dsu: &str, wi: &str, entity: &str) -> OwnerRecord {
        OwnerRecord {
            owner_name: name.to_string(),
            canonical_name: name.to_string(),
            entity_type: entity.to_string(),
            county: county.to_string(),
            township: "6".to_string(),
            township_direction: "S".to_string(),
            range: "95".to_string(),
            range_direction: "W".to_string(),
            section: 12,
            dsu_key: dsu.to_string(),
            wi_signal: wi.to_string(),
            evidence_link: "https://example.com/order.pdf".to_string(),
            contact: ContactInfo::default(),
        }
    }

    fn owners() -> Vec<OwnerRecord> {
        vec![
            owner("Acme", "Garfield", "6S-95W-SEC12", "Order-WI", "LLC"),
            owner("Beta", "Garfield", "6S-95W-SEC12", "Exclude—Royalty/ORRI", "LLC"),
            owner("Gamma", "Rio Blanco", "7S-96W-SEC01", "Non-Op WI", "Individual"),
        ]
    }

    #[test]
    fn test_stats() {
        let stats = DashboardStats::from_owners(&owners());
        assert_eq!(stats.total_owners, 3);
        assert_eq!(stats.working_interest, 2);
        assert_eq!(stats.exclusions, 1);
        assert_eq!(stats.sections_covered, 2);
        assert_eq!(stats.owners_by_county["Garfield"], 2);
        assert_eq!(stats.owners_by_entity_type["Individual"], 1);
    }

    #[test]
    fn test_filter() {
        let owners = owners();
        assert_eq!(filter_owners(&owners, "rio").len(), 1);
        assert_eq!(filter_owners(&owners, "SEC12").len(), 2);
        assert_eq!(filter_owners(&owners, "  ").len(), 3);
        assert!(filter_owners(&owners, "nobody").is_empty());
    }

    #[test]
    fn test_table_truncates_long_cells() {
        let long = owner(&"X".repeat(40), "Garfield", "6S-95W-SEC12", "Order-WI", "LLC");
        let table = render_table(&[&long]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Owner"));
        assert!(lines[2].starts_with(&format!("{}…", "X".repeat(31))));
        assert!(lines[2].contains("6S-95W-12"));
    }
}
