use std::collections::HashSet;

use crate::types::OwnerRecord;

/// Keep the first record for each `(canonical_name, dsu_key)` pair, preserving input order.
/// Returns the survivors and the number of records dropped.
pub fn dedup_owners(records: Vec<OwnerRecord>) -> (Vec<OwnerRecord>, usize) {
    let keep: Vec<bool> = {
        let mut seen = HashSet::with_capacity(records.len());
        records
            .iter()
            .map(|record| seen.insert(record.dedup_key()))
            .collect()
    };
    let before = records.len();

    let unique: Vec<OwnerRecord> = records
        .into_iter()
        .zip(keep)
        .filter_map(|(record, keep)| keep.then_some(record))
        .collect();

    let dropped = before - unique.len();
    (unique, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContactInfo;

    fn owner(owner_name: &str, canonical: &str, dsu: &str) -> OwnerRecord {
        OwnerRecord {
            owner_name: owner_name.to_string(),
            canonical_name: canonical.to_string(),
            entity_type: "LLC".to_string(),
            county: "Weld".to_string(),
            township: "1".to_string(),
            township_direction: "N".to_string(),
            range: "65".to_string(),
            range_direction: "W".to_string(),
            section: 16,
            dsu_key: dsu.to_string(),
            wi_signal: "Order-WI".to_string(),
            evidence_link: "https://example.com/order.pdf".to_string(),
            contact: ContactInfo::default(),
        }
    }

    #[test]
    fn test_first_occurrence_wins() {
        let records = vec![
            owner("Acme LLC", "Acme", "1N-65W-SEC16"),
            owner("Acme Inc", "Acme", "1N-65W-SEC16"),
            owner("Acme LLC", "Acme", "2N-66W-SEC22"),
        ];
        let (unique, dropped) = dedup_owners(records);
        assert_eq!(dropped, 1);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].owner_name, "Acme LLC");
        assert_eq!(unique[1].dsu_key, "2N-66W-SEC22");
    }

    #[test]
    fn test_key_is_case_sensitive_and_composite() {
        let records = vec![
            owner("a", "Acme", "1N-65W-SEC16"),
            owner("b", "ACME", "1N-65W-SEC16"),
            owner("c", "Other", "1N-65W-SEC16"),
        ];
        let (unique, dropped) = dedup_owners(records);
        assert_eq!(dropped, 0);
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_empty_input() {
        let (unique, dropped) = dedup_owners(Vec::new());
        assert!(unique.is_empty());
        assert_eq!(dropped, 0);
    }
}
