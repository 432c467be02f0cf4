//! Static regional-agency directory.
//!
//! Read-only reference data rendered into every report; nothing here is
//! mutated at runtime.

/// A regional contact for reporting suspected contamination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agency {
    pub name: &'static str,
    pub region: &'static str,
    pub contact: &'static str,
}

/// Agencies surfaced in every exported report.
pub const DIRECTORY: &[Agency] = &[
    Agency {
        name: "Fisheries and Aquatic Resources Bureau",
        region: "Northern Coastal District",
        contact: "(075) 555-4045",
    },
    Agency {
        name: "Regional Fisheries Health Office",
        region: "Central Bay District",
        contact: "(082) 555-0261",
    },
    Agency {
        name: "Shellfish and Seafood Safety Desk",
        region: "Southern Island District",
        contact: "(063) 555-8812",
    },
    Agency {
        name: "National Red Tide Hotline",
        region: "Nationwide",
        contact: "1-800-555-7233",
    },
];

/// First agency whose region matches, case-insensitively.
pub fn for_region(region: &str) -> Option<&'static Agency> {
    DIRECTORY.iter().find(|a| a.region.eq_ignore_ascii_case(region))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_lookup_ignores_case() {
        let agency = for_region("nationwide").expect("hotline entry should exist");
        assert_eq!(agency.name, "National Red Tide Hotline");
        assert!(for_region("atlantis").is_none());
    }
}
