/// Jurisdiction code used by LegiScan for Congress
pub const FEDERAL_CODE: &str = "US";

/// A state or the federal government, as addressed by the search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Jurisdiction {
    pub code: &'static str,
    pub name: &'static str,
}

impl Jurisdiction {
    pub const fn new(code: &'static str, name: &'static str) -> Self {
        Self { code, name }
    }

    pub fn is_federal(&self) -> bool {
        self.code == FEDERAL_CODE
    }

    /// Look up a jurisdiction by its two-letter code (case-insensitive)
    pub fn from_code(code: &str) -> Option<Jurisdiction> {
        ALL.iter()
            .find(|j| j.code.eq_ignore_ascii_case(code.trim()))
            .copied()
    }

    /// Federal first, then the fifty states ordered by code
    pub fn all() -> &'static [Jurisdiction] {
        ALL
    }
}

static ALL: &[Jurisdiction] = &[
    Jurisdiction::new(FEDERAL_CODE, "Federal"),
    Jurisdiction::new("AK", "Alaska"),
    Jurisdiction::new("AL", "Alabama"),
    Jurisdiction::new("AR", "Arkansas"),
    Jurisdiction::new("AZ", "Arizona"),
    Jurisdiction::new("CA", "California"),
    Jurisdiction::new("CO", "Colorado"),
    Jurisdiction::new("CT", "Connecticut"),
    Jurisdiction::new("DE", "Delaware"),
    Jurisdiction::new("FL", "Florida"),
    Jurisdiction::new("GA", "Georgia"),
    Jurisdiction::new("HI", "Hawaii"),
    Jurisdiction::new("IA", "Iowa"),
    Jurisdiction::new("ID", "Idaho"),
    Jurisdiction::new("IL", "Illinois"),
    Jurisdiction::new("IN", "Indiana"),
    Jurisdiction::new("KS", "Kansas"),
    Jurisdiction::new("KY", "Kentucky"),
    Jurisdiction::new("LA", "Louisiana"),
    Jurisdiction::new("MA", "Massachusetts"),
    Jurisdiction::new("MD", "Maryland"),
    Jurisdiction::new("ME", "Maine"),
    Jurisdiction::new("MI", "Michigan"),
    Jurisdiction::new("MN", "Minnesota"),
    Jurisdiction::new("MO", "Missouri"),
    Jurisdiction::new("MS", "Mississippi"),
    Jurisdiction::new("MT", "Montana"),
    Jurisdiction::new("NC", "North Carolina"),
    Jurisdiction::new("ND", "North Dakota"),
    Jurisdiction::new("NE", "Nebraska"),
    Jurisdiction::new("NH", "New Hampshire"),
    Jurisdiction::new("NJ", "New Jersey"),
    Jurisdiction::new("NM", "New Mexico"),
    Jurisdiction::new("NV", "Nevada"),
    Jurisdiction::new("NY", "New York"),
    Jurisdiction::new("OH", "Ohio"),
    Jurisdiction::new("OK", "Oklahoma"),
    Jurisdiction::new("OR", "Oregon"),
    Jurisdiction::new("PA", "Pennsylvania"),
    Jurisdiction::new("RI", "Rhode Island"),
    Jurisdiction::new("SC", "South Carolina"),
    Jurisdiction::new("SD", "South Dakota"),
    Jurisdiction::new("TN", "Tennessee"),
    Jurisdiction::new("TX", "Texas"),
    Jurisdiction::new("UT", "Utah"),
    Jurisdiction::new("VA", "Virginia"),
    Jurisdiction::new("VT", "Vermont"),
    Jurisdiction::new("WA", "Washington"),
    Jurisdiction::new("WI", "Wisconsin"),
    Jurisdiction::new("WV", "West Virginia"),
    Jurisdiction::new("WY", "Wyoming"),
];
