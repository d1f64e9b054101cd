//! Field-name tables: validation rules, boolean fields, prefill groups, and
//! the logical editor tabs

/// Scalar fields that must be present before a save is accepted
pub const REQUIRED_FIELDS: &[&str] = &[
    "applicantName",
    "propertyAddress",
    "place",
    "inspectionDate",
];

/// Coordinate fields with their allowed ranges
pub const COORDINATE_RANGES: &[(&str, f64, f64)] = &[
    ("latitude", -90.0, 90.0),
    ("longitude", -180.0, 180.0),
];

/// Fields that are boolean-typed on the wire
///
/// Sources sometimes deliver these as the literal strings "true"/"false";
/// the reconciler normalizes them to real booleans, anything else to false.
pub const BOOL_FIELDS: &[&str] = &[
    "paymentCollected",
    "isRented",
    "hasApprovedPlan",
    "underConstruction",
];

/// Flag that makes the collector field mandatory
pub const PAYMENT_FLAG_FIELD: &str = "paymentCollected";

/// Required whenever the payment flag is set
pub const PAYMENT_COLLECTOR_FIELD: &str = "paymentCollectedBy";

/// General/location fields copied from the prefill template
pub const PREFILL_GENERAL: &[&str] = &[
    "place",
    "city",
    "district",
    "state",
    "postalCode",
    "zone",
    "jurisdiction",
    "localityType",
];

/// Valuation-rate fields copied from the prefill template
pub const PREFILL_VALUATION: &[&str] = &[
    "landRatePerSqft",
    "buildingRatePerSqft",
    "guidelineRate",
    "depreciationRate",
];

/// Market-condition fields copied from the prefill template
pub const PREFILL_MARKET: &[&str] = &[
    "marketability",
    "demandAndSupply",
    "rentalTrend",
    "priceTrend",
];

/// Unit-specification fields copied from the prefill template
pub const PREFILL_UNIT_SPEC: &[&str] = &[
    "constructionType",
    "foundationType",
    "roofType",
    "flooringType",
    "wallFinish",
    "doorsAndWindows",
];

/// The four curated groups a prefill may touch; nothing outside these is
/// ever copied from the template
pub const PREFILL_GROUPS: [&[&str]; 4] = [
    PREFILL_GENERAL,
    PREFILL_VALUATION,
    PREFILL_MARKET,
    PREFILL_UNIT_SPEC,
];

/// Logical editor tab, each with its own unsent-edit cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    General,
    Location,
    Valuation,
    Market,
    UnitSpecification,
}

impl Tab {
    /// Declared order; tab caches merge in this order on load
    pub const ALL: [Tab; 5] = [
        Tab::General,
        Tab::Location,
        Tab::Valuation,
        Tab::Market,
        Tab::UnitSpecification,
    ];

    /// Stable name used in cache keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::General => "general",
            Tab::Location => "location",
            Tab::Valuation => "valuation",
            Tab::Market => "market",
            Tab::UnitSpecification => "unitSpecification",
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
