//! Static formula-group tables driving the derivation engine
//!
//! Each table names the scalar fields participating in one formula group:
//! sqm/sqft conversion pairs, qty x rate rows, the parts/abstract roll-ups,
//! the area totals, and the two floor-wise cost tables. The engine is data
//! driven; adding a field to the form means adding a row here.

use crate::record::RowCollection;

/// A sqm field and its derived sqft counterpart
#[derive(Debug, Clone, Copy)]
pub struct ConversionPair {
    pub sqm: &'static str,
    pub sqft: &'static str,
}

/// All fixed-schema conversion pairs; dynamic area rows convert per-row
pub const CONVERSION_PAIRS: &[ConversionPair] = &[
    ConversionPair { sqm: "siteAreaSqm", sqft: "siteAreaSqft" },
    ConversionPair { sqm: "landExtentSqm", sqft: "landExtentSqft" },
    ConversionPair { sqm: "plinthAreaSqm", sqft: "plinthAreaSqft" },
    ConversionPair { sqm: "carpetAreaSqm", sqft: "carpetAreaSqft" },
    ConversionPair { sqm: "saleableAreaSqm", sqft: "saleableAreaSqft" },
    ConversionPair { sqm: "superBuiltUpAreaSqm", sqft: "superBuiltUpAreaSqft" },
    ConversionPair { sqm: "groundFloorAreaSqm", sqft: "groundFloorAreaSqft" },
    ConversionPair { sqm: "firstFloorAreaSqm", sqft: "firstFloorAreaSqft" },
    ConversionPair { sqm: "secondFloorAreaSqm", sqft: "secondFloorAreaSqft" },
    ConversionPair { sqm: "thirdFloorAreaSqm", sqft: "thirdFloorAreaSqft" },
    ConversionPair { sqm: "groundFloorBalconySqm", sqft: "groundFloorBalconySqft" },
    ConversionPair { sqm: "firstFloorBalconySqm", sqft: "firstFloorBalconySqft" },
    ConversionPair { sqm: "secondFloorBalconySqm", sqft: "secondFloorBalconySqft" },
    ConversionPair { sqm: "thirdFloorBalconySqm", sqft: "thirdFloorBalconySqft" },
    ConversionPair { sqm: "terraceAreaSqm", sqft: "terraceAreaSqft" },
    ConversionPair { sqm: "parkingAreaSqm", sqft: "parkingAreaSqft" },
    ConversionPair { sqm: "commonAreaSqm", sqft: "commonAreaSqft" },
    ConversionPair { sqm: "gardenAreaSqm", sqft: "gardenAreaSqft" },
    ConversionPair { sqm: "setbackAreaSqm", sqft: "setbackAreaSqft" },
    ConversionPair { sqm: "basementAreaSqm", sqft: "basementAreaSqft" },
    ConversionPair { sqm: "mezzanineAreaSqm", sqft: "mezzanineAreaSqft" },
    ConversionPair { sqm: "stiltAreaSqm", sqft: "stiltAreaSqft" },
    ConversionPair { sqm: "porchAreaSqm", sqft: "porchAreaSqft" },
    ConversionPair { sqm: "utilityAreaSqm", sqft: "utilityAreaSqft" },
    ConversionPair { sqm: "passageAreaSqm", sqft: "passageAreaSqft" },
    ConversionPair { sqm: "shopAreaSqm", sqft: "shopAreaSqft" },
    ConversionPair { sqm: "officeAreaSqm", sqft: "officeAreaSqft" },
    ConversionPair { sqm: "openLandSqm", sqft: "openLandSqft" },
    ConversionPair { sqm: "serviceAreaSqm", sqft: "serviceAreaSqft" },
    ConversionPair { sqm: "amenitySpaceSqm", sqft: "amenitySpaceSqft" },
];

/// A fixed qty x rate row whose value field is derived
#[derive(Debug, Clone, Copy)]
pub struct RateRow {
    pub qty: &'static str,
    pub rate: &'static str,
    pub value: &'static str,
}

/// The ten-item valuation table feeding the cascading outputs
pub const VALUATION_ROWS: &[RateRow] = &[
    RateRow { qty: "landQty", rate: "landRate", value: "landValue" },
    RateRow { qty: "buildingQty", rate: "buildingRate", value: "buildingValue" },
    RateRow { qty: "porticoQty", rate: "porticoRate", value: "porticoValue" },
    RateRow { qty: "verandahQty", rate: "verandahRate", value: "verandahValue" },
    RateRow { qty: "overheadTankQty", rate: "overheadTankRate", value: "overheadTankValue" },
    RateRow { qty: "steelGateQty", rate: "steelGateRate", value: "steelGateValue" },
    RateRow { qty: "openWellQty", rate: "openWellRate", value: "openWellValue" },
    RateRow { qty: "boreWellQty", rate: "boreWellRate", value: "boreWellValue" },
    RateRow { qty: "compoundWallQty", rate: "compoundWallRate", value: "compoundWallValue" },
    RateRow { qty: "pavementQty", rate: "pavementRate", value: "pavementValue" },
];

/// Sum of the ten valuation row values
pub const VALUATION_TOTAL: &str = "totalValuationAmount";

/// Valuation total rounded to the nearest thousand
pub const VALUATION_ROUNDED: &str = "totalValuationRounded";

/// The four cascading valuation outputs as fractions of the rounded total
pub const CASCADE_OUTPUTS: &[(&str, f64)] = &[
    ("fairMarketValue", 1.0),
    ("realizableValue", 0.9),
    ("distressValue", 0.8),
    ("insurableValue", 0.35),
];

/// An itemized part: a fixed list of amount fields rolling into one total
#[derive(Debug, Clone, Copy)]
pub struct PartGroup {
    pub fields: &'static [&'static str],
    pub total: &'static str,
}

/// The four itemized parts of the abstract
pub const PART_GROUPS: &[PartGroup] = &[
    PartGroup {
        fields: &[
            "porticoCost",
            "ornamentalDoorCost",
            "sitoutGrillCost",
            "overheadTankCost",
            "extraGateCost",
        ],
        total: "extraItemsTotal",
    },
    PartGroup {
        fields: &[
            "wardrobeCost",
            "glazedTileCost",
            "extraSinkCost",
            "marbleFlooringCost",
            "interiorDecorationCost",
            "elevationWorkCost",
            "panelingCost",
            "aluminiumWorkCost",
            "falseCeilingCost",
        ],
        total: "amenitiesTotal",
    },
    PartGroup {
        fields: &[
            "separateToiletCost",
            "lumberRoomCost",
            "watchmanRoomCost",
            "playAreaCost",
        ],
        total: "miscellaneousTotal",
    },
    PartGroup {
        fields: &[
            "waterSupplyCost",
            "drainageCost",
            "electricityDepositCost",
            "pavementWorkCost",
        ],
        total: "servicesTotal",
    },
];

/// The six components of the property abstract; the last four are the part
/// totals above
pub const ABSTRACT_COMPONENTS: &[&str] = &[
    "landMarketValue",
    "buildingDepreciatedValue",
    "extraItemsTotal",
    "amenitiesTotal",
    "miscellaneousTotal",
    "servicesTotal",
];

pub const ABSTRACT_TOTAL: &str = "abstractTotal";
pub const ABSTRACT_ROUNDED: &str = "abstractTotalRounded";

/// The owner-share variant of the abstract with its own six components
pub const OWNER_COMPONENTS: &[&str] = &[
    "ownerLandValue",
    "ownerBuildingValue",
    "ownerExtraItemsValue",
    "ownerAmenitiesValue",
    "ownerMiscellaneousValue",
    "ownerServicesValue",
];

pub const OWNER_TOTAL: &str = "ownerAbstractTotal";
pub const OWNER_ROUNDED: &str = "ownerAbstractTotalRounded";

/// A TOTAL pair fed by fixed per-floor areas plus one dynamic collection
#[derive(Debug, Clone, Copy)]
pub struct AreaTotalGroup {
    pub fixed_sqm: &'static [&'static str],
    pub fixed_sqft: &'static [&'static str],
    pub total_sqm: &'static str,
    pub total_sqft: &'static str,
    pub collection: RowCollection,
}

pub const AREA_TOTALS: &[AreaTotalGroup] = &[
    AreaTotalGroup {
        fixed_sqm: &[
            "groundFloorAreaSqm",
            "firstFloorAreaSqm",
            "secondFloorAreaSqm",
            "thirdFloorAreaSqm",
        ],
        fixed_sqft: &[
            "groundFloorAreaSqft",
            "firstFloorAreaSqft",
            "secondFloorAreaSqft",
            "thirdFloorAreaSqft",
        ],
        total_sqm: "totalFloorAreaSqm",
        total_sqft: "totalFloorAreaSqft",
        collection: RowCollection::Extent,
    },
    AreaTotalGroup {
        fixed_sqm: &[
            "groundFloorBalconySqm",
            "firstFloorBalconySqm",
            "secondFloorBalconySqm",
            "thirdFloorBalconySqm",
        ],
        fixed_sqft: &[
            "groundFloorBalconySqft",
            "firstFloorBalconySqft",
            "secondFloorBalconySqft",
            "thirdFloorBalconySqft",
        ],
        total_sqm: "totalBalconyAreaSqm",
        total_sqft: "totalBalconyAreaSqft",
        collection: RowCollection::Balcony,
    },
];

/// A floor-wise cost table: fixed rows plus one dynamic collection, with
/// table-level totals over the sqft and value columns
#[derive(Debug, Clone, Copy)]
pub struct CostTable {
    pub fixed: &'static [RateRow],
    pub total_sqft: &'static str,
    pub total_value: &'static str,
    pub collection: RowCollection,
}

pub const COST_TABLES: &[CostTable] = &[
    CostTable {
        fixed: &[
            RateRow { qty: "groundFloorCostSqft", rate: "groundFloorCostRate", value: "groundFloorCostValue" },
            RateRow { qty: "firstFloorCostSqft", rate: "firstFloorCostRate", value: "firstFloorCostValue" },
            RateRow { qty: "secondFloorCostSqft", rate: "secondFloorCostRate", value: "secondFloorCostValue" },
        ],
        total_sqft: "totalCostSqft",
        total_value: "totalCostValue",
        collection: RowCollection::Cost,
    },
    CostTable {
        fixed: &[
            RateRow { qty: "groundFloorBuiltUpSqft", rate: "groundFloorBuiltUpRate", value: "groundFloorBuiltUpValue" },
            RateRow { qty: "firstFloorBuiltUpSqft", rate: "firstFloorBuiltUpRate", value: "firstFloorBuiltUpValue" },
            RateRow { qty: "secondFloorBuiltUpSqft", rate: "secondFloorBuiltUpRate", value: "secondFloorBuiltUpValue" },
        ],
        total_sqft: "totalBuiltUpSqft",
        total_value: "totalBuiltUpValue",
        collection: RowCollection::BuiltUp,
    },
];

/// All fixed qty x rate rows across the valuation table and both cost tables
pub fn all_rate_rows() -> impl Iterator<Item = &'static RateRow> {
    VALUATION_ROWS
        .iter()
        .chain(COST_TABLES.iter().flat_map(|table| table.fixed.iter()))
}
