// Static reference data: code -> display name tables.
//
// These are built once on first use and never mutated.
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub type NameTable = HashMap<&'static str, &'static str>;

/// Countries present in the needs/requirements summary.
pub static ISO3_TO_NAME: Lazy<NameTable> = Lazy::new(|| {
    HashMap::from([
        ("AFG", "Afghanistan"),
        ("BFA", "Burkina Faso"),
        ("CAF", "Central African Republic"),
        ("CMR", "Cameroon"),
        ("COD", "DR Congo"),
        ("COL", "Colombia"),
        ("GTM", "Guatemala"),
        ("HND", "Honduras"),
        ("HTI", "Haiti"),
        ("MLI", "Mali"),
        ("MMR", "Myanmar"),
        ("MOZ", "Mozambique"),
        ("NER", "Niger"),
        ("NGA", "Nigeria"),
        ("SDN", "Sudan"),
        ("SLV", "El Salvador"),
        ("SOM", "Somalia"),
        ("SSD", "South Sudan"),
        ("TCD", "Chad"),
        ("UKR", "Ukraine"),
        ("VEN", "Venezuela"),
        ("YEM", "Yemen"),
    ])
});

/// Countries covered by the 2026-2030 forecast artifacts. Wider than
/// `ISO3_TO_NAME` because the forecasting pipeline tracks more countries.
pub static FORECAST_COUNTRY_NAMES: Lazy<NameTable> = Lazy::new(|| {
    HashMap::from([
        ("AFG", "Afghanistan"),
        ("AGO", "Angola"),
        ("BDI", "Burundi"),
        ("BEN", "Benin"),
        ("BFA", "Burkina Faso"),
        ("BGD", "Bangladesh"),
        ("CAF", "Central African Republic"),
        ("CMR", "Cameroon"),
        ("COD", "DR Congo"),
        ("COG", "Congo"),
        ("COL", "Colombia"),
        ("DJI", "Djibouti"),
        ("ECU", "Ecuador"),
        ("EGY", "Egypt"),
        ("ETH", "Ethiopia"),
        ("GIN", "Guinea"),
        ("GMB", "Gambia"),
        ("GTM", "Guatemala"),
        ("HND", "Honduras"),
        ("HTI", "Haiti"),
        ("IRN", "Iran"),
        ("IRQ", "Iraq"),
        ("JOR", "Jordan"),
        ("KEN", "Kenya"),
        ("LBN", "Lebanon"),
        ("LBR", "Liberia"),
        ("LBY", "Libya"),
        ("LSO", "Lesotho"),
        ("MLI", "Mali"),
        ("MMR", "Myanmar"),
        ("MOZ", "Mozambique"),
        ("MRT", "Mauritania"),
        ("NER", "Niger"),
        ("NGA", "Nigeria"),
        ("NPL", "Nepal"),
        ("PAK", "Pakistan"),
        ("PHL", "Philippines"),
        ("PRK", "North Korea"),
        ("PSE", "Palestine"),
        ("RWA", "Rwanda"),
        ("SDN", "Sudan"),
        ("SEN", "Senegal"),
        ("SLE", "Sierra Leone"),
        ("SLV", "El Salvador"),
        ("SOM", "Somalia"),
        ("SSD", "South Sudan"),
        ("SYR", "Syria"),
        ("TCD", "Chad"),
        ("TGO", "Togo"),
        ("TJK", "Tajikistan"),
        ("TLS", "Timor-Leste"),
        ("TUR", "Turkey"),
        ("TZA", "Tanzania"),
        ("UGA", "Uganda"),
        ("UKR", "Ukraine"),
        ("VEN", "Venezuela"),
        ("YEM", "Yemen"),
        ("ZMB", "Zambia"),
        ("ZWE", "Zimbabwe"),
    ])
});

/// UN humanitarian cluster codes.
pub static SECTOR_TO_NAME: Lazy<NameTable> = Lazy::new(|| {
    HashMap::from([
        ("PRO", "Protection"),
        ("FSC", "Food Security"),
        ("HEA", "Health"),
        ("WSH", "Water, Sanitation & Hygiene"),
        ("PRO-GBV", "Protection - Gender-Based Violence"),
        ("PRO-CPN", "Protection - Child Protection"),
        ("SHL", "Shelter & Non-Food Items"),
        ("EDU", "Education"),
        ("PRO-MIN", "Protection - Mine Action"),
        ("NUT", "Nutrition"),
        ("CCM", "Camp Coordination & Management"),
        ("PRO-HLP", "Protection - Housing, Land & Property"),
        ("MS", "Multi-Sector"),
        ("ERY", "Early Recovery"),
        ("MPC", "Multi-Purpose Cash"),
        ("CSS", "Country Support Services"),
        ("LOG", "Logistics"),
        ("TEL", "Emergency Telecommunications"),
    ])
});

/// Resolve a display name, falling back to the raw code when the table has no
/// entry for it.
pub fn resolve_name(table: &NameTable, code: &str) -> String {
    table
        .get(code)
        .map(|name| name.to_string())
        .unwrap_or_else(|| code.to_string())
}
