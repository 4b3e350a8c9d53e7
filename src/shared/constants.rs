/// Categories seeded into an empty catalog on first start.
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Seafood", "seafood"),
    ("Handicrafts", "handicrafts"),
    ("Spices", "spices"),
    ("Organic Produce", "organic-produce"),
    ("Beverages", "beverages"),
    ("Art", "art"),
    ("Clothing", "clothing"),
    ("Other", "other"),
];

/// Geocode queries shorter than this are answered with an empty list
/// without calling the upstream provider.
pub const MIN_GEOCODE_QUERY_LEN: usize = 2;

pub const DEFAULT_GEOCODE_LIMIT: u32 = 8;
pub const MAX_GEOCODE_LIMIT: u32 = 20;
