use sqlx::FromRow;

/// Database model for a category dictionary entry
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Category joined with its listing count, for the browse page
#[derive(Debug, Clone, FromRow)]
pub struct CategoryWithCount {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub listing_count: i64,
}
