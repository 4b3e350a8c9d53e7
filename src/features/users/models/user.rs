use sqlx::FromRow;

pub const ROLE_BUYER: &str = "buyer";
pub const ROLE_SELLER: &str = "seller";

/// Legacy role label still found in old catalogs; rewritten to 'seller' by
/// the startup schema evolution.
pub const ROLE_LEGACY_PRODUCER: &str = "producer";

/// Raw database row for a user. Store columns are nullable at the storage
/// layer; [`User`] is the typed view.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub store_name: Option<String>,
    pub store_location: Option<String>,
    pub store_city: Option<String>,
    pub store_latitude: Option<f64>,
    pub store_longitude: Option<f64>,
    pub store_address: Option<String>,
    pub store_image: Option<String>,
}

/// Store profile carried only by sellers
#[derive(Debug, Clone)]
pub struct StoreProfile {
    /// Display name; falls back to the username when no store name is set
    pub name: String,
    pub location: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub image: Option<String>,
}

/// Role as a closed tagged type: a buyer value cannot structurally carry
/// store fields.
#[derive(Debug, Clone)]
pub enum Role {
    Buyer,
    Seller(StoreProfile),
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn is_seller(&self) -> bool {
        matches!(self.role, Role::Seller(_))
    }

    pub fn store_profile(&self) -> Option<&StoreProfile> {
        match &self.role {
            Role::Seller(profile) => Some(profile),
            Role::Buyer => None,
        }
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let role = if row.role == ROLE_SELLER {
            Role::Seller(StoreProfile {
                name: row.store_name.unwrap_or_else(|| row.username.clone()),
                location: row.store_location,
                city: row.store_city,
                latitude: row.store_latitude,
                longitude: row.store_longitude,
                address: row.store_address,
                image: row.store_image,
            })
        } else {
            Role::Buyer
        };

        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(role: &str, store_name: Option<&str>) -> UserRow {
        UserRow {
            id: 1,
            username: "Maria".to_string(),
            email: "maria@example.com".to_string(),
            role: role.to_string(),
            store_name: store_name.map(str::to_owned),
            store_location: None,
            store_city: None,
            store_latitude: None,
            store_longitude: None,
            store_address: None,
            store_image: None,
        }
    }

    #[test]
    fn buyer_carries_no_store_profile() {
        let user: User = row(ROLE_BUYER, Some("should be ignored")).into();
        assert!(!user.is_seller());
        assert!(user.store_profile().is_none());
    }

    #[test]
    fn seller_store_name_falls_back_to_username() {
        let user: User = row(ROLE_SELLER, None).into();
        assert_eq!(user.store_profile().unwrap().name, "Maria");

        let named: User = row(ROLE_SELLER, Some("Maria's Catch")).into();
        assert_eq!(named.store_profile().unwrap().name, "Maria's Catch");
    }
}
