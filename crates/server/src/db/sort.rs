//! Allow-listed sort keys for listing queries.
//!
//! Untrusted `sort`/`order` query parameters are resolved to these closed
//! enums before any SQL is assembled. Only the static fragments returned
//! by `column()`/`sql()` ever reach a query string; unrecognized input
//! falls back to the default variant instead of failing.

/// Sort direction. Anything other than `desc` sorts ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Resolve an untrusted parameter, falling back to `default`.
    #[must_use]
    pub fn from_param(param: Option<&str>, default: Self) -> Self {
        match param {
            Some("asc") => Self::Asc,
            Some("desc") => Self::Desc,
            _ => default,
        }
    }

    /// The SQL fragment for this direction.
    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Sortable columns of the admin user listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSortKey {
    #[default]
    Name,
    Email,
    Role,
}

impl UserSortKey {
    /// Resolve an untrusted parameter, falling back to the default key.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("email") => Self::Email,
            Some("role") => Self::Role,
            _ => Self::Name,
        }
    }

    /// The column this key sorts by.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Role => "role",
        }
    }
}

/// Sortable columns of the admin store listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreSortKey {
    #[default]
    Name,
    Email,
    Address,
    AverageRating,
}

impl StoreSortKey {
    /// Resolve an untrusted parameter, falling back to the default key.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("email") => Self::Email,
            Some("address") => Self::Address,
            Some("average_rating") => Self::AverageRating,
            _ => Self::Name,
        }
    }

    /// The column this key sorts by. `average_rating` refers to the
    /// computed aggregate alias, not a stored column.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Name => "s.name",
            Self::Email => "s.email",
            Self::Address => "s.address",
            Self::AverageRating => "average_rating",
        }
    }
}

/// Sortable columns of the customer store listing (no email column there).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomerStoreSortKey {
    #[default]
    Name,
    Address,
    AverageRating,
}

impl CustomerStoreSortKey {
    /// Resolve an untrusted parameter, falling back to the default key.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("address") => Self::Address,
            Some("average_rating") => Self::AverageRating,
            _ => Self::Name,
        }
    }

    /// The column this key sorts by.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Name => "s.name",
            Self::Address => "s.address",
            Self::AverageRating => "average_rating",
        }
    }
}

/// Sortable columns of the owner's per-rating listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatingSortKey {
    #[default]
    CreatedAt,
    Rating,
    UserName,
}

impl RatingSortKey {
    /// Resolve an untrusted parameter, falling back to the default key.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("rating") => Self::Rating,
            Some("user_name") => Self::UserName,
            _ => Self::CreatedAt,
        }
    }

    /// The column this key sorts by.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "r.created_at",
            Self::Rating => "r.rating",
            Self::UserName => "u.name",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_defaults() {
        assert_eq!(
            SortOrder::from_param(None, SortOrder::Asc),
            SortOrder::Asc
        );
        assert_eq!(
            SortOrder::from_param(None, SortOrder::Desc),
            SortOrder::Desc
        );
        assert_eq!(
            SortOrder::from_param(Some("desc"), SortOrder::Asc),
            SortOrder::Desc
        );
        // Anything unrecognized keeps the default
        assert_eq!(
            SortOrder::from_param(Some("DESC; DROP TABLE users"), SortOrder::Asc),
            SortOrder::Asc
        );
    }

    #[test]
    fn test_user_sort_key_allow_list() {
        assert_eq!(UserSortKey::from_param(Some("email")), UserSortKey::Email);
        assert_eq!(UserSortKey::from_param(Some("role")), UserSortKey::Role);
        assert_eq!(UserSortKey::from_param(None), UserSortKey::Name);
        // Unrecognized keys fall back rather than failing
        assert_eq!(
            UserSortKey::from_param(Some("password_hash")),
            UserSortKey::Name
        );
    }

    #[test]
    fn test_store_sort_key_allow_list() {
        assert_eq!(
            StoreSortKey::from_param(Some("average_rating")),
            StoreSortKey::AverageRating
        );
        assert_eq!(
            StoreSortKey::from_param(Some("1; DELETE FROM stores")),
            StoreSortKey::Name
        );
    }

    #[test]
    fn test_rating_sort_key_allow_list() {
        assert_eq!(
            RatingSortKey::from_param(Some("user_name")),
            RatingSortKey::UserName
        );
        assert_eq!(RatingSortKey::from_param(Some("id")), RatingSortKey::CreatedAt);
    }

    #[test]
    fn test_columns_are_static_identifiers() {
        // Every resolvable fragment is a fixed identifier; nothing caller
        // supplied can appear here.
        for key in [
            UserSortKey::Name.column(),
            StoreSortKey::AverageRating.column(),
            CustomerStoreSortKey::Address.column(),
            RatingSortKey::UserName.column(),
            SortOrder::Asc.sql(),
            SortOrder::Desc.sql(),
        ] {
            assert!(
                key.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
            );
        }
    }
}
