//! Persisted entity models.

pub mod category;
pub mod product;

pub use category::Category;
pub use product::Product;

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::error::AppError;
use crate::listing::{ListEssentials, OrderingKey};

/// Maximum stored name length.
pub const NAME_MAX_LEN: usize = 32;

/// A listable persisted resource: unique id plus unique name.
///
/// The query engine and the generic repository are oblivious to which
/// concrete relation they operate on; everything they need is carried here.
pub trait Resource:
    Clone
    + fmt::Debug
    + Send
    + Sync
    + Unpin
    + Serialize
    + for<'r> sqlx::FromRow<'r, PgRow>
    + 'static
{
    /// Ordering keys this resource's list endpoint exposes.
    type Ordering: OrderingKey;

    /// Relation name in the store.
    const TABLE: &'static str;

    /// Columns selected for list and lookup queries.
    const COLUMNS: &'static [&'static str];

    /// Display noun for user-facing messages ("Category", "Product").
    const NOUN: &'static str;

    fn id(&self) -> Uuid;

    fn name(&self) -> &str;

    /// List configuration: the registered order map, search attributes, and
    /// column filters. Constructed fresh per call; validated exhaustively
    /// once at startup.
    fn list_essentials() -> ListEssentials<Self::Ordering>;
}

/// Sort options shared by the category and product list endpoints: by name,
/// ascending (`name`) or descending (`-name`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NameOrdering {
    #[default]
    #[serde(rename = "name")]
    NameAsc,
    #[serde(rename = "-name")]
    NameDesc,
}

impl OrderingKey for NameOrdering {
    fn variants() -> &'static [Self] {
        &[Self::NameAsc, Self::NameDesc]
    }
}

/// Normalize and validate a resource name: trim, reject blank, cap length.
pub fn normalize_name(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("Name must not be blank.".to_string()));
    }
    if trimmed.chars().count() > NAME_MAX_LEN {
        return Err(AppError::BadRequest(format!(
            "Name must be at most {NAME_MAX_LEN} characters."
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed() {
        assert_eq!(normalize_name("  Phones  ").unwrap(), "Phones");
    }

    #[test]
    fn blank_name_rejected() {
        assert!(matches!(normalize_name("   "), Err(AppError::BadRequest(_))));
        assert!(matches!(normalize_name(""), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn overlong_name_rejected() {
        let long = "x".repeat(NAME_MAX_LEN + 1);
        assert!(matches!(normalize_name(&long), Err(AppError::BadRequest(_))));

        let max = "x".repeat(NAME_MAX_LEN);
        assert_eq!(normalize_name(&max).unwrap(), max);
    }

    #[test]
    fn ordering_serde_names() {
        let asc: NameOrdering = serde_json::from_str("\"name\"").unwrap();
        assert_eq!(asc, NameOrdering::NameAsc);

        let desc: NameOrdering = serde_json::from_str("\"-name\"").unwrap();
        assert_eq!(desc, NameOrdering::NameDesc);

        assert_eq!(NameOrdering::default(), NameOrdering::NameAsc);
    }
}
