//! Shop product model.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{NameOrdering, Resource};
use crate::listing::{ListEssentials, SortTerm};

/// A shop product.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Unique identifier (UUIDv4).
    pub id: Uuid,

    /// Unique display name (<= 32 chars).
    pub name: String,
}

impl Resource for Product {
    type Ordering = NameOrdering;

    const TABLE: &'static str = "shop_product";
    const COLUMNS: &'static [&'static str] = &["id", "name"];
    const NOUN: &'static str = "Product";

    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn list_essentials() -> ListEssentials<NameOrdering> {
        ListEssentials::new(HashMap::from([
            (NameOrdering::NameAsc, vec![SortTerm::asc("name")]),
            (NameOrdering::NameDesc, vec![SortTerm::desc("name")]),
        ]))
        .with_search_attrs(vec!["name"])
    }
}
