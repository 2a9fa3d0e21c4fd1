//! Generic paginated-list query engine.
//!
//! Implemented once and reused across entity types: ordering resolution,
//! free-text search, column filtering, and pagination arithmetic over any
//! listable relation.

pub mod query_builder;
pub mod types;

pub use query_builder::ListQueryBuilder;
pub use types::{
    DEFAULT_PAGE_SIZE, ListEssentials, ListParams, OrderingKey, PaginatedList, SortDirection,
    SortTerm, total_pages,
};
