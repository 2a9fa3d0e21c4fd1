//! Core types for the paginated-list query engine.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::Serialize;

/// Default page size when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u64 = 50;

/// An enumerated sort option exposed to API clients.
///
/// Implementors enumerate their variants so the registered order map can be
/// checked for exhaustiveness when a [`ListEssentials`] is constructed: a
/// variant without sort terms is a caller-side integration bug, not bad
/// input, and fails loudly.
pub trait OrderingKey: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// All variants of the ordering enum.
    fn variants() -> &'static [Self];
}

/// Sort direction for a single term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One `(column, direction)` term of an ordering.
#[derive(Debug, Clone, Copy)]
pub struct SortTerm {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl SortTerm {
    pub fn asc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Desc,
        }
    }
}

/// Per-call configuration for a list query.
///
/// `order_expressions` maps every ordering key to a non-empty, ordered list
/// of sort terms; later terms break ties left by earlier ones.
/// `search_attrs` names the columns eligible for free-text search, and
/// `column_filter_attrs` maps exposed filter names to columns.
#[derive(Debug, Clone)]
pub struct ListEssentials<O: OrderingKey> {
    order_expressions: HashMap<O, Vec<SortTerm>>,
    search_attrs: Vec<&'static str>,
    column_filter_attrs: HashMap<&'static str, &'static str>,
}

impl<O: OrderingKey> ListEssentials<O> {
    /// Build essentials from a registered order map.
    ///
    /// Panics when any ordering variant is missing from the map or mapped
    /// to an empty term list — an unmapped key is a configuration defect,
    /// never a runtime-recoverable error.
    pub fn new(order_expressions: HashMap<O, Vec<SortTerm>>) -> Self {
        for variant in O::variants() {
            match order_expressions.get(variant) {
                None => panic!("ordering key {variant:?} has no registered sort terms"),
                Some(terms) if terms.is_empty() => {
                    panic!("ordering key {variant:?} maps to an empty sort term list")
                }
                Some(_) => {}
            }
        }

        Self {
            order_expressions,
            search_attrs: Vec::new(),
            column_filter_attrs: HashMap::new(),
        }
    }

    /// Register the columns eligible for free-text search.
    pub fn with_search_attrs(mut self, attrs: Vec<&'static str>) -> Self {
        self.search_attrs = attrs;
        self
    }

    /// Register a column filter under an exposed name.
    pub fn with_column_filter(mut self, name: &'static str, column: &'static str) -> Self {
        self.column_filter_attrs.insert(name, column);
        self
    }

    pub fn order_expressions(&self) -> &HashMap<O, Vec<SortTerm>> {
        &self.order_expressions
    }

    pub fn search_attrs(&self) -> &[&'static str] {
        &self.search_attrs
    }

    pub fn column_filter_attrs(&self) -> &HashMap<&'static str, &'static str> {
        &self.column_filter_attrs
    }
}

/// Validated query parameters for one list call.
///
/// `page_number` and `page_size` are always >= 1; violated inputs are
/// rejected at the HTTP boundary before the engine runs. `search` is
/// trimmed upstream; a blank search arrives as `None`.
#[derive(Debug, Clone)]
pub struct ListParams<O: OrderingKey> {
    pub ordering: O,
    pub search: Option<String>,
    pub page_number: u64,
    pub page_size: u64,
    pub column_filters: HashMap<String, Vec<String>>,
}

impl<O: OrderingKey> ListParams<O> {
    pub fn new(ordering: O) -> Self {
        Self {
            ordering,
            search: None,
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            column_filters: HashMap::new(),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_page(mut self, page_number: u64, page_size: u64) -> Self {
        self.page_number = page_number;
        self.page_size = page_size;
        self
    }

    pub fn with_filter(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.column_filters.insert(name.into(), values);
        self
    }
}

/// `ceil(total_items / page_size)`, with zero pages for zero items.
pub fn total_pages(total_items: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

/// One page of a listed resource plus total counts.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedList<T> {
    pub content: Vec<T>,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> PaginatedList<T> {
    /// Assemble a page, deriving `total_pages` from the full item count.
    pub fn new(content: Vec<T>, total_items: u64, page_size: u64) -> Self {
        Self {
            content,
            total_items,
            total_pages: total_pages(total_items, page_size),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Sample {
        NameAsc,
        NameDesc,
    }

    impl OrderingKey for Sample {
        fn variants() -> &'static [Self] {
            &[Self::NameAsc, Self::NameDesc]
        }
    }

    fn full_order_map() -> HashMap<Sample, Vec<SortTerm>> {
        HashMap::from([
            (Sample::NameAsc, vec![SortTerm::asc("name")]),
            (Sample::NameDesc, vec![SortTerm::desc("name")]),
        ])
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 50), 0);
        assert_eq!(total_pages(1, 50), 1);
        assert_eq!(total_pages(50, 50), 1);
        assert_eq!(total_pages(51, 50), 2);
        assert_eq!(total_pages(100, 3), 34);
    }

    #[test]
    fn paginated_list_metadata() {
        let page = PaginatedList::new(vec!["a", "b"], 7, 2);
        assert_eq!(page.total_items, 7);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.content.len(), 2);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let page: PaginatedList<&str> = PaginatedList::new(vec![], 0, 50);
        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn essentials_accepts_exhaustive_map() {
        let essentials = ListEssentials::new(full_order_map())
            .with_search_attrs(vec!["name"])
            .with_column_filter("name", "name");
        assert_eq!(essentials.search_attrs(), &["name"]);
        assert_eq!(essentials.column_filter_attrs().get("name"), Some(&"name"));
    }

    #[test]
    #[should_panic(expected = "has no registered sort terms")]
    fn essentials_rejects_missing_ordering_key() {
        let mut map = full_order_map();
        map.remove(&Sample::NameDesc);
        let _ = ListEssentials::new(map);
    }

    #[test]
    #[should_panic(expected = "empty sort term list")]
    fn essentials_rejects_empty_term_list() {
        let mut map = full_order_map();
        map.insert(Sample::NameDesc, vec![]);
        let _ = ListEssentials::new(map);
    }

    #[test]
    fn params_defaults() {
        let params = ListParams::new(Sample::NameAsc);
        assert_eq!(params.page_number, 1);
        assert_eq!(params.page_size, DEFAULT_PAGE_SIZE);
        assert!(params.search.is_none());
        assert!(params.column_filters.is_empty());
    }
}
