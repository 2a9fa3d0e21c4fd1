//! List query builder using SeaQuery.
//!
//! Generates the SQL for one paginated list call: ordering, free-text
//! search, column filtering, and the page window, plus the matching COUNT
//! query used for pagination metadata.

use sea_query::{
    Alias, Asterisk, Cond, Expr, Func, Order, PostgresQueryBuilder, Query, SelectStatement,
};

use super::types::{ListEssentials, ListParams, OrderingKey, SortDirection};

/// Query builder for paginated list queries over a single relation.
pub struct ListQueryBuilder<'a, O: OrderingKey> {
    table: &'static str,
    columns: &'static [&'static str],
    params: &'a ListParams<O>,
    essentials: &'a ListEssentials<O>,
}

impl<'a, O: OrderingKey> ListQueryBuilder<'a, O> {
    pub fn new(
        table: &'static str,
        columns: &'static [&'static str],
        params: &'a ListParams<O>,
        essentials: &'a ListEssentials<O>,
    ) -> Self {
        Self {
            table,
            columns,
            params,
            essentials,
        }
    }

    /// Build the main SELECT with ordering and the page window.
    ///
    /// Ordering is applied before the OFFSET/LIMIT window; otherwise page
    /// contents would be undefined.
    pub fn build(&self) -> String {
        let mut query = Query::select();

        for column in self.columns {
            query.column((Alias::new(self.table), Alias::new(*column)));
        }
        query.from(Alias::new(self.table));

        self.apply_search(&mut query);
        self.apply_filters(&mut query);
        self.apply_order(&mut query);

        // Saturate rather than overflow: an offset past the last row is a
        // valid empty page.
        let offset = self
            .params
            .page_number
            .saturating_sub(1)
            .saturating_mul(self.params.page_size);
        query.limit(self.params.page_size);
        query.offset(offset);

        query.to_string(PostgresQueryBuilder)
    }

    /// Build the COUNT query for total results.
    ///
    /// Counts the fully searched/filtered set, before ordering and before
    /// the page window.
    pub fn build_count(&self) -> String {
        let mut query = Query::select();

        query.expr(Expr::col(Asterisk).count());
        query.from(Alias::new(self.table));

        self.apply_search(&mut query);
        self.apply_filters(&mut query);

        query.to_string(PostgresQueryBuilder)
    }

    /// Add the free-text search predicate.
    ///
    /// Splits the search string on whitespace and ORs a case-insensitive
    /// substring match for every (word, attribute) pair. OR-of-words is the
    /// contract here — a query for "red shirt" matches rows containing
    /// either word in any search attribute. Do not tighten this to AND.
    fn apply_search(&self, query: &mut SelectStatement) {
        let Some(search) = self.params.search.as_deref() else {
            return;
        };
        if self.essentials.search_attrs().is_empty() {
            return;
        }

        // split_whitespace drops empty tokens from runs of spaces.
        let words: Vec<&str> = search.split_whitespace().collect();
        if words.is_empty() {
            return;
        }

        let mut cond = Cond::any();
        for word in &words {
            let pattern = format!("%{}%", escape_like_wildcards(&word.to_lowercase()));
            for attr in self.essentials.search_attrs() {
                let lowered =
                    Func::lower(Expr::col((Alias::new(self.table), Alias::new(*attr))));
                cond = cond.add(Expr::expr(lowered).like(pattern.clone()));
            }
        }

        query.cond_where(cond);
    }

    /// Add IN-list restrictions for requested column filters.
    ///
    /// A filter name that is absent from the request, or present with an
    /// empty value list, applies no constraint. Distinct filter names
    /// combine with AND.
    fn apply_filters(&self, query: &mut SelectStatement) {
        for (name, column) in self.essentials.column_filter_attrs() {
            let Some(values) = self.params.column_filters.get(*name) else {
                continue;
            };
            if values.is_empty() {
                continue;
            }
            query.and_where(
                Expr::col((Alias::new(self.table), Alias::new(*column)))
                    .is_in(values.iter().cloned()),
            );
        }
    }

    /// Add ORDER BY terms for the requested ordering key, in map order.
    fn apply_order(&self, query: &mut SelectStatement) {
        let Some(terms) = self.essentials.order_expressions().get(&self.params.ordering) else {
            // ListEssentials::new verifies exhaustiveness, so reaching this
            // means the essentials were built around a different enum state.
            panic!(
                "no sort terms registered for ordering key {:?}",
                self.params.ordering
            );
        };

        for term in terms {
            let order = match term.direction {
                SortDirection::Asc => Order::Asc,
                SortDirection::Desc => Order::Desc,
            };
            query.order_by((Alias::new(self.table), Alias::new(term.column)), order);
        }
    }
}

/// Escape SQL LIKE wildcard characters (`%`, `_`, `\`) in a value.
fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::listing::types::SortTerm;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestOrdering {
        NameAsc,
        NameDesc,
        WeightThenName,
    }

    impl OrderingKey for TestOrdering {
        fn variants() -> &'static [Self] {
            &[Self::NameAsc, Self::NameDesc, Self::WeightThenName]
        }
    }

    const TABLE: &str = "shop_category";
    const COLUMNS: &[&str] = &["id", "name"];

    fn essentials() -> ListEssentials<TestOrdering> {
        ListEssentials::new(HashMap::from([
            (TestOrdering::NameAsc, vec![SortTerm::asc("name")]),
            (TestOrdering::NameDesc, vec![SortTerm::desc("name")]),
            (
                TestOrdering::WeightThenName,
                vec![SortTerm::desc("weight"), SortTerm::asc("name")],
            ),
        ]))
        .with_search_attrs(vec!["name"])
        .with_column_filter("name", "name")
        .with_column_filter("id", "id")
    }

    #[test]
    fn plain_list_query() {
        let params = ListParams::new(TestOrdering::NameAsc);
        let sql = ListQueryBuilder::new(TABLE, COLUMNS, &params, &essentials()).build();

        assert!(sql.contains(r#"FROM "shop_category""#), "{sql}");
        assert!(sql.contains(r#""shop_category"."id""#), "{sql}");
        assert!(sql.contains(r#"ORDER BY "shop_category"."name" ASC"#), "{sql}");
        assert!(sql.contains("LIMIT 50"), "{sql}");
        assert!(sql.contains("OFFSET 0"), "{sql}");
        assert!(!sql.contains("LIKE"), "no search predicate expected: {sql}");
    }

    #[test]
    fn descending_ordering() {
        let params = ListParams::new(TestOrdering::NameDesc);
        let sql = ListQueryBuilder::new(TABLE, COLUMNS, &params, &essentials()).build();

        assert!(sql.contains(r#"ORDER BY "shop_category"."name" DESC"#), "{sql}");
    }

    #[test]
    fn multi_term_ordering_keeps_list_order() {
        let params = ListParams::new(TestOrdering::WeightThenName);
        let sql = ListQueryBuilder::new(TABLE, COLUMNS, &params, &essentials()).build();

        let weight_pos = sql.find(r#""shop_category"."weight" DESC"#).unwrap();
        let name_pos = sql.find(r#""shop_category"."name" ASC"#).unwrap();
        assert!(
            weight_pos < name_pos,
            "primary term must precede tie-breaker: {sql}"
        );
    }

    #[test]
    fn page_window_offset() {
        let params = ListParams::new(TestOrdering::NameAsc).with_page(3, 10);
        let sql = ListQueryBuilder::new(TABLE, COLUMNS, &params, &essentials()).build();

        assert!(sql.contains("LIMIT 10"), "{sql}");
        assert!(sql.contains("OFFSET 20"), "{sql}");
    }

    #[test]
    fn huge_page_number_saturates_instead_of_overflowing() {
        let params = ListParams::new(TestOrdering::NameAsc).with_page(u64::MAX, 50);
        let sql = ListQueryBuilder::new(TABLE, COLUMNS, &params, &essentials()).build();

        assert!(sql.contains(&format!("OFFSET {}", u64::MAX)), "{sql}");
        assert!(sql.contains("LIMIT 50"), "{sql}");
    }

    #[test]
    fn search_is_or_of_words_and_case_insensitive() {
        let params = ListParams::new(TestOrdering::NameAsc).with_search("Red Hat");
        let sql = ListQueryBuilder::new(TABLE, COLUMNS, &params, &essentials()).build();

        assert!(sql.contains(r#"LOWER("shop_category"."name") LIKE '%red%'"#), "{sql}");
        assert!(sql.contains(r#"LOWER("shop_category"."name") LIKE '%hat%'"#), "{sql}");
        assert!(sql.contains(" OR "), "word predicates must OR: {sql}");
        assert!(!sql.contains("'%red hat%'"), "words are matched separately: {sql}");
    }

    #[test]
    fn search_spans_all_search_attrs() {
        let essentials = ListEssentials::new(HashMap::from([
            (TestOrdering::NameAsc, vec![SortTerm::asc("name")]),
            (TestOrdering::NameDesc, vec![SortTerm::desc("name")]),
            (TestOrdering::WeightThenName, vec![SortTerm::asc("name")]),
        ]))
        .with_search_attrs(vec!["name", "description"]);

        let params = ListParams::new(TestOrdering::NameAsc).with_search("red");
        let sql = ListQueryBuilder::new(TABLE, COLUMNS, &params, &essentials).build();

        assert!(sql.contains(r#"LOWER("shop_category"."name") LIKE '%red%'"#), "{sql}");
        assert!(
            sql.contains(r#"LOWER("shop_category"."description") LIKE '%red%'"#),
            "{sql}"
        );
    }

    #[test]
    fn consecutive_spaces_produce_no_empty_word_predicates() {
        let params = ListParams::new(TestOrdering::NameAsc).with_search("red   hat");
        let sql = ListQueryBuilder::new(TABLE, COLUMNS, &params, &essentials()).build();

        assert!(!sql.contains("'%%'"), "empty-word predicate leaked: {sql}");
        assert!(sql.contains("'%red%'"), "{sql}");
        assert!(sql.contains("'%hat%'"), "{sql}");
    }

    #[test]
    fn search_skipped_without_search_attrs() {
        let essentials = ListEssentials::new(HashMap::from([
            (TestOrdering::NameAsc, vec![SortTerm::asc("name")]),
            (TestOrdering::NameDesc, vec![SortTerm::desc("name")]),
            (TestOrdering::WeightThenName, vec![SortTerm::asc("name")]),
        ]));
        let params = ListParams::new(TestOrdering::NameAsc).with_search("red");
        let sql = ListQueryBuilder::new(TABLE, COLUMNS, &params, &essentials).build();

        assert!(!sql.contains("LIKE"), "{sql}");
    }

    #[test]
    fn like_wildcards_in_search_words_are_escaped() {
        let params = ListParams::new(TestOrdering::NameAsc).with_search("100%_done");
        let sql = ListQueryBuilder::new(TABLE, COLUMNS, &params, &essentials()).build();

        assert!(
            !sql.contains("'%100%_done%'"),
            "raw wildcard chars should not appear unescaped: {sql}"
        );
    }

    #[test]
    fn column_filter_uses_in_list() {
        let params = ListParams::new(TestOrdering::NameAsc)
            .with_filter("name", vec!["Hats".to_string(), "Shoes".to_string()]);
        let sql = ListQueryBuilder::new(TABLE, COLUMNS, &params, &essentials()).build();

        assert!(
            sql.contains(r#""shop_category"."name" IN ('Hats', 'Shoes')"#),
            "{sql}"
        );
    }

    #[test]
    fn absent_filter_applies_no_constraint() {
        let unfiltered = ListParams::new(TestOrdering::NameAsc);
        let sql = ListQueryBuilder::new(TABLE, COLUMNS, &unfiltered, &essentials()).build();

        assert!(!sql.contains("IN ("), "{sql}");
    }

    #[test]
    fn empty_filter_list_applies_no_constraint() {
        let params = ListParams::new(TestOrdering::NameAsc).with_filter("name", vec![]);
        let sql = ListQueryBuilder::new(TABLE, COLUMNS, &params, &essentials()).build();

        assert!(!sql.contains("IN ("), "{sql}");
    }

    #[test]
    fn distinct_filters_combine_with_and() {
        let params = ListParams::new(TestOrdering::NameAsc)
            .with_filter("name", vec!["Hats".to_string()])
            .with_filter("id", vec!["00000000-0000-0000-0000-000000000000".to_string()]);
        let sql = ListQueryBuilder::new(TABLE, COLUMNS, &params, &essentials()).build();

        assert!(sql.contains(r#""shop_category"."name" IN ('Hats')"#), "{sql}");
        assert!(sql.contains(r#""shop_category"."id" IN ("#), "{sql}");
        assert!(sql.contains(" AND "), "{sql}");
    }

    #[test]
    fn count_query_reflects_filters_but_not_window_or_order() {
        let params = ListParams::new(TestOrdering::NameAsc)
            .with_search("red")
            .with_page(4, 10);
        let sql = ListQueryBuilder::new(TABLE, COLUMNS, &params, &essentials()).build_count();

        assert!(sql.contains("COUNT(*)"), "{sql}");
        assert!(sql.contains("'%red%'"), "count must see the search: {sql}");
        assert!(!sql.contains("LIMIT"), "{sql}");
        assert!(!sql.contains("OFFSET"), "{sql}");
        assert!(!sql.contains("ORDER BY"), "{sql}");
    }

    #[test]
    fn escape_like_wildcards_function() {
        assert_eq!(escape_like_wildcards("hello"), "hello");
        assert_eq!(escape_like_wildcards("100%"), "100\\%");
        assert_eq!(escape_like_wildcards("a_b"), "a\\_b");
        assert_eq!(escape_like_wildcards("a\\b"), "a\\\\b");
    }
}
