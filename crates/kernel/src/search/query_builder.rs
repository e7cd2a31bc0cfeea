//! Entry query builder using SeaQuery.
//!
//! Every entry query selects the same joined row shape (entry + developer +
//! category + feature id array) so that all of them decode into
//! [`Entry`](crate::models::Entry). Search adds one predicate per supplied
//! criterion; feature criteria become one `EXISTS` containment subquery per
//! selected feature, ANDed together. A single `feature_id IN (...)` would
//! match entries carrying *any* of the features, which is wrong.

use sea_query::{
    Alias, Expr, ExprTrait, Func, IntoColumnRef, NullOrdering, Order, PostgresQueryBuilder,
    Query, SelectStatement, SimpleExpr,
};

use super::SearchCriteria;

mod schema {
    use sea_query::Iden;

    #[derive(Iden)]
    pub enum Entry {
        Table,
        Id,
        Name,
        Version,
        Url,
        Notes,
        Free,
        Mac,
        Windows,
        Linux,
        Active,
        Created,
        Updated,
        CategoryId,
        DeveloperId,
    }

    #[derive(Iden)]
    pub enum Developer {
        Table,
        Id,
        Name,
        Slug,
    }

    #[derive(Iden)]
    pub enum Category {
        Table,
        Id,
        Name,
        Slug,
        Sequence,
    }

    #[derive(Iden)]
    pub enum EntryFeature {
        Table,
        EntryId,
        FeatureId,
    }
}

use schema::{Category, Developer, Entry, EntryFeature};

/// Correlated array of an entry's feature ids.
const FEATURE_IDS_EXPR: &str = "ARRAY(SELECT entry_feature.feature_id FROM entry_feature \
     WHERE entry_feature.entry_id = entry.id ORDER BY entry_feature.feature_id)";

/// A SELECT over joined entry rows.
#[derive(Debug, Clone)]
pub struct EntryQuery {
    statement: SelectStatement,
}

impl EntryQuery {
    /// The base SELECT with joins and no filters.
    fn base() -> SelectStatement {
        let mut query = Query::select();

        query
            .columns([
                (Entry::Table, Entry::Id),
                (Entry::Table, Entry::Name),
                (Entry::Table, Entry::Version),
                (Entry::Table, Entry::Url),
                (Entry::Table, Entry::Notes),
                (Entry::Table, Entry::Free),
                (Entry::Table, Entry::Mac),
                (Entry::Table, Entry::Windows),
                (Entry::Table, Entry::Linux),
                (Entry::Table, Entry::Active),
                (Entry::Table, Entry::Created),
                (Entry::Table, Entry::Updated),
                (Entry::Table, Entry::CategoryId),
                (Entry::Table, Entry::DeveloperId),
            ])
            .expr_as(
                Expr::col((Developer::Table, Developer::Name)),
                Alias::new("developer_name"),
            )
            .expr_as(
                Expr::col((Developer::Table, Developer::Slug)),
                Alias::new("developer_slug"),
            )
            .expr_as(
                Expr::col((Category::Table, Category::Name)),
                Alias::new("category_name"),
            )
            .expr_as(
                Expr::col((Category::Table, Category::Slug)),
                Alias::new("category_slug"),
            )
            .expr_as(
                Expr::col((Category::Table, Category::Sequence)),
                Alias::new("category_sequence"),
            )
            .expr_as(Expr::cust(FEATURE_IDS_EXPR), Alias::new("feature_ids"))
            .from(Entry::Table)
            .left_join(
                Developer::Table,
                Expr::col((Entry::Table, Entry::DeveloperId))
                    .equals((Developer::Table, Developer::Id)),
            )
            .left_join(
                Category::Table,
                Expr::col((Entry::Table, Entry::CategoryId)).equals((Category::Table, Category::Id)),
            );

        query
    }

    /// One entry by id, regardless of the active flag.
    pub fn by_id(id: i64) -> Self {
        let mut statement = Self::base();
        statement.and_where(Expr::col((Entry::Table, Entry::Id)).eq(id));
        Self { statement }
    }

    /// Active entries, optionally in one category, ordered by developer
    /// name then entry name.
    pub fn active_listing(category_id: Option<i64>) -> Self {
        let mut statement = Self::base();
        statement.and_where(active());
        if let Some(category_id) = category_id {
            statement.and_where(Expr::col((Entry::Table, Entry::CategoryId)).eq(category_id));
        }
        order_by_developer(&mut statement);
        order_by_name(&mut statement);
        Self { statement }
    }

    /// Active entries created at or after `since`, newest first, capped at `limit`.
    pub fn recent(since: i64, limit: u32) -> Self {
        let mut statement = Self::base();
        statement
            .and_where(active())
            .and_where(Expr::col((Entry::Table, Entry::Created)).gte(since))
            .order_by((Entry::Table, Entry::Created), Order::Desc)
            .order_by((Entry::Table, Entry::Id), Order::Desc)
            .limit(u64::from(limit));
        Self { statement }
    }

    /// Active entries of one developer, ordered by category then name.
    pub fn for_developer(developer_id: i64) -> Self {
        let mut statement = Self::base();
        statement
            .and_where(active())
            .and_where(Expr::col((Entry::Table, Entry::DeveloperId)).eq(developer_id));
        order_by_category(&mut statement);
        order_by_name(&mut statement);
        Self { statement }
    }

    /// The conjunctive search query for `criteria`, or `None` when there is
    /// nothing to search for.
    pub fn search(criteria: &SearchCriteria) -> Option<Self> {
        if criteria.is_empty() {
            return None;
        }

        let mut statement = Self::base();
        statement.and_where(active());

        if let Some(ref developer) = criteria.developer {
            statement.and_where(contains_ci((Developer::Table, Developer::Name), developer));
        }
        if let Some(category_id) = criteria.category {
            statement.and_where(Expr::col((Entry::Table, Entry::CategoryId)).eq(category_id));
        }
        if let Some(ref title) = criteria.title {
            statement.and_where(contains_ci((Entry::Table, Entry::Name), title));
        }

        for (flag, column) in [
            (criteria.free, Entry::Free),
            (criteria.mac, Entry::Mac),
            (criteria.windows, Entry::Windows),
            (criteria.linux, Entry::Linux),
        ] {
            if flag {
                statement.and_where(Expr::col((Entry::Table, column)).eq(true));
            }
        }

        // One containment filter per feature; the filters intersect.
        for &feature_id in &criteria.features {
            statement.and_where(has_feature(feature_id));
        }

        order_by_developer(&mut statement);
        order_by_category(&mut statement);
        order_by_name(&mut statement);

        Some(Self { statement })
    }

    /// Render to PostgreSQL with inlined, escaped values.
    pub fn build(&self) -> String {
        self.statement.to_string(PostgresQueryBuilder)
    }
}

fn active() -> SimpleExpr {
    Expr::col((Entry::Table, Entry::Active)).eq(true)
}

/// `EXISTS (SELECT 1 FROM entry_feature WHERE entry_id = entry.id AND feature_id = ?)`
fn has_feature(feature_id: i64) -> SimpleExpr {
    Expr::exists(
        Query::select()
            .expr(Expr::val(1))
            .from(EntryFeature::Table)
            .and_where(
                Expr::col((EntryFeature::Table, EntryFeature::EntryId))
                    .equals((Entry::Table, Entry::Id)),
            )
            .and_where(Expr::col((EntryFeature::Table, EntryFeature::FeatureId)).eq(feature_id))
            .to_owned(),
    )
}

/// `LOWER(col) LIKE '%needle%'` with LIKE wildcards in the needle escaped.
fn contains_ci(column: impl IntoColumnRef, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like_wildcards(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column))).like(pattern)
}

fn order_by_developer(statement: &mut SelectStatement) {
    statement.order_by_expr_with_nulls(
        Func::lower(Expr::col((Developer::Table, Developer::Name))).into(),
        Order::Asc,
        NullOrdering::Last,
    );
}

fn order_by_category(statement: &mut SelectStatement) {
    statement.order_by_with_nulls(
        (Category::Table, Category::Sequence),
        Order::Asc,
        NullOrdering::Last,
    );
}

/// Entry name (case-insensitive) with id as the final tie-break.
fn order_by_name(statement: &mut SelectStatement) {
    statement
        .order_by_expr(Func::lower(Expr::col((Entry::Table, Entry::Name))).into(), Order::Asc)
        .order_by((Entry::Table, Entry::Id), Order::Asc);
}

/// Escape LIKE wildcard characters (`%`, `_`) and the escape character (`\`)
/// so user input is matched literally.
fn escape_like_wildcards(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
