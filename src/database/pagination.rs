use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_builder::*;
use diesel::sql_types::BigInt;
use diesel_async::{methods::LoadQuery, AsyncPgConnection, RunQueryDsl};

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// A paginable query
///
/// types who implement this trait represent a SQL query that can be
/// paginated with the storefront's limit / offset contract
pub trait Paginate: Sized {
    /// Applies limit / offset pagination to a query (self)
    fn paginate(self, limit: i64, offset: i64) -> Paginated<Self>;
}

impl<T> Paginate for T {
    fn paginate(self, limit: i64, offset: i64) -> Paginated<Self> {
        Paginated {
            query: self,
            limit: clamp_limit(limit),
            offset: offset.max(0),
        }
    }
}

/// clamps a caller supplied limit to `1..=MAX_LIMIT`, falling back to the
/// default for non positive values
pub fn clamp_limit(limit: i64) -> i64 {
    if limit <= 0 {
        return DEFAULT_LIMIT;
    }

    limit.min(MAX_LIMIT)
}

/// whether another page exists after the one that was just fetched
pub fn has_more(offset: i64, page_len: usize, total_count: i64) -> bool {
    offset + (page_len as i64) < total_count
}

#[derive(Clone, Copy, QueryId)]
pub struct Paginated<T> {
    /// The query to be executed
    query: T,

    /// amount of records to fetch
    limit: i64,

    /// amount of records to skip before the first fetched one
    offset: i64,
}

impl<T> Paginated<T> {
    /// Executes the query, applying limit / offset pagination, returning
    /// the records of the requested page and the total count the query
    /// would produce without pagination
    ///
    /// the count rides on the returned rows, so an offset past the last
    /// matching row yields a zero total, callers that need an exact total
    /// for out of range pages must issue their own count query
    pub fn load_and_count<'conn, U>(
        self,
        conn: &'conn mut AsyncPgConnection,
    ) -> impl std::future::Future<Output = QueryResult<(Vec<U>, i64)>> + Send + 'conn
    where
        Self: LoadQuery<'static, AsyncPgConnection, (U, i64)> + 'static,
        U: std::marker::Send + 'conn,
    {
        let results = self.load::<(U, i64)>(conn);

        async move {
            let results = results.await?;

            let total = results.as_slice().first().map(|x| x.1).unwrap_or(0);

            let records: Vec<U> = results.into_iter().map(|x| x.0).collect();

            Ok((records, total))
        }
    }
}

impl<T: Query> Query for Paginated<T> {
    type SqlType = (T::SqlType, BigInt);
}

impl<T> QueryFragment<Pg> for Paginated<T>
where
    T: QueryFragment<Pg>,
{
    fn walk_ast<'b>(&'b self, mut out: AstPass<'_, 'b, Pg>) -> QueryResult<()> {
        out.push_sql("SELECT *, COUNT(*) OVER () FROM (");

        self.query.walk_ast(out.reborrow())?;

        out.push_sql(") t LIMIT ");

        out.push_bind_param::<BigInt, _>(&self.limit)?;

        out.push_sql(" OFFSET ");

        out.push_bind_param::<BigInt, _>(&self.offset)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limit_defaults_non_positive_values() {
        assert_eq!(clamp_limit(0), DEFAULT_LIMIT);
        assert_eq!(clamp_limit(-5), DEFAULT_LIMIT);
    }

    #[test]
    fn clamp_limit_caps_at_max() {
        assert_eq!(clamp_limit(1), 1);
        assert_eq!(clamp_limit(MAX_LIMIT), MAX_LIMIT);
        assert_eq!(clamp_limit(MAX_LIMIT + 1), MAX_LIMIT);
    }

    #[test]
    fn has_more_accounts_for_offset() {
        // 5 total, first page of 2
        assert!(has_more(0, 2, 5));
        // last partial page
        assert!(!has_more(4, 1, 5));
        // exactly consumed
        assert!(!has_more(3, 2, 5));
        // empty result set
        assert!(!has_more(0, 0, 0));
    }
}
