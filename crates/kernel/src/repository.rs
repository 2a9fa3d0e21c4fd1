//! Storage interface and its PostgreSQL implementation.
//!
//! [`Repository`] is the seam between services and the store. The Postgres
//! implementation is a per-request unit of work: it holds one transaction
//! checked out from the pool, commits on [`Repository::save`], and rolls
//! back whenever it is dropped without committing — including early returns
//! and client disconnects.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::listing::{ListEssentials, ListParams, ListQueryBuilder, total_pages};
use crate::models::Resource;

/// Storage operations over a generic resource.
#[async_trait]
pub trait Repository<E: Resource>: Send {
    /// Insert a new resource with the given name.
    async fn create(&mut self, name: &str) -> AppResult<E>;

    /// Rename an existing resource.
    async fn update(&mut self, id: Uuid, name: &str) -> AppResult<()>;

    /// Delete by id; returns the number of rows removed.
    async fn delete(&mut self, id: Uuid) -> AppResult<u64>;

    /// Fetch by id.
    async fn get(&mut self, id: Uuid) -> AppResult<Option<E>>;

    /// Fetch by exact name.
    async fn get_by_name(&mut self, name: &str) -> AppResult<Option<E>>;

    /// Run the paginated list query.
    ///
    /// Returns `(content, total_pages, total_items)`; the count reflects
    /// search and filters but not the page window.
    async fn get_list(
        &mut self,
        params: &ListParams<E::Ordering>,
        essentials: &ListEssentials<E::Ordering>,
    ) -> AppResult<(Vec<E>, u64, u64)>;

    /// Commit all changes made through this repository.
    async fn save(self) -> AppResult<()>;
}

/// PostgreSQL repository parameterized by relation metadata.
pub struct PgRepository<E: Resource> {
    tx: Transaction<'static, Postgres>,
    _entity: PhantomData<E>,
}

impl<E: Resource> PgRepository<E> {
    /// Check a connection out of the pool and open the request transaction.
    pub async fn begin(pool: &PgPool) -> AppResult<Self> {
        let tx = pool.begin().await.map_err(AppError::from_store)?;
        Ok(Self {
            tx,
            _entity: PhantomData,
        })
    }
}

#[async_trait]
impl<E: Resource> Repository<E> for PgRepository<E> {
    async fn create(&mut self, name: &str) -> AppResult<E> {
        let sql = format!(
            "INSERT INTO {} (id, name) VALUES ($1, $2) RETURNING id, name",
            E::TABLE
        );
        let created = sqlx::query_as::<_, E>(&sql)
            .bind(Uuid::new_v4())
            .bind(name)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(AppError::from_store)?;

        Ok(created)
    }

    async fn update(&mut self, id: Uuid, name: &str) -> AppResult<()> {
        let sql = format!("UPDATE {} SET name = $1 WHERE id = $2", E::TABLE);
        sqlx::query(&sql)
            .bind(name)
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(AppError::from_store)?;

        Ok(())
    }

    async fn delete(&mut self, id: Uuid) -> AppResult<u64> {
        let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(AppError::from_store)?;

        Ok(result.rows_affected())
    }

    async fn get(&mut self, id: Uuid) -> AppResult<Option<E>> {
        let sql = format!("SELECT id, name FROM {} WHERE id = $1", E::TABLE);
        let found = sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(AppError::from_store)?;

        Ok(found)
    }

    async fn get_by_name(&mut self, name: &str) -> AppResult<Option<E>> {
        let sql = format!("SELECT id, name FROM {} WHERE name = $1", E::TABLE);
        let found = sqlx::query_as::<_, E>(&sql)
            .bind(name)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(AppError::from_store)?;

        Ok(found)
    }

    async fn get_list(
        &mut self,
        params: &ListParams<E::Ordering>,
        essentials: &ListEssentials<E::Ordering>,
    ) -> AppResult<(Vec<E>, u64, u64)> {
        let builder = ListQueryBuilder::new(E::TABLE, E::COLUMNS, params, essentials);

        // Count the fully searched/filtered set with a server-side
        // aggregate; identical to counting rows before windowing.
        let count_sql = builder.build_count();
        let total: i64 = sqlx::query_scalar(&count_sql)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(AppError::from_store)?;
        let total_items = u64::try_from(total).unwrap_or(0);

        let list_sql = builder.build();
        let content = sqlx::query_as::<_, E>(&list_sql)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(AppError::from_store)?;

        Ok((
            content,
            total_pages(total_items, params.page_size),
            total_items,
        ))
    }

    async fn save(self) -> AppResult<()> {
        self.tx.commit().await.map_err(AppError::from_store)
    }
}
