//! Business logic services for shop resources.
//!
//! One generic service handles both categories and products; everything
//! entity-specific lives in the [`Resource`] implementations. Each public
//! operation opens its own repository unit of work and commits once at the
//! end — a failure anywhere rolls the whole request back.
//!
//! The `*_in` functions hold the actual logic and are generic over
//! [`Repository`] so integration tests can drive them against an in-memory
//! store.

use std::marker::PhantomData;

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::listing::{ListParams, PaginatedList};
use crate::models::{Category, Product, Resource, normalize_name};
use crate::repository::{PgRepository, Repository};

/// Service for handling all operations with categories.
pub type CategoryService = ResourceService<Category>;

/// Service for handling all operations with products.
pub type ProductService = ResourceService<Product>;

/// Generic CRUD + paginated list service over one resource type.
pub struct ResourceService<E: Resource> {
    pool: PgPool,
    _entity: PhantomData<E>,
}

impl<E: Resource> ResourceService<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    /// Handle `GET /v1/{resource}/{id}`.
    pub async fn get(&self, id: Uuid) -> AppResult<E> {
        let mut repo = PgRepository::<E>::begin(&self.pool).await?;
        get_or_404(&mut repo, id).await
    }

    /// Handle `GET /v1/{resource}` (paginated list).
    pub async fn get_list(&self, params: ListParams<E::Ordering>) -> AppResult<PaginatedList<E>> {
        let mut repo = PgRepository::<E>::begin(&self.pool).await?;
        list_in(&mut repo, &params).await
    }

    /// Handle `POST /v1/{resource}`.
    pub async fn create(&self, name: &str) -> AppResult<E> {
        let mut repo = PgRepository::<E>::begin(&self.pool).await?;
        let created = create_in(&mut repo, name).await?;
        repo.save().await?;
        Ok(created)
    }

    /// Handle `PUT /v1/{resource}/{id}`.
    pub async fn edit(&self, id: Uuid, name: &str) -> AppResult<E> {
        let mut repo = PgRepository::<E>::begin(&self.pool).await?;
        let updated = edit_in(&mut repo, id, name).await?;
        repo.save().await?;
        Ok(updated)
    }

    /// Handle `DELETE /v1/{resource}/{id}`.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut repo = PgRepository::<E>::begin(&self.pool).await?;
        delete_in(&mut repo, id).await?;
        repo.save().await?;
        Ok(())
    }
}

/// Fetch a resource by id, raising the resource-specific 404 when absent.
pub async fn get_or_404<E, R>(repo: &mut R, id: Uuid) -> AppResult<E>
where
    E: Resource,
    R: Repository<E>,
{
    repo.get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} was not found", E::NOUN)))
}

/// Run the paginated list query and assemble the response page.
pub async fn list_in<E, R>(repo: &mut R, params: &ListParams<E::Ordering>) -> AppResult<PaginatedList<E>>
where
    E: Resource,
    R: Repository<E>,
{
    let essentials = E::list_essentials();
    let (content, total_pages, total_items) = repo.get_list(params, &essentials).await?;
    Ok(PaginatedList {
        content,
        total_items,
        total_pages,
    })
}

/// Create a resource after an explicit uniqueness pre-check.
pub async fn create_in<E, R>(repo: &mut R, raw_name: &str) -> AppResult<E>
where
    E: Resource,
    R: Repository<E>,
{
    let name = normalize_name(raw_name)?;
    if repo.get_by_name(&name).await?.is_some() {
        return Err(AppError::BadRequest("Name is already taken.".to_string()));
    }
    repo.create(&name).await
}

/// Rename a resource. Renaming to a name held by a *different* resource is
/// a conflict; renaming to the resource's own name succeeds.
pub async fn edit_in<E, R>(repo: &mut R, id: Uuid, raw_name: &str) -> AppResult<E>
where
    E: Resource,
    R: Repository<E>,
{
    let current = get_or_404(repo, id).await?;
    let name = normalize_name(raw_name)?;

    if let Some(existing) = repo.get_by_name(&name).await? {
        if existing.id() != current.id() {
            return Err(AppError::BadRequest(format!("{} already exists.", E::NOUN)));
        }
    }

    repo.update(id, &name).await?;
    get_or_404(repo, id).await
}

/// Delete a resource, raising 404 rather than silently succeeding when the
/// id does not exist.
pub async fn delete_in<E, R>(repo: &mut R, id: Uuid) -> AppResult<()>
where
    E: Resource,
    R: Repository<E>,
{
    get_or_404(repo, id).await?;
    repo.delete(id).await?;
    Ok(())
}
