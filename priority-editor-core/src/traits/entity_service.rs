//! 远端持久化服务抽象 Trait

use async_trait::async_trait;

use crate::error::ServiceResult;
use crate::traits::FormEntity;

/// 实体持久化服务 Trait
///
/// Platform implementation:
/// - REST: `HttpEntityService` (reqwest)
/// - Tests: in-memory mocks
#[async_trait]
pub trait EntityService<E: FormEntity>: Send + Sync {
    /// Get entity based on ID
    ///
    /// # Arguments
    /// * `id` - Entity ID
    async fn get(&self, id: &E::Id) -> ServiceResult<E>;

    /// Create a new entity, the response carries the assigned ID
    ///
    /// # Arguments
    /// * `entity` - Entity without ID
    async fn create(&self, entity: &E) -> ServiceResult<E>;

    /// Update an existing entity
    ///
    /// # Arguments
    /// * `entity` - Entity with ID
    async fn update(&self, entity: &E) -> ServiceResult<E>;

    /// Delete entity
    ///
    /// # Arguments
    /// * `id` - Entity ID
    async fn remove(&self, id: &E::Id) -> ServiceResult<()>;
}
