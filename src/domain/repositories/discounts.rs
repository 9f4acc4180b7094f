use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::discounts::{DiscountEntity, InsertDiscountEntity};

#[automock]
#[async_trait]
pub trait DiscountRepository {
    async fn find_by_code(&self, code: String) -> Result<Option<DiscountEntity>>;

    async fn find_by_id(&self, discount_id: Uuid) -> Result<Option<DiscountEntity>>;

    async fn code_exists(&self, code: String) -> Result<bool>;

    async fn create(&self, discount: InsertDiscountEntity) -> Result<Uuid>;

    /// Atomic guarded increment: only succeeds while `used_count < max_uses`.
    /// Returns whether a row was updated.
    async fn increment_usage(&self, discount_id: Uuid) -> Result<bool>;

    /// Admin-only counter reset.
    async fn reset_usage(&self, discount_id: Uuid) -> Result<()>;
}
