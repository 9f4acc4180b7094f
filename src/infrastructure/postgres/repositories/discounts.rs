use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{dsl::exists, insert_into, prelude::*, select, update};
use uuid::Uuid;

use crate::domain::entities::discounts::{DiscountEntity, InsertDiscountEntity};
use crate::domain::repositories::discounts::DiscountRepository;
use crate::infrastructure::postgres::postgres_connection::PgPool;
use crate::infrastructure::postgres::schema::discounts;

pub struct DiscountPostgres {
    db_pool: Arc<PgPool>,
}

impl DiscountPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl DiscountRepository for DiscountPostgres {
    async fn find_by_code(&self, code: String) -> Result<Option<DiscountEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = discounts::table
            .filter(discounts::code.eq(code))
            .select(DiscountEntity::as_select())
            .first::<DiscountEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_id(&self, discount_id: Uuid) -> Result<Option<DiscountEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = discounts::table
            .filter(discounts::id.eq(discount_id))
            .select(DiscountEntity::as_select())
            .first::<DiscountEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn code_exists(&self, code: String) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let found = select(exists(
            discounts::table.filter(discounts::code.eq(code)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(found)
    }

    async fn create(&self, discount: InsertDiscountEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(discounts::table)
            .values(&discount)
            .returning(discounts::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn increment_usage(&self, discount_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // The cap guard lives in the WHERE clause so concurrent confirmations
        // can never push used_count past max_uses.
        let affected = update(discounts::table)
            .filter(discounts::id.eq(discount_id))
            .filter(discounts::used_count.lt(discounts::max_uses))
            .set(discounts::used_count.eq(discounts::used_count + 1))
            .execute(&mut conn)?;

        Ok(affected > 0)
    }

    async fn reset_usage(&self, discount_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(discounts::table)
            .filter(discounts::id.eq(discount_id))
            .set(discounts::used_count.eq(0))
            .execute(&mut conn)?;

        Ok(())
    }
}
