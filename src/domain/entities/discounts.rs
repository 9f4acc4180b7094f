use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::discounts;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = discounts)]
pub struct DiscountEntity {
    pub id: Uuid,
    pub code: String,
    pub discount_type: String,
    pub value: i64,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
    pub max_uses: i32,
    pub used_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = discounts)]
pub struct InsertDiscountEntity {
    pub code: String,
    pub discount_type: String,
    pub value: i64,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
    pub max_uses: i32,
    pub used_count: i32,
}
