use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::discounts::DiscountEntity;
use crate::domain::value_objects::enums::discount_types::DiscountType;

#[derive(Debug, Clone, Serialize)]
pub struct DiscountModel {
    pub id: Uuid,
    pub code: String,
    pub discount_type: DiscountType,
    pub value: i64,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
    pub max_uses: i32,
    pub used_count: i32,
}

impl DiscountModel {
    pub fn from_entity(entity: DiscountEntity) -> anyhow::Result<Self> {
        let discount_type = DiscountType::from_str(&entity.discount_type)
            .ok_or_else(|| anyhow::anyhow!("unknown discount type: {}", entity.discount_type))?;

        Ok(Self {
            id: entity.id,
            code: entity.code,
            discount_type,
            value: entity.value,
            valid_from: entity.valid_from,
            valid_to: entity.valid_to,
            max_uses: entity.max_uses,
            used_count: entity.used_count,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateDiscountModel {
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateCodeModel {
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDiscountModel {
    pub code: Option<String>,
    pub discount_type: DiscountType,
    pub value: i64,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
    pub max_uses: i32,
}
