use std::sync::Arc;

use anyhow::Result as AnyResult;
use chrono::NaiveDate;
use rand::{Rng, distributions::Alphanumeric};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::entities::discounts::{DiscountEntity, InsertDiscountEntity};
use crate::domain::repositories::discounts::DiscountRepository;
use crate::domain::value_objects::discounts::{CreateDiscountModel, DiscountModel};
use crate::domain::value_objects::enums::discount_types::DiscountType;

pub const CODE_LENGTH: usize = 8;

// The code space is large enough that collisions are freak events; the cap
// exists so a saturated namespace fails loudly instead of spinning.
const MAX_CODE_ATTEMPTS: u32 = 16;

#[derive(Debug, Error)]
pub enum DiscountError {
    #[error("discount code not found")]
    NotFound,
    #[error("discount code is outside its validity window")]
    Expired,
    #[error("discount code has reached its usage cap")]
    Exhausted,
    #[error("could not generate a unique discount code")]
    CodeSpaceExhausted,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl DiscountError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            DiscountError::NotFound => StatusCode::NOT_FOUND,
            DiscountError::Expired => StatusCode::BAD_REQUEST,
            DiscountError::Exhausted => StatusCode::CONFLICT,
            DiscountError::CodeSpaceExhausted | DiscountError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

pub type DiscountResult<T> = std::result::Result<T, DiscountError>;

/// Window and usage-cap check shared by the discount and booking use cases.
pub fn check_discount(discount: &DiscountEntity, as_of: NaiveDate) -> DiscountResult<()> {
    if as_of < discount.valid_from || as_of > discount.valid_to {
        return Err(DiscountError::Expired);
    }
    if discount.used_count >= discount.max_uses {
        return Err(DiscountError::Exhausted);
    }
    Ok(())
}

/// Percent discounts take `value` percent off; fixed discounts subtract
/// `value`. The result is floored at zero, never negative.
pub fn apply_discount(amount: i64, discount_type: DiscountType, value: i64) -> i64 {
    let reduced = match discount_type {
        DiscountType::Percent => amount - amount * value / 100,
        DiscountType::Fixed => amount - value,
    };
    reduced.max(0)
}

pub fn apply_discount_entity(amount: i64, discount: &DiscountEntity) -> AnyResult<i64> {
    let discount_type = DiscountType::from_str(&discount.discount_type)
        .ok_or_else(|| anyhow::anyhow!("unknown discount type: {}", discount.discount_type))?;

    Ok(apply_discount(amount, discount_type, discount.value))
}

pub struct DiscountUseCase<D>
where
    D: DiscountRepository + Send + Sync + 'static,
{
    discount_repo: Arc<D>,
}

impl<D> DiscountUseCase<D>
where
    D: DiscountRepository + Send + Sync + 'static,
{
    pub fn new(discount_repo: Arc<D>) -> Self {
        Self { discount_repo }
    }

    pub async fn validate(&self, code: &str, as_of: NaiveDate) -> DiscountResult<DiscountModel> {
        let discount = self
            .discount_repo
            .find_by_code(code.to_string())
            .await
            .map_err(|err| {
                error!(code, db_error = ?err, "discounts: failed to look up code");
                DiscountError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(code, "discounts: unknown code");
                DiscountError::NotFound
            })?;

        check_discount(&discount, as_of)?;

        DiscountModel::from_entity(discount).map_err(DiscountError::Internal)
    }

    pub async fn generate_code(&self, prefix: Option<String>) -> DiscountResult<String> {
        let prefix = prefix.unwrap_or_default().to_uppercase();

        for _ in 0..MAX_CODE_ATTEMPTS {
            let suffix: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(CODE_LENGTH)
                .map(char::from)
                .collect::<String>()
                .to_uppercase();
            let candidate = format!("{prefix}{suffix}");

            let exists = self
                .discount_repo
                .code_exists(candidate.clone())
                .await
                .map_err(|err| {
                    error!(db_error = ?err, "discounts: failed to check code uniqueness");
                    DiscountError::Internal(err)
                })?;

            if !exists {
                return Ok(candidate);
            }
        }

        error!(
            attempts = MAX_CODE_ATTEMPTS,
            "discounts: exhausted code generation attempts"
        );
        Err(DiscountError::CodeSpaceExhausted)
    }

    pub async fn create_discount(&self, model: CreateDiscountModel) -> DiscountResult<DiscountModel> {
        let code = match model.code {
            Some(code) => code.to_uppercase(),
            None => self.generate_code(None).await?,
        };

        let discount_id = self
            .discount_repo
            .create(InsertDiscountEntity {
                code: code.clone(),
                discount_type: model.discount_type.to_string(),
                value: model.value,
                valid_from: model.valid_from,
                valid_to: model.valid_to,
                max_uses: model.max_uses,
                used_count: 0,
            })
            .await
            .map_err(|err| {
                error!(code, db_error = ?err, "discounts: failed to create discount");
                DiscountError::Internal(err)
            })?;

        info!(code, %discount_id, "discounts: discount created");

        let discount = self
            .discount_repo
            .find_by_id(discount_id)
            .await
            .map_err(DiscountError::Internal)?
            .ok_or_else(|| {
                DiscountError::Internal(anyhow::anyhow!("created discount not found"))
            })?;

        DiscountModel::from_entity(discount).map_err(DiscountError::Internal)
    }

    /// Called exactly once per confirmed booking that used the code. The
    /// guarded SQL update keeps `used_count` below `max_uses` even under
    /// concurrent confirmations.
    pub async fn increment_usage(&self, discount_id: Uuid) -> DiscountResult<()> {
        let updated = self
            .discount_repo
            .increment_usage(discount_id)
            .await
            .map_err(|err| {
                error!(%discount_id, db_error = ?err, "discounts: failed to increment usage");
                DiscountError::Internal(err)
            })?;

        if !updated {
            error!(%discount_id, "discounts: usage cap reached at increment time");
            return Err(DiscountError::Exhausted);
        }

        Ok(())
    }

    pub async fn reset_usage(&self, discount_id: Uuid) -> DiscountResult<()> {
        self.discount_repo
            .reset_usage(discount_id)
            .await
            .map_err(DiscountError::Internal)?;

        info!(%discount_id, "discounts: usage counter reset by admin");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mockall::Sequence;
    use mockall::predicate::eq;
    use uuid::Uuid;

    use super::*;
    use crate::domain::repositories::discounts::MockDiscountRepository;

    fn discount(code: &str, discount_type: DiscountType, value: i64) -> DiscountEntity {
        DiscountEntity {
            id: Uuid::new_v4(),
            code: code.to_string(),
            discount_type: discount_type.to_string(),
            value,
            valid_from: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            valid_to: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            max_uses: 10,
            used_count: 0,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn percent_discount_takes_value_percent_off() {
        assert_eq!(apply_discount(100_000, DiscountType::Percent, 10), 90_000);
    }

    #[test]
    fn fixed_discount_subtracts_value() {
        assert_eq!(apply_discount(100_000, DiscountType::Fixed, 20_000), 80_000);
    }

    #[test]
    fn discount_never_goes_negative() {
        assert_eq!(apply_discount(10_000, DiscountType::Fixed, 20_000), 0);
        assert_eq!(apply_discount(10_000, DiscountType::Percent, 150), 0);
    }

    #[test]
    fn window_check_rejects_outside_dates() {
        let entity = discount("SAVE10", DiscountType::Percent, 10);

        let before = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert!(matches!(
            check_discount(&entity, before),
            Err(DiscountError::Expired)
        ));

        let after = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(matches!(
            check_discount(&entity, after),
            Err(DiscountError::Expired)
        ));

        let inside = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        assert!(check_discount(&entity, inside).is_ok());
    }

    #[test]
    fn usage_cap_check_rejects_exhausted_codes() {
        let mut entity = discount("SAVE10", DiscountType::Percent, 10);
        entity.used_count = entity.max_uses;

        let inside = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        assert!(matches!(
            check_discount(&entity, inside),
            Err(DiscountError::Exhausted)
        ));
    }

    #[tokio::test]
    async fn validate_returns_not_found_for_unknown_code() {
        let mut repo = MockDiscountRepository::new();
        repo.expect_find_by_code()
            .with(eq("NOPE".to_string()))
            .returning(|_| Ok(None));

        let usecase = DiscountUseCase::new(Arc::new(repo));
        let as_of = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();

        assert!(matches!(
            usecase.validate("NOPE", as_of).await,
            Err(DiscountError::NotFound)
        ));
    }

    #[tokio::test]
    async fn validate_returns_model_for_valid_code() {
        let entity = discount("SAVE10", DiscountType::Percent, 10);
        let mut repo = MockDiscountRepository::new();
        let returned = entity.clone();
        repo.expect_find_by_code()
            .with(eq("SAVE10".to_string()))
            .returning(move |_| Ok(Some(returned.clone())));

        let usecase = DiscountUseCase::new(Arc::new(repo));
        let as_of = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();

        let model = usecase.validate("SAVE10", as_of).await.unwrap();
        assert_eq!(model.code, "SAVE10");
        assert_eq!(model.discount_type, DiscountType::Percent);
        assert_eq!(model.value, 10);
    }

    #[tokio::test]
    async fn generate_code_retries_on_collision() {
        let mut repo = MockDiscountRepository::new();
        let mut seq = Sequence::new();
        repo.expect_code_exists()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        repo.expect_code_exists()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));

        let usecase = DiscountUseCase::new(Arc::new(repo));
        let code = usecase.generate_code(Some("SAVE".to_string())).await.unwrap();

        assert!(code.starts_with("SAVE"));
        assert_eq!(code.len(), "SAVE".len() + CODE_LENGTH);
    }

    #[tokio::test]
    async fn generate_code_fails_loudly_when_namespace_saturated() {
        let mut repo = MockDiscountRepository::new();
        repo.expect_code_exists().returning(|_| Ok(true));

        let usecase = DiscountUseCase::new(Arc::new(repo));

        assert!(matches!(
            usecase.generate_code(None).await,
            Err(DiscountError::CodeSpaceExhausted)
        ));
    }

    #[tokio::test]
    async fn increment_usage_surfaces_cap_breach() {
        let discount_id = Uuid::new_v4();
        let mut repo = MockDiscountRepository::new();
        repo.expect_increment_usage()
            .with(eq(discount_id))
            .returning(|_| Ok(false));

        let usecase = DiscountUseCase::new(Arc::new(repo));

        assert!(matches!(
            usecase.increment_usage(discount_id).await,
            Err(DiscountError::Exhausted)
        ));
    }
}
