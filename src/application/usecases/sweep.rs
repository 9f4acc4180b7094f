use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info};

use crate::domain::repositories::bookings::BookingRepository;
use crate::domain::value_objects::enums::booking_statuses::BookingStatus;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub checked_in: usize,
    pub checked_out: usize,
    pub failed: usize,
}

/// Day-boundary reconciliation: arrivals whose check-in date is today move to
/// checked-in, stays ending today move to checked-out. Pending arrivals are
/// auto-checked-in; a guest who shows up is a guest regardless of whether the
/// front desk confirmed in time.
pub struct StatusSweepUseCase<B>
where
    B: BookingRepository + Send + Sync + 'static,
{
    booking_repo: Arc<B>,
}

impl<B> StatusSweepUseCase<B>
where
    B: BookingRepository + Send + Sync + 'static,
{
    pub fn new(booking_repo: Arc<B>) -> Self {
        Self { booking_repo }
    }

    /// One booking failing never aborts the sweep; failures are counted and
    /// retried on the next day's run if the booking still qualifies.
    pub async fn run(&self, today: NaiveDate) -> SweepReport {
        let mut report = SweepReport::default();

        match self
            .booking_repo
            .bookings_checking_in_on(
                today,
                vec![BookingStatus::Pending, BookingStatus::Confirmed],
            )
            .await
        {
            Ok(arrivals) => {
                for booking in arrivals {
                    match self
                        .booking_repo
                        .update_status(
                            booking.id,
                            vec![BookingStatus::Pending, BookingStatus::Confirmed],
                            BookingStatus::CheckedIn,
                        )
                        .await
                    {
                        Ok(true) => report.checked_in += 1,
                        Ok(false) => {}
                        Err(err) => {
                            report.failed += 1;
                            error!(booking_id = %booking.id, db_error = ?err, "sweep: check-in failed");
                        }
                    }
                }
            }
            Err(err) => {
                report.failed += 1;
                error!(db_error = ?err, "sweep: arrival scan failed");
            }
        }

        match self
            .booking_repo
            .bookings_checking_out_on(today, vec![BookingStatus::CheckedIn])
            .await
        {
            Ok(departures) => {
                for booking in departures {
                    match self
                        .booking_repo
                        .update_status(
                            booking.id,
                            vec![BookingStatus::CheckedIn],
                            BookingStatus::CheckedOut,
                        )
                        .await
                    {
                        Ok(true) => report.checked_out += 1,
                        Ok(false) => {}
                        Err(err) => {
                            report.failed += 1;
                            error!(booking_id = %booking.id, db_error = ?err, "sweep: check-out failed");
                        }
                    }
                }
            }
            Err(err) => {
                report.failed += 1;
                error!(db_error = ?err, "sweep: departure scan failed");
            }
        }

        info!(
            %today,
            checked_in = report.checked_in,
            checked_out = report.checked_out,
            failed = report.failed,
            "sweep: day-boundary sweep finished"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::predicate::eq;
    use uuid::Uuid;

    use super::*;
    use crate::domain::entities::bookings::BookingEntity;
    use crate::domain::repositories::bookings::MockBookingRepository;

    fn booking(status: BookingStatus, check_in: NaiveDate, check_out: NaiveDate) -> BookingEntity {
        BookingEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            check_in,
            check_out,
            total_price: 1_000_000,
            final_price: 1_000_000,
            discount_id: None,
            status: status.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn sweep_checks_in_arrivals_and_checks_out_departures() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 3).unwrap();
        let arrival = booking(BookingStatus::Pending, today, today + chrono::Duration::days(2));
        let departure = booking(
            BookingStatus::CheckedIn,
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            today,
        );
        let arrival_id = arrival.id;
        let departure_id = departure.id;

        let mut repo = MockBookingRepository::new();
        repo.expect_bookings_checking_in_on()
            .with(
                eq(today),
                eq(vec![BookingStatus::Pending, BookingStatus::Confirmed]),
            )
            .returning(move |_, _| Ok(vec![arrival.clone()]));
        repo.expect_bookings_checking_out_on()
            .with(eq(today), eq(vec![BookingStatus::CheckedIn]))
            .returning(move |_, _| Ok(vec![departure.clone()]));
        repo.expect_update_status()
            .with(
                eq(arrival_id),
                eq(vec![BookingStatus::Pending, BookingStatus::Confirmed]),
                eq(BookingStatus::CheckedIn),
            )
            .times(1)
            .returning(|_, _, _| Ok(true));
        repo.expect_update_status()
            .with(
                eq(departure_id),
                eq(vec![BookingStatus::CheckedIn]),
                eq(BookingStatus::CheckedOut),
            )
            .times(1)
            .returning(|_, _, _| Ok(true));

        let report = StatusSweepUseCase::new(Arc::new(repo)).run(today).await;

        assert_eq!(
            report,
            SweepReport {
                checked_in: 1,
                checked_out: 1,
                failed: 0,
            }
        );
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_the_sweep() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 3).unwrap();
        let broken = booking(BookingStatus::Pending, today, today + chrono::Duration::days(1));
        let healthy = booking(BookingStatus::Confirmed, today, today + chrono::Duration::days(1));
        let broken_id = broken.id;
        let healthy_id = healthy.id;

        let mut repo = MockBookingRepository::new();
        repo.expect_bookings_checking_in_on()
            .returning(move |_, _| Ok(vec![broken.clone(), healthy.clone()]));
        repo.expect_bookings_checking_out_on()
            .returning(|_, _| Ok(vec![]));
        repo.expect_update_status()
            .withf(move |id, _, _| *id == broken_id)
            .returning(|_, _, _| Err(anyhow::anyhow!("connection reset")));
        repo.expect_update_status()
            .withf(move |id, _, _| *id == healthy_id)
            .returning(|_, _, _| Ok(true));

        let report = StatusSweepUseCase::new(Arc::new(repo)).run(today).await;

        assert_eq!(report.checked_in, 1);
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn booking_raced_to_another_state_is_skipped_silently() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 3).unwrap();
        let arrival = booking(BookingStatus::Pending, today, today + chrono::Duration::days(1));

        let mut repo = MockBookingRepository::new();
        repo.expect_bookings_checking_in_on()
            .returning(move |_, _| Ok(vec![arrival.clone()]));
        repo.expect_bookings_checking_out_on()
            .returning(|_, _| Ok(vec![]));
        repo.expect_update_status().returning(|_, _, _| Ok(false));

        let report = StatusSweepUseCase::new(Arc::new(repo)).run(today).await;

        assert_eq!(report, SweepReport::default());
    }
}
