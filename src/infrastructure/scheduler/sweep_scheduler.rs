use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use tracing::info;

use crate::application::usecases::sweep::StatusSweepUseCase;
use crate::domain::repositories::bookings::BookingRepository;

/// Runs the day-boundary sweep once per day at the configured local hour.
/// A failed run is logged inside the use case and retried the next day.
pub async fn run_sweep_loop<B>(usecase: Arc<StatusSweepUseCase<B>>, hour: u32)
where
    B: BookingRepository + Send + Sync + 'static,
{
    loop {
        let now = Local::now().naive_local();
        let wait = sleep_until_next_run(now, hour);
        info!(wait_secs = wait.as_secs(), "sweep: sleeping until next run");
        tokio::time::sleep(wait).await;

        let today = Local::now().date_naive();
        let report = usecase.run(today).await;
        info!(
            %today,
            checked_in = report.checked_in,
            checked_out = report.checked_out,
            failed = report.failed,
            "sweep: scheduled run finished"
        );
    }
}

fn sleep_until_next_run(now: NaiveDateTime, hour: u32) -> StdDuration {
    let run_time = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let mut next = now.date().and_time(run_time);
    if next <= now {
        next += Duration::days(1);
    }

    (next - now).to_std().unwrap_or(StdDuration::from_secs(3600))
}
