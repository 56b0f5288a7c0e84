// src/scheduler.rs
//! Hourly trigger: `M * * * *` evaluated in a fixed-offset zone.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, Utc};
use tokio::task::JoinHandle;

use crate::pipeline::{PipelineContext, Trigger};

pub const DEFAULT_CRON: &str = "55 * * * *";
pub const DEFAULT_TIMEZONE: &str = "Asia/Seoul";
pub const DEFAULT_UTC_OFFSET: &str = "+09:00";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlySchedule {
    pub minute: u32,
    /// Zone name, used for logging only. Fire times come from `offset`
    /// alone: there is no DST handling, so pick a zone without DST or
    /// update `utc_offset` when it shifts. For an hourly schedule only the
    /// offset's minutes matter.
    pub timezone: String,
    pub offset: FixedOffset,
}

impl HourlySchedule {
    /// Only the hourly form is supported: a fixed minute followed by four `*`.
    pub fn parse(cron: &str, timezone: &str, utc_offset: &str) -> Result<Self> {
        let fields: Vec<&str> = cron.split_whitespace().collect();
        if fields.len() != 5 {
            bail!("cron `{cron}`: expected 5 fields, got {}", fields.len());
        }
        if fields[1..].iter().any(|f| *f != "*") {
            bail!("cron `{cron}`: only `<minute> * * * *` is supported");
        }
        let minute: u32 = fields[0]
            .parse()
            .with_context(|| format!("cron `{cron}`: minute is not a number"))?;
        if minute > 59 {
            bail!("cron `{cron}`: minute {minute} out of range");
        }
        let offset: FixedOffset = utc_offset
            .parse()
            .map_err(|e| anyhow!("utc_offset `{utc_offset}`: {e}"))?;

        Ok(Self {
            minute,
            timezone: timezone.to_string(),
            offset,
        })
    }

    /// First fire strictly after `now`.
    pub fn next_fire_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let base = now.timestamp();
        let local = base + i64::from(self.offset.local_minus_utc());
        let into_hour = local.rem_euclid(3600);
        let mut delta = i64::from(self.minute) * 60 - into_hour;
        if delta <= 0 {
            delta += 3600;
        }
        DateTime::<Utc>::from_timestamp(base + delta, 0)
            .unwrap_or_else(|| now + ChronoDuration::seconds(delta))
    }

    /// Next fire for the loop. Never at or before the slot that just fired,
    /// even if the wall clock reads slightly behind it after the sleep.
    pub fn next_fire_from(
        &self,
        now: DateTime<Utc>,
        last: Option<DateTime<Utc>>,
    ) -> DateTime<Utc> {
        let from = last.map_or(now, |l| l.max(now));
        self.next_fire_after(from)
    }
}

/// Spawn the hourly loop. A failed run is logged and the loop simply waits
/// for the next fire.
pub fn spawn_scheduler(ctx: PipelineContext, schedule: HourlySchedule) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last: Option<DateTime<Utc>> = None;
        loop {
            let now = Utc::now();
            let next = schedule.next_fire_from(now, last);
            tracing::info!(
                target: "scheduler",
                next = %next.with_timezone(&schedule.offset),
                tz = %schedule.timezone,
                "next scheduled run"
            );
            let wait = (next - now).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;
            last = Some(next);

            if let Err(e) = ctx.run_once(Trigger::Scheduled).await {
                tracing::error!(target: "scheduler", error = %e, "scheduled run failed");
            }
        }
    })
}
