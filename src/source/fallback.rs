// src/source/fallback.rs
//! Two-tier fetch: primary once, backup once, then give up.

use metrics::counter;

use crate::error::FetchError;
use crate::reading::{SentimentReading, SourceTag};
use crate::source::SentimentSource;

/// Try `primary`; on any failure log a warning and try `backup`. A backup
/// failure is returned unchanged.
pub async fn fetch_with_fallback(
    primary: &dyn SentimentSource,
    backup: &dyn SentimentSource,
) -> Result<SentimentReading, FetchError> {
    match primary.fetch().await {
        Ok(r) => {
            log_rating(primary.name(), r.rating.as_deref());
            Ok(r.tagged(SourceTag::Primary))
        }
        Err(e) => {
            tracing::warn!(
                target: "fng",
                error = %e,
                primary = primary.name(),
                backup = backup.name(),
                "primary fetch failed, falling back"
            );
            counter!("fng_fallback_total").increment(1);

            let r = backup.fetch().await?;
            log_rating(backup.name(), r.rating.as_deref());
            Ok(r.tagged(SourceTag::Backup))
        }
    }
}

fn log_rating(source: &str, rating: Option<&str>) {
    if let Some(rating) = rating {
        tracing::debug!(target: "fng", source, rating, "origin rating");
    }
}
