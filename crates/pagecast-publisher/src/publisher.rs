//! Rate-limited publishing of post records.
//!
//! Records are sent in post log order. Sends are paced by a cursor that
//! advances by exactly one period per sent record, so time spent inside a
//! send (including congestion backoff) does not push later posts back.

use std::{path::Path, time::Duration};

use pagecast_core::{PostLog, PostRecord};
use tokio::time::{Instant, sleep, sleep_until};
use tracing::{debug, info, warn};

use crate::{
    chunk::{MESSAGE_LIMIT, split_message},
    error::{PublishError, Result},
    sink::{MessageSink, SendOutcome},
};

/// Added on top of every `retry_after` hint before resending.
pub const RETRY_MARGIN: Duration = Duration::from_millis(250);

/// Reported after each record has been fully delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress<'a> {
    /// 1-based position of the record in the (limited) input.
    pub index: usize,
    pub total: usize,
    pub slug: &'a str,
}

/// Publish statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishStats {
    /// Records whose every chunk was delivered.
    pub records_sent: usize,
    /// Messages accepted by the endpoint.
    pub chunks_sent: usize,
    /// Records with an empty post text.
    pub skipped: usize,
    /// Congestion replies absorbed by backoff.
    pub rate_limited: usize,
}

/// Spacing between records for a rate in records per minute.
///
/// The rate must be a finite positive number.
pub fn period_for_rate(rate_per_min: f64) -> Result<Duration> {
    if !rate_per_min.is_finite() || rate_per_min <= 0.0 {
        return Err(PublishError::InvalidRate(rate_per_min));
    }
    Duration::try_from_secs_f64(60.0 / rate_per_min)
        .map_err(|_| PublishError::InvalidRate(rate_per_min))
}

/// Delivers records to one channel at a fixed rate.
#[derive(Debug)]
pub struct Publisher<S> {
    sink: S,
    chat_id: String,
    period: Duration,
    message_limit: usize,
    max_rate_limit_retries: Option<u32>,
}

impl<S: MessageSink> Publisher<S> {
    /// Create a publisher sending at most `rate_per_min` records per minute.
    pub fn new(sink: S, chat_id: impl Into<String>, rate_per_min: f64) -> Result<Self> {
        Ok(Self {
            sink,
            chat_id: chat_id.into(),
            period: period_for_rate(rate_per_min)?,
            message_limit: MESSAGE_LIMIT,
            max_rate_limit_retries: None,
        })
    }

    /// Give up after `max` consecutive congestion replies for one chunk.
    /// `None` retries for as long as the endpoint keeps asking.
    #[must_use]
    pub fn with_max_rate_limit_retries(mut self, max: Option<u32>) -> Self {
        self.max_rate_limit_retries = max;
        self
    }

    /// Override the per-message character limit used for splitting.
    #[must_use]
    pub fn with_message_limit(mut self, limit: usize) -> Self {
        self.message_limit = limit;
        self
    }

    /// Minimum spacing between the starts of consecutive records.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Publish `records` in order, stopping at the first delivery error.
    ///
    /// `limit` truncates the input before anything is sent. `on_progress`
    /// is called after each record has been delivered.
    pub async fn publish<F>(
        &self,
        records: &[PostRecord],
        limit: Option<usize>,
        mut on_progress: F,
    ) -> Result<PublishStats>
    where
        F: FnMut(Progress<'_>),
    {
        let records = match limit {
            Some(n) => &records[..n.min(records.len())],
            None => records,
        };
        let total = records.len();
        let mut stats = PublishStats::default();

        info!(
            total,
            period_ms = self.period.as_millis() as u64,
            chat_id = %self.chat_id,
            "Publishing posts"
        );

        let mut next_tick = Instant::now();

        for (i, record) in records.iter().enumerate() {
            let text = record.post_text.trim();
            if text.is_empty() {
                debug!(slug = %record.slug, "empty post text, skipping");
                stats.skipped += 1;
                continue;
            }

            if Instant::now() < next_tick {
                sleep_until(next_tick).await;
            }

            for chunk in split_message(text, self.message_limit) {
                if chunk.trim().is_empty() {
                    continue;
                }
                self.send_with_backoff(&chunk, &mut stats).await?;
                stats.chunks_sent += 1;
            }

            next_tick += self.period;
            stats.records_sent += 1;

            info!(index = i + 1, total, slug = %record.slug, "Posted");
            on_progress(Progress {
                index: i + 1,
                total,
                slug: &record.slug,
            });
        }

        Ok(stats)
    }

    /// Send one chunk, waiting out congestion and resending the same text.
    async fn send_with_backoff(&self, text: &str, stats: &mut PublishStats) -> Result<()> {
        let mut retries = 0u32;

        loop {
            match self.sink.send(&self.chat_id, text).await? {
                SendOutcome::Delivered => return Ok(()),
                SendOutcome::RetryAfter(wait) => {
                    if self.max_rate_limit_retries.is_some_and(|max| retries >= max) {
                        return Err(PublishError::RetriesExhausted { attempts: retries });
                    }
                    retries += 1;
                    stats.rate_limited += 1;

                    warn!(
                        retry_after_secs = wait.as_secs_f64(),
                        attempt = retries,
                        "Rate limited, backing off"
                    );
                    sleep(wait + RETRY_MARGIN).await;
                }
            }
        }
    }
}

/// Read the whole post log at `path` and publish it.
///
/// A missing log is an error.
pub async fn publish_post_log<S, F>(
    publisher: &Publisher<S>,
    path: &Path,
    limit: Option<usize>,
    on_progress: F,
) -> Result<PublishStats>
where
    S: MessageSink,
    F: FnMut(Progress<'_>),
{
    let records = PostLog::new(path).read_existing()?;
    debug!(path = %path.display(), count = records.len(), "Loaded post log");
    publisher.publish(&records, limit, on_progress).await
}
