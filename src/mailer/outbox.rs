//! In-memory retry queue for notifications that failed to send
//!
//! Messages are kept in arrival order. A background task retries them on a
//! fixed interval until they go out or run out of attempts. The queue lives
//! in process memory and does not survive a restart.

use super::{Mailer, OutgoingEmail};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
struct PendingEmail {
    email: OutgoingEmail,
    attempts: u32,
    last_error: String,
    queued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetrySummary {
    pub sent: usize,
    pub requeued: usize,
    pub dropped: usize,
}

pub struct Outbox {
    queue: Mutex<VecDeque<PendingEmail>>,
    max_attempts: u32,
    capacity: usize,
}

impl Outbox {
    pub fn new(max_attempts: u32, capacity: usize) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            max_attempts: max_attempts.max(1),
            capacity: capacity.max(1),
        }
    }

    /// Queue a message whose first send attempt failed with `error`
    pub async fn enqueue(&self, email: OutgoingEmail, error: String) {
        let mut queue = self.queue.lock().await;
        if queue.len() >= self.capacity {
            drop_oldest(&mut queue);
        }
        queue.push_back(PendingEmail {
            email,
            attempts: 1,
            last_error: error,
            queued_at: Utc::now(),
        });
    }

    pub async fn len(&self) -> usize {
        self.queue.lock().await.len()
    }

    /// Try every queued message once.
    ///
    /// The queue lock is not held while sending so new failures can be
    /// queued in the meantime.
    pub async fn retry_pending(&self, mailer: &dyn Mailer) -> RetrySummary {
        let pending: Vec<PendingEmail> = self.queue.lock().await.drain(..).collect();
        let mut summary = RetrySummary::default();
        let mut requeue = Vec::new();

        for mut item in pending {
            match mailer.send(&item.email).await {
                Ok(message_id) => {
                    tracing::info!(
                        to = %item.email.to,
                        %message_id,
                        attempts = item.attempts + 1,
                        "Queued email sent"
                    );
                    summary.sent += 1;
                }
                Err(e) => {
                    item.attempts += 1;
                    item.last_error = e.to_string();
                    if item.attempts >= self.max_attempts {
                        tracing::error!(
                            to = %item.email.to,
                            subject = %item.email.subject,
                            attempts = item.attempts,
                            "Giving up on queued email: {}",
                            item.last_error
                        );
                        summary.dropped += 1;
                    } else {
                        tracing::warn!(
                            to = %item.email.to,
                            attempts = item.attempts,
                            "Queued email failed again: {}",
                            item.last_error
                        );
                        requeue.push(item);
                    }
                }
            }
        }

        summary.requeued = requeue.len();
        if !requeue.is_empty() {
            let mut queue = self.queue.lock().await;
            // Retried messages are older than anything queued meanwhile
            for item in requeue.into_iter().rev() {
                queue.push_front(item);
            }
            while queue.len() > self.capacity && drop_oldest(&mut queue) {
                summary.dropped += 1;
            }
        }
        summary
    }
}

fn drop_oldest(queue: &mut VecDeque<PendingEmail>) -> bool {
    match queue.pop_front() {
        Some(oldest) => {
            tracing::error!(
                to = %oldest.email.to,
                subject = %oldest.email.subject,
                queued_at = %oldest.queued_at,
                "Outbox full, dropping oldest message"
            );
            true
        }
        None => false,
    }
}

/// Retry the outbox every `interval` until the runtime shuts down
pub fn spawn_retry_loop(
    outbox: Arc<Outbox>,
    mailer: Arc<dyn Mailer>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if outbox.len().await == 0 {
                continue;
            }
            let summary = outbox.retry_pending(mailer.as_ref()).await;
            tracing::info!(
                sent = summary.sent,
                requeued = summary.requeued,
                dropped = summary.dropped,
                "Outbox retry finished"
            );
        }
    })
}
