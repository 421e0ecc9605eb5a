//! Background worker draining the click-job channel.
//!
//! The redirect path queues enrichment and counter jobs here instead of
//! spawning a task per request; the bounded channel caps memory growth under
//! load spikes and a full queue drops the job rather than blocking a
//! response. Every failure is logged with the failing stage and dropped:
//! at-least-once analytics with tolerated loss is the contract.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::click_event::ClickContext;
use crate::domain::entities::NewEnrichedClickEvent;
use crate::domain::repositories::{EventRepository, LinkRepository};
use crate::utils::user_agent;

/// A unit of deferred analytics work.
#[derive(Debug)]
pub enum ClickJob {
    /// Insert the enriched analytics row for an already-persisted base event.
    Enrich {
        base_event_id: Option<i64>,
        link_id: i64,
        occurred_at: DateTime<Utc>,
        ctx: ClickContext,
    },
    /// Increment the link's denormalized hit counter.
    CountHit { link_id: i64 },
}

/// Consumes click jobs until the channel closes.
///
/// Jobs are processed sequentially; there is no ordering guarantee across
/// requests and none is needed.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickJob>,
    events: Arc<dyn EventRepository>,
    links: Arc<dyn LinkRepository>,
) {
    while let Some(job) = rx.recv().await {
        match job {
            ClickJob::Enrich {
                base_event_id,
                link_id,
                occurred_at,
                ctx,
            } => {
                let ua = user_agent::classify(ctx.user_agent.as_deref());

                let new_event = NewEnrichedClickEvent {
                    base_event_id,
                    short_link_id: link_id,
                    occurred_at,
                    ip_address: ctx.ip,
                    user_agent: ctx.user_agent,
                    referrer: ctx.referrer,
                    device_type: Some(ua.device_type.as_str().to_string()),
                    browser: ua.browser,
                    operating_system: ua.os,
                    utm_source: ctx.utm.source,
                    utm_medium: ctx.utm.medium,
                    utm_campaign: ctx.utm.campaign,
                };

                if let Err(e) = events.insert_enriched(new_event).await {
                    warn!(
                        link_id,
                        ?base_event_id,
                        stage = "enriched_insert",
                        "Analytics write failed: {:?}",
                        e
                    );
                } else {
                    debug!(link_id, "Enriched click event recorded");
                }
            }
            ClickJob::CountHit { link_id } => {
                if let Err(e) = links.increment_hit_count(link_id).await {
                    warn!(
                        link_id,
                        stage = "hit_count",
                        "Analytics write failed: {:?}",
                        e
                    );
                }
            }
        }
    }

    debug!("Click worker channel closed, worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockEventRepository, MockLinkRepository};
    use crate::error::AppError;
    use serde_json::json;

    #[tokio::test]
    async fn test_enrich_job_classifies_user_agent() {
        let mut events = MockEventRepository::new();
        events
            .expect_insert_enriched()
            .withf(|e| {
                e.device_type.as_deref() == Some("desktop")
                    && e.browser.as_deref() == Some("Firefox")
                    && e.base_event_id == Some(77)
            })
            .times(1)
            .returning(|_| Ok(1));
        let links = MockLinkRepository::new();

        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(run_click_worker(rx, Arc::new(events), Arc::new(links)));

        tx.send(ClickJob::Enrich {
            base_event_id: Some(77),
            link_id: 5,
            occurred_at: Utc::now(),
            ctx: ClickContext {
                user_agent: Some(
                    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0"
                        .to_string(),
                ),
                ..Default::default()
            },
        })
        .await
        .unwrap();

        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_count_hit_failure_is_swallowed() {
        let events = MockEventRepository::new();
        let mut links = MockLinkRepository::new();
        links
            .expect_increment_hit_count()
            .times(1)
            .returning(|_| Err(AppError::internal("boom", json!({}))));

        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(run_click_worker(rx, Arc::new(events), Arc::new(links)));

        tx.send(ClickJob::CountHit { link_id: 9 }).await.unwrap();

        drop(tx);
        // Worker must exit cleanly despite the failed increment.
        handle.await.unwrap();
    }
}
