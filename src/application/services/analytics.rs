//! Analytics write pipeline.
//!
//! Records every successful resolution at two fidelities. Only the base-event
//! insert is awaited on the request path, and even that failure is logged and
//! swallowed: the redirect decision has already been made and must reach the
//! client regardless. Enrichment and the hit counter are queued as
//! fire-and-forget jobs on the bounded click channel.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::click_event::ClickContext;
use crate::domain::click_worker::ClickJob;
use crate::domain::entities::NewBaseClickEvent;
use crate::domain::repositories::EventRepository;

/// Two-stage click recorder.
pub struct AnalyticsPipeline {
    events: Arc<dyn EventRepository>,
    click_tx: mpsc::Sender<ClickJob>,
}

impl AnalyticsPipeline {
    pub fn new(events: Arc<dyn EventRepository>, click_tx: mpsc::Sender<ClickJob>) -> Self {
        Self { events, click_tx }
    }

    /// Records a successful resolution.
    ///
    /// Step A inserts the base event synchronously. Step B (enriched row) is
    /// scheduled only after A produced an id, since it back-references the
    /// base event; when A fails, B is skipped. Step C (hit counter) has no
    /// dependency on A and is always dispatched.
    ///
    /// Never returns an error: analytics failures must not alter the
    /// response already committed to the caller.
    pub async fn record(&self, link_id: i64, code: &str, ctx: ClickContext) {
        let base = match self
            .events
            .insert_base(NewBaseClickEvent {
                short_link_id: link_id,
            })
            .await
        {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(
                    code,
                    link_id,
                    stage = "base_insert",
                    "Analytics write failed: {:?}",
                    e
                );
                None
            }
        };

        if let Some(base) = base {
            let job = ClickJob::Enrich {
                base_event_id: Some(base.id),
                link_id,
                occurred_at: base.occurred_at,
                ctx,
            };
            if self.click_tx.try_send(job).is_err() {
                debug!(code, link_id, "Click queue full, enrichment dropped");
            }
        }

        if self
            .click_tx
            .try_send(ClickJob::CountHit { link_id })
            .is_err()
        {
            debug!(code, link_id, "Click queue full, hit count dropped");
        }
    }
}
