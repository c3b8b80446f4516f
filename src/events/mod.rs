use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event after the owning write has committed. A closed channel
    /// only loses the notification, so it is logged rather than surfaced.
    pub async fn publish(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("Dropping domain event: {}", e);
        }
    }
}

/// Domain events emitted by the services once their transaction has committed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    RecordCreated {
        resource: String,
        id: Uuid,
    },
    RecordUpdated {
        resource: String,
        id: Uuid,
    },
    RecordDeleted {
        resource: String,
        id: Uuid,
        cascaded: u64,
    },
    /// A stock ledger was recomputed for one item.
    StockRebalanced {
        item_type: String,
        code: String,
        balance: f64,
        min_stock: Option<f64>,
    },
    /// Metrics and inputs of a lot were written to all of its records.
    LotSynchronized {
        lotno: String,
        records: u64,
        oee: f64,
    },
    /// A recurring todo series was (re)materialized.
    TodoSeriesGenerated {
        parent_id: Uuid,
        occurrences: usize,
    },
}

impl Event {
    pub fn created(resource: &str, id: Uuid) -> Self {
        Event::RecordCreated {
            resource: resource.to_string(),
            id,
        }
    }

    pub fn updated(resource: &str, id: Uuid) -> Self {
        Event::RecordUpdated {
            resource: resource.to_string(),
            id,
        }
    }

    pub fn deleted(resource: &str, id: Uuid, cascaded: u64) -> Self {
        Event::RecordDeleted {
            resource: resource.to_string(),
            id,
            cascaded,
        }
    }
}

/// Handlers registered with [`process_events`].
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle_event(&self, event: &Event) -> Result<(), String>;
}

/// Warns when a rebalanced item ends at or below its minimum stock.
pub struct LowStockMonitor;

#[async_trait]
impl EventHandler for LowStockMonitor {
    async fn handle_event(&self, event: &Event) -> Result<(), String> {
        if let Event::StockRebalanced {
            item_type,
            code,
            balance,
            min_stock: Some(min_stock),
        } = event
        {
            if balance <= min_stock {
                warn!(
                    item_type = %item_type,
                    code = %code,
                    balance = *balance,
                    min_stock = *min_stock,
                    "Stock at or below minimum"
                );
            }
        }
        Ok(())
    }
}

pub fn default_handlers() -> Vec<Arc<dyn EventHandler>> {
    vec![Arc::new(LowStockMonitor)]
}

/// Drains the event channel, fanning every event out to `handlers`.
pub async fn process_events(mut rx: mpsc::Receiver<Event>, handlers: Vec<Arc<dyn EventHandler>>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        debug!("Received event: {:?}", event);

        match &event {
            Event::RecordDeleted {
                resource,
                id,
                cascaded,
            } if *cascaded > 0 => {
                info!(resource = %resource, id = %id, cascaded, "Cascade delete completed");
            }
            Event::LotSynchronized {
                lotno,
                records,
                oee,
            } => {
                info!(lotno = %lotno, records, oee, "Lot synchronized");
            }
            Event::TodoSeriesGenerated {
                parent_id,
                occurrences,
            } => {
                info!(parent_id = %parent_id, occurrences, "Todo series generated");
            }
            _ => {}
        }

        for handler in &handlers {
            if let Err(e) = handler.handle_event(&event).await {
                error!("Event handler failed: event={:?}, error={}", event, e);
            }
        }
    }

    info!("Event processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Collect(Arc<Mutex<Vec<Event>>>);

    #[async_trait]
    impl EventHandler for Collect {
        async fn handle_event(&self, event: &Event) -> Result<(), String> {
            self.0.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn events_reach_every_handler_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (tx, rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);
        let worker = tokio::spawn(process_events(
            rx,
            vec![Arc::new(LowStockMonitor), Arc::new(Collect(seen.clone()))],
        ));

        let id = Uuid::new_v4();
        sender.publish(Event::created("supplier", id)).await;
        sender.publish(Event::deleted("supplier", id, 0)).await;
        drop(sender);
        worker.await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![Event::created("supplier", id), Event::deleted("supplier", id, 0)]
        );
    }

    #[tokio::test]
    async fn publish_on_closed_channel_does_not_panic() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        EventSender::new(tx)
            .publish(Event::updated("todo", Uuid::new_v4()))
            .await;
    }
}
