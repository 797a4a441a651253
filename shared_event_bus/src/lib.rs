#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Topic-addressed event bus for fire-and-forget side-channel publication.

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::broadcast};

/// Generic event record encoded as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique identifier (uuid-prefixed).
    pub id: String,
    /// Component producing the event.
    pub source: String,
    /// Topic the event is addressed to (e.g. `pipeline.display_planned_path`).
    pub topic: String,
    /// ISO timestamp.
    pub timestamp: String,
    /// Arbitrary JSON payload.
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Event publisher interface.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes an event to the bus.
    async fn publish(&self, event: EventRecord) -> Result<()>;
}

/// Event subscriber interface.
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    /// Starts consuming events. Implementations should block or stream until channel closes.
    async fn subscribe(&self) -> Result<broadcast::Receiver<EventRecord>>;
}

/// In-memory broadcast bus (for local development and tests).
#[derive(Debug, Clone)]
pub struct MemoryEventBus {
    sender: broadcast::Sender<EventRecord>,
    capacity: usize,
    backlog: Arc<Mutex<VecDeque<EventRecord>>>,
}

impl MemoryEventBus {
    /// Creates a new bus retaining up to `capacity` recent events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            capacity: capacity.max(1),
            backlog: Arc::new(Mutex::new(VecDeque::with_capacity(capacity.max(1)))),
        }
    }

    /// Snapshot of recent events retained in memory.
    #[must_use]
    pub fn snapshot(&self) -> Vec<EventRecord> {
        self.backlog.lock().iter().cloned().collect()
    }

    /// Snapshot filtered to a single topic, preserving publication order.
    #[must_use]
    pub fn topic_snapshot(&self, topic: &str) -> Vec<EventRecord> {
        self.backlog
            .lock()
            .iter()
            .filter(|event| event.topic == topic)
            .cloned()
            .collect()
    }
}

/// File-backed publisher appending JSON lines, useful for durable sink logs.
#[derive(Debug, Clone)]
pub struct JsonlEventWriter {
    path: PathBuf,
}

impl JsonlEventWriter {
    /// Creates a writer that appends JSON lines to the given path.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }
}

#[async_trait]
impl EventPublisher for MemoryEventBus {
    async fn publish(&self, event: EventRecord) -> Result<()> {
        {
            let mut backlog = self.backlog.lock();
            backlog.push_back(event.clone());
            if backlog.len() > self.capacity {
                backlog.pop_front();
            }
        }
        let _ = self.sender.send(event);
        Ok(())
    }
}

#[async_trait]
impl EventSubscriber for MemoryEventBus {
    async fn subscribe(&self) -> Result<broadcast::Receiver<EventRecord>> {
        Ok(self.sender.subscribe())
    }
}

#[async_trait]
impl EventPublisher for JsonlEventWriter {
    async fn publish(&self, event: EventRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let data = serde_json::to_vec(&event)?;
        file.write_all(&data).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tokio::runtime::Runtime;

    fn sample_event(topic: &str) -> EventRecord {
        EventRecord {
            id: "event-1".into(),
            source: "tester".into(),
            topic: topic.into(),
            timestamp: "2026-08-01T00:00:00Z".into(),
            payload: serde_json::json!({"value": 1}),
        }
    }

    #[test]
    fn publishes_and_receives() {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let bus = MemoryEventBus::new(16);
            let mut rx = bus.subscribe().await.unwrap();
            bus.publish(sample_event("unit.test")).await.unwrap();
            let event = rx.recv().await.unwrap();
            assert_eq!(event.topic, "unit.test");
        });
    }

    #[test]
    fn topic_snapshot_filters_other_topics() {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let bus = MemoryEventBus::new(16);
            bus.publish(sample_event("alpha")).await.unwrap();
            bus.publish(sample_event("beta")).await.unwrap();
            bus.publish(sample_event("alpha")).await.unwrap();
            assert_eq!(bus.topic_snapshot("alpha").len(), 2);
            assert_eq!(bus.topic_snapshot("beta").len(), 1);
            assert!(bus.topic_snapshot("gamma").is_empty());
        });
    }

    #[test]
    fn backlog_is_bounded() {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let bus = MemoryEventBus::new(2);
            for _ in 0..5 {
                bus.publish(sample_event("bounded")).await.unwrap();
            }
            assert_eq!(bus.snapshot().len(), 2);
        });
    }

    #[test]
    fn jsonl_writer_appends_events() {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let dir = tempdir().unwrap();
            let path = dir.path().join("events.log");
            let writer = JsonlEventWriter::new(&path).unwrap();
            writer.publish(sample_event("unit.test")).await.unwrap();
            let content = std::fs::read_to_string(path).unwrap();
            assert!(content.contains("unit.test"));
        });
    }
}
