use std::{fmt, path::PathBuf, sync::Arc};

use anyhow::Result;
use serde_json::Value;
use shared_event_bus::{EventPublisher, EventRecord};
use shared_logging::{JsonLogger, LogLevel, LogRecord};
use tokio::runtime::{Handle, Runtime};
use uuid::Uuid;

/// Builder for pipeline telemetry sinks.
pub struct PipelineTelemetryBuilder {
    component: String,
    log_path: Option<PathBuf>,
    event_publisher: Option<Arc<dyn EventPublisher>>,
}

impl PipelineTelemetryBuilder {
    /// Creates the builder.
    #[must_use]
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            log_path: None,
            event_publisher: None,
        }
    }

    /// Sets the log path.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Sets the event publisher backing the side-channel sinks.
    #[must_use]
    pub fn event_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.event_publisher = Some(publisher);
        self
    }

    /// Builds the telemetry handle.
    pub fn build(self) -> Result<PipelineTelemetry> {
        PipelineTelemetry::new(self.component, self.log_path, self.event_publisher)
    }
}

/// Telemetry handle shared across pipeline components.
///
/// Publication is fire-and-forget: the pipeline swallows every telemetry
/// error, so a failing sink can never fail a planning call.
#[derive(Clone)]
pub struct PipelineTelemetry {
    inner: Arc<TelemetryInner>,
}

impl fmt::Debug for PipelineTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineTelemetry")
            .field("component", &self.inner.component)
            .finish()
    }
}

struct TelemetryInner {
    component: String,
    logger: Option<JsonLogger>,
    event: Option<EventHandle>,
}

struct EventHandle {
    runtime: Runtime,
    publisher: Arc<dyn EventPublisher>,
}

impl EventHandle {
    fn new(publisher: Arc<dyn EventPublisher>) -> Result<Self> {
        Ok(Self {
            runtime: Runtime::new()?,
            publisher,
        })
    }

    fn publish(&self, record: EventRecord) -> Result<()> {
        if let Ok(handle) = Handle::try_current() {
            let publisher = Arc::clone(&self.publisher);
            handle.spawn(async move {
                if let Err(err) = publisher.publish(record).await {
                    eprintln!("telemetry event publish failed: {err:?}");
                }
            });
            Ok(())
        } else {
            self.runtime.block_on(self.publisher.publish(record))
        }
    }
}

impl PipelineTelemetry {
    fn new(
        component: impl Into<String>,
        log_path: Option<PathBuf>,
        event_publisher: Option<Arc<dyn EventPublisher>>,
    ) -> Result<Self> {
        let logger = if let Some(path) = log_path {
            Some(JsonLogger::new(path)?)
        } else {
            None
        };
        let event = if let Some(publisher) = event_publisher {
            Some(EventHandle::new(publisher)?)
        } else {
            None
        };
        Ok(Self {
            inner: Arc::new(TelemetryInner {
                component: component.into(),
                logger,
                event,
            }),
        })
    }

    /// Returns a builder.
    #[must_use]
    pub fn builder(component: impl Into<String>) -> PipelineTelemetryBuilder {
        PipelineTelemetryBuilder::new(component)
    }

    /// Logs structured fields.
    pub fn log(&self, level: LogLevel, message: &str, fields: Value) -> Result<()> {
        if let Some(logger) = &self.inner.logger {
            let mut record = LogRecord::new(&self.inner.component, level, message);
            if let Some(obj) = fields.as_object() {
                record.fields = obj.clone();
            }
            logger.log(&record)?;
        }
        Ok(())
    }

    /// Publishes an event on the configured topic.
    pub fn event(&self, topic: &str, payload: Value) -> Result<()> {
        if let Some(handle) = &self.inner.event {
            handle.publish(EventRecord {
                id: format!("evt-{}", Uuid::new_v4()),
                source: self.inner.component.clone(),
                topic: topic.into(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                payload,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_event_bus::MemoryEventBus;
    use tempfile::tempdir;

    #[test]
    fn telemetry_writes_log_and_event() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("pipeline.log");
        let bus = Arc::new(MemoryEventBus::new(16));
        let telemetry = PipelineTelemetry::builder("pipeline")
            .log_path(&path)
            .event_publisher(bus.clone())
            .build()
            .unwrap();
        telemetry
            .log(LogLevel::Info, "pipeline.request.accepted", json!({ "group": "arm" }))
            .unwrap();
        telemetry
            .event("pipeline.display_planned_path", json!({ "waypoints": 3 }))
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("pipeline.request.accepted"));
        assert_eq!(bus.topic_snapshot("pipeline.display_planned_path").len(), 1);
    }

    #[test]
    fn bare_telemetry_is_a_no_op() {
        let telemetry = PipelineTelemetry::builder("pipeline").build().unwrap();
        assert!(telemetry
            .log(LogLevel::Debug, "pipeline.noop", json!({}))
            .is_ok());
        assert!(telemetry.event("pipeline.noop", json!({})).is_ok());
    }
}
