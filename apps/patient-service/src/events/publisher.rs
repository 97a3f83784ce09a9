//! Best-effort lifecycle event publishing.
//!
//! Events are protobuf-encoded and pushed onto the `patient` channel.
//! Publishing is advisory: the orchestrator logs failures and carries on,
//! so no consumer may be treated as a hard dependency of onboarding.

use async_trait::async_trait;
use prost::Message;
use redis::AsyncCommands;
use thiserror::Error;
use uuid::Uuid;

use mesh_proto::patient_events::PatientEvent;

pub const PATIENT_TOPIC: &str = "patient";

pub const EVENT_PATIENT_CREATED: &str = "PATIENT_CREATED";

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("event bus unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish_patient_created(
        &self,
        patient_id: Uuid,
        name: &str,
        email: &str,
    ) -> Result<(), PublishError>;
}

/// Redis pub/sub publisher. The connection manager reconnects on its own,
/// so a clone of this struct is all a request handler needs.
#[derive(Clone)]
pub struct RedisEventPublisher {
    conn: redis::aio::ConnectionManager,
}

impl RedisEventPublisher {
    pub async fn connect(redis_url: &str) -> Result<Self, PublishError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| PublishError::Unavailable(format!("invalid redis url: {e}")))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| PublishError::Unavailable(e.to_string()))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish_patient_created(
        &self,
        patient_id: Uuid,
        name: &str,
        email: &str,
    ) -> Result<(), PublishError> {
        let event = PatientEvent {
            patient_id: patient_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            event_type: EVENT_PATIENT_CREATED.to_string(),
        };
        let payload = event.encode_to_vec();

        let mut conn = self.conn.clone();
        let _receivers: i64 = conn
            .publish(PATIENT_TOPIC, payload)
            .await
            .map_err(|e| PublishError::Unavailable(e.to_string()))?;
        Ok(())
    }
}
