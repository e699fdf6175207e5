use crate::actors::mqtt_sender::MqttSender;
use crate::error::LoadrError;
use crate::utils::generators::{ClientTopic, GaussianPayload};
use async_trait::async_trait;
use loadr_report::qos::Qos;
use loadr_report::stats_record::StatsRecord;
use std::sync::Arc;

/// Publishes a workload against a broker and tracks how it went.
#[async_trait]
pub trait Sender: Send {
    async fn run(
        &mut self,
        message_count: u32,
        message_size: u32,
        qos: Qos,
    ) -> Result<(), LoadrError>;

    /// Statistics of the last `run`.
    fn stats(&self) -> StatsRecord;
}

/// Builds the sender each worker publishes with.
pub trait SenderFactory: Send + Sync {
    fn create(&self, host: &str, port: u16, client_id: &str) -> Box<dyn Sender>;
}

/// MQTT senders with the default topic and payload generators.
#[derive(Debug, Default)]
pub struct MqttSenderFactory;

impl SenderFactory for MqttSenderFactory {
    fn create(&self, host: &str, port: u16, client_id: &str) -> Box<dyn Sender> {
        Box::new(MqttSender::new(
            host,
            port,
            client_id,
            Arc::new(ClientTopic::new(client_id)),
            Arc::new(GaussianPayload),
        ))
    }
}
