use crate::actors::sender::Sender;
use crate::analytics::metrics::individual::from_latencies;
use crate::args::defaults::{
    DEFAULT_ACK_TIMEOUT, DEFAULT_DISCONNECT_TIMEOUT, DEFAULT_KEEP_ALIVE,
    DEFAULT_REQUEST_CHANNEL_CAPACITY, MAX_MQTT_PACKET_SIZE, PACKET_OVERHEAD,
    PAYLOAD_SIZE_MAX_FACTOR,
};
use crate::error::LoadrError;
use crate::utils::generators::{PayloadGenerator, TopicGenerator};
use async_trait::async_trait;
use bytes::Bytes;
use loadr_report::qos::Qos;
use loadr_report::stats_record::StatsRecord;
use rumqttc::{AsyncClient, ClientError, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tracing::{error, warn};

/// Publishes over MQTT and measures, per message, the time from the publish
/// request until the broker completed the QoS handshake.
pub struct MqttSender {
    host: String,
    port: u16,
    client_id: String,
    topics: Arc<dyn TopicGenerator>,
    payloads: Arc<dyn PayloadGenerator>,
    ack_timeout: Duration,
    count_total: u64,
    latencies_ms: Vec<f64>,
}

impl MqttSender {
    pub fn new(
        host: &str,
        port: u16,
        client_id: &str,
        topics: Arc<dyn TopicGenerator>,
        payloads: Arc<dyn PayloadGenerator>,
    ) -> Self {
        Self {
            host: host.to_owned(),
            port,
            client_id: client_id.to_owned(),
            topics,
            payloads,
            ack_timeout: DEFAULT_ACK_TIMEOUT,
            count_total: 0,
            latencies_ms: Vec::new(),
        }
    }

    /// Event loop silence after which unfinished messages count as failed.
    pub fn with_ack_timeout(mut self, ack_timeout: Duration) -> Self {
        self.ack_timeout = ack_timeout;
        self
    }

    fn record_latency(&mut self, requested_at: Instant) {
        self.latencies_ms
            .push(requested_at.elapsed().as_secs_f64() * 1_000.0);
    }

    async fn publish_all(
        client: AsyncClient,
        topics: Arc<dyn TopicGenerator>,
        payloads: Arc<dyn PayloadGenerator>,
        message_count: u32,
        message_size: u32,
        qos: QoS,
        requested: flume::Sender<Instant>,
    ) -> Result<(), ClientError> {
        for seq in 1..=message_count as u64 {
            let topic = topics.topic(seq);
            let payload = Bytes::from(payloads.payload(seq, message_size));
            // The event loop handles requests in order, so the n-th outgoing
            // publish matches the n-th timestamp.
            if requested.send(Instant::now()).is_err() {
                break;
            }
            client.publish_bytes(topic, qos, false, payload).await?;
        }
        Ok(())
    }

    async fn disconnect(client: AsyncClient, mut event_loop: EventLoop) {
        if let Err(error) = client.try_disconnect() {
            warn!("Cannot request disconnect: {error}");
            return;
        }

        let drained = timeout(DEFAULT_DISCONNECT_TIMEOUT, async {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Outgoing(Outgoing::Disconnect)) | Err(_) => break,
                    Ok(_) => {}
                }
            }
        })
        .await;

        if drained.is_err() {
            warn!("Disconnect was not acknowledged in {DEFAULT_DISCONNECT_TIMEOUT:?}");
        }
    }
}

/// Largest packet a run may send: the biggest payload a generator produces for
/// `message_size`, plus topic and headers.
fn max_packet_size(message_size: u32) -> usize {
    let max_payload = (message_size as f64 * PAYLOAD_SIZE_MAX_FACTOR).ceil() as usize;
    max_payload
        .saturating_add(PACKET_OVERHEAD)
        .min(MAX_MQTT_PACKET_SIZE)
}

fn mqtt_qos(qos: Qos) -> QoS {
    match qos {
        Qos::AtMostOnce => QoS::AtMostOnce,
        Qos::AtLeastOnce => QoS::AtLeastOnce,
        Qos::ExactlyOnce => QoS::ExactlyOnce,
    }
}

#[async_trait]
impl Sender for MqttSender {
    async fn run(
        &mut self,
        message_count: u32,
        message_size: u32,
        qos: Qos,
    ) -> Result<(), LoadrError> {
        self.count_total = message_count as u64;
        self.latencies_ms = Vec::with_capacity(message_count as usize);

        let mut mqtt_options =
            MqttOptions::new(self.client_id.clone(), self.host.clone(), self.port);
        let packet_size = max_packet_size(message_size);
        mqtt_options
            .set_keep_alive(DEFAULT_KEEP_ALIVE)
            .set_max_packet_size(packet_size, packet_size);
        let (client, mut event_loop) =
            AsyncClient::new(mqtt_options, DEFAULT_REQUEST_CHANNEL_CAPACITY);

        let (requested_tx, requested_rx) = flume::unbounded::<Instant>();
        let publisher = tokio::spawn(Self::publish_all(
            client.clone(),
            self.topics.clone(),
            self.payloads.clone(),
            message_count,
            message_size,
            mqtt_qos(qos),
            requested_tx,
        ));

        let mut in_flight: HashMap<u16, Instant> = HashMap::new();
        while (self.latencies_ms.len() as u64) < self.count_total {
            let event = match timeout(self.ack_timeout, event_loop.poll()).await {
                Ok(event) => event,
                Err(_) => {
                    warn!(
                        "Client {} → no broker activity for {:?}, {} message(s) still unconfirmed",
                        self.client_id,
                        self.ack_timeout,
                        self.count_total - self.latencies_ms.len() as u64
                    );
                    break;
                }
            };

            let event = match event {
                Ok(event) => event,
                Err(connection_error) => {
                    publisher.abort();
                    error!(
                        "Client {} → connection to {}:{} failed: {connection_error}",
                        self.client_id, self.host, self.port
                    );
                    return Err(connection_error.into());
                }
            };

            match event {
                Event::Outgoing(Outgoing::Publish(pkid)) => {
                    let Ok(requested_at) = requested_rx.try_recv() else {
                        continue;
                    };
                    if qos == Qos::AtMostOnce {
                        self.record_latency(requested_at);
                    } else {
                        in_flight.insert(pkid, requested_at);
                    }
                }
                Event::Incoming(Packet::PubAck(ack)) if qos == Qos::AtLeastOnce => {
                    if let Some(requested_at) = in_flight.remove(&ack.pkid) {
                        self.record_latency(requested_at);
                    }
                }
                Event::Incoming(Packet::PubComp(comp)) if qos == Qos::ExactlyOnce => {
                    if let Some(requested_at) = in_flight.remove(&comp.pkid) {
                        self.record_latency(requested_at);
                    }
                }
                _ => {}
            }
        }

        if publisher.is_finished() {
            match publisher.await {
                Ok(Err(client_error)) => return Err(client_error.into()),
                Err(join_error) => warn!("Publisher task did not complete: {join_error}"),
                Ok(Ok(())) => {}
            }
        } else {
            publisher.abort();
        }

        Self::disconnect(client, event_loop).await;
        Ok(())
    }

    fn stats(&self) -> StatsRecord {
        from_latencies(&self.client_id, self.count_total, &self.latencies_ms)
    }
}
