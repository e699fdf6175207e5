use crate::actors::sender::{Sender, SenderFactory};
use crate::actors::worker::WorkerTask;
use crate::analytics::metrics::individual::from_latencies;
use crate::args::options::RunOptions;
use crate::error::LoadrError;
use crate::orchestrator::handle::WorkerHandle;
use crate::orchestrator::launcher::WorkerLauncher;
use crate::orchestrator::sink::StatsSink;
use async_trait::async_trait;
use loadr_report::qos::Qos;
use loadr_report::stats_record::StatsRecord;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub fn run_options(processes: u32, msg_count: u32) -> RunOptions {
    RunOptions {
        clientid: "loadr-test".to_owned(),
        host: "localhost".to_owned(),
        port: 1883,
        qos: Qos::AtLeastOnce,
        msg_count: NonZeroU32::new(msg_count).unwrap(),
        msg_size: NonZeroU32::new(100).unwrap(),
        processes: NonZeroU32::new(processes).unwrap(),
    }
}

/// Confirms every message but the last one, with latencies 1, 2, 3... ms.
pub struct FakeSender {
    client_id: String,
    fail: bool,
    count_total: u64,
    latencies_ms: Vec<f64>,
}

#[async_trait]
impl Sender for FakeSender {
    async fn run(
        &mut self,
        message_count: u32,
        _message_size: u32,
        _qos: Qos,
    ) -> Result<(), LoadrError> {
        self.count_total = message_count as u64;
        if self.fail {
            return Err(LoadrError::MqttConnection(rumqttc::ConnectionError::Io(
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
            )));
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.latencies_ms = (1..message_count).map(|seq| seq as f64).collect();
        Ok(())
    }

    fn stats(&self) -> StatsRecord {
        from_latencies(&self.client_id, self.count_total, &self.latencies_ms)
    }
}

#[derive(Default)]
pub struct FakeSenderFactory {
    fail: bool,
}

impl FakeSenderFactory {
    pub fn failing() -> Self {
        Self { fail: true }
    }
}

impl SenderFactory for FakeSenderFactory {
    fn create(&self, _host: &str, _port: u16, client_id: &str) -> Box<dyn Sender> {
        Box::new(FakeSender {
            client_id: client_id.to_owned(),
            fail: self.fail,
            count_total: 0,
            latencies_ms: Vec::new(),
        })
    }
}

/// Runs workers as tokio tasks of the test process, the submission index
/// standing in for the process id.
pub struct InProcessLauncher {
    sender_factory: Arc<dyn SenderFactory>,
}

impl InProcessLauncher {
    pub fn new(sender_factory: Arc<dyn SenderFactory>) -> Self {
        Self { sender_factory }
    }
}

impl WorkerLauncher for InProcessLauncher {
    fn launch(&self, index: usize, options: Arc<RunOptions>) -> Result<WorkerHandle, LoadrError> {
        let task = WorkerTask::new(options, self.sender_factory.clone());
        Ok(WorkerHandle::new(
            index,
            tokio::spawn(task.run(1000 + index as u32)),
        ))
    }
}

/// A worker named `worker-<index>` that finishes after `delay`.
pub fn finished_after(index: usize, delay: Duration) -> WorkerHandle {
    WorkerHandle::new(
        index,
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            Ok(StatsRecord::new(
                format!("worker-{index}"),
                10,
                10,
                2.0,
                0.5,
                1.0,
                3.0,
            ))
        }),
    )
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub waits: Vec<usize>,
    pub emitted: Vec<usize>,
    pub aggregates: Vec<StatsRecord>,
}

impl StatsSink for RecordingSink {
    fn waiting(&mut self, remaining: usize) {
        self.waits.push(remaining);
    }

    fn emit(&mut self, index: usize, _stats: &StatsRecord) {
        self.emitted.push(index);
    }

    fn emit_aggregate(&mut self, stats: &StatsRecord) {
        self.aggregates.push(stats.clone());
    }
}

/// Which QoS 1/2 publishes the fake broker confirms.
#[derive(Debug, Clone, Copy)]
pub enum BrokerAcks {
    All,
    None,
    First(usize),
}

impl BrokerAcks {
    fn confirms(&self, nth: usize) -> bool {
        match self {
            BrokerAcks::All => true,
            BrokerAcks::None => false,
            BrokerAcks::First(limit) => nth < *limit,
        }
    }
}

/// A single-connection MQTT 3.1.1 broker on a random local port.
///
/// It accepts the connection, confirms publishes according to `acks`
/// (PUBACK for QoS 1, PUBREC then PUBCOMP for QoS 2) and resolves to the
/// payload sizes it received once the client disconnects.
pub async fn start_fake_broker(acks: BrokerAcks) -> (u16, JoinHandle<Vec<usize>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let broker = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut payload_sizes = Vec::new();
        let mut confirmable = 0;
        while let Some((header, body)) = read_packet(&mut stream).await {
            let reply = match header >> 4 {
                // CONNECT
                1 => Some(vec![0x20, 0x02, 0x00, 0x00]),
                // PUBLISH
                3 => {
                    let qos = (header >> 1) & 0b11;
                    let topic_len = u16::from_be_bytes([body[0], body[1]]) as usize;
                    let mut offset = 2 + topic_len;
                    let pkid = if qos > 0 {
                        let pkid = [body[offset], body[offset + 1]];
                        offset += 2;
                        Some(pkid)
                    } else {
                        None
                    };
                    payload_sizes.push(body.len() - offset);
                    match pkid {
                        Some([hi, lo]) => {
                            let confirm = acks.confirms(confirmable);
                            confirmable += 1;
                            let ack_type = if qos == 1 { 0x40 } else { 0x50 };
                            confirm.then(|| vec![ack_type, 0x02, hi, lo])
                        }
                        None => None,
                    }
                }
                // PUBREL
                6 => Some(vec![0x70, 0x02, body[0], body[1]]),
                // PINGREQ
                12 => Some(vec![0xD0, 0x00]),
                // DISCONNECT
                14 => break,
                _ => None,
            };
            if let Some(reply) = reply {
                if stream.write_all(&reply).await.is_err() {
                    break;
                }
            }
        }
        payload_sizes
    });
    (port, broker)
}

async fn read_packet(stream: &mut TcpStream) -> Option<(u8, Vec<u8>)> {
    let header = stream.read_u8().await.ok()?;
    let mut remaining = 0usize;
    let mut shift = 0;
    loop {
        let byte = stream.read_u8().await.ok()?;
        remaining |= ((byte & 0x7f) as usize) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
    }
    let mut body = vec![0; remaining];
    stream.read_exact(&mut body).await.ok()?;
    Some((header, body))
}
