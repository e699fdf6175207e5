use loadr_report::qos::Qos;
use std::num::NonZeroU32;
use std::time::Duration;

pub const DEFAULT_CLIENT_ID_PREFIX: &str = "loadr";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 1883;
pub const DEFAULT_QOS: Qos = Qos::AtLeastOnce;
pub const DEFAULT_MSG_COUNT: NonZeroU32 = nonzero_lit::u32!(10);
pub const DEFAULT_MSG_SIZE: NonZeroU32 = nonzero_lit::u32!(100);
pub const DEFAULT_PROCESSES: NonZeroU32 = nonzero_lit::u32!(1);

pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(60);
pub const DEFAULT_DISCONNECT_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_REQUEST_CHANNEL_CAPACITY: usize = 100;

/// Payload sizes are drawn from Normal(size, size / divisor).
pub const PAYLOAD_SIZE_STD_DEV_DIVISOR: f64 = 20.0;
/// Sampled payload sizes never exceed `size * factor`.
pub const PAYLOAD_SIZE_MAX_FACTOR: f64 = 2.0;

/// Room for the topic and the MQTT headers on top of the payload.
pub const PACKET_OVERHEAD: usize = 4 * 1024;
/// Largest remaining length MQTT can encode.
pub const MAX_MQTT_PACKET_SIZE: usize = 268_435_455;

pub fn default_client_id() -> String {
    format!("{}-{}", DEFAULT_CLIENT_ID_PREFIX, std::process::id())
}
