use crate::args::defaults::{PAYLOAD_SIZE_MAX_FACTOR, PAYLOAD_SIZE_STD_DEV_DIVISOR};
use rand::distributions::Alphanumeric;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Produces the topic of the `seq`-th message of a worker.
pub trait TopicGenerator: Send + Sync {
    fn topic(&self, seq: u64) -> String;
}

/// Produces the payload of the `seq`-th message, `size` being the requested size in bytes.
pub trait PayloadGenerator: Send + Sync {
    fn payload(&self, seq: u64, size: u32) -> String;
}

/// `loadr/<client id>/data/<seq>`, one topic per message.
pub struct ClientTopic {
    client_id: String,
}

impl ClientTopic {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
        }
    }
}

impl TopicGenerator for ClientTopic {
    fn topic(&self, seq: u64) -> String {
        format!("loadr/{}/data/{}", self.client_id, seq)
    }
}

/// `<prefix>_<seq>`.
pub struct SequenceTopic {
    prefix: String,
}

impl SequenceTopic {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl TopicGenerator for SequenceTopic {
    fn topic(&self, seq: u64) -> String {
        format!("{}_{}", self.prefix, seq)
    }
}

/// Random alphanumeric payload, its length drawn from Normal(size, size / 20)
/// and kept within `1..=2 * size`.
#[derive(Default)]
pub struct GaussianPayload;

impl GaussianPayload {
    fn sample_size(size: u32) -> usize {
        let mean = size as f64;
        let std_dev = mean / PAYLOAD_SIZE_STD_DEV_DIVISOR;
        let sampled = match Normal::new(mean, std_dev) {
            Ok(normal) => normal.sample(&mut rand::thread_rng()),
            Err(_) => mean,
        };
        sampled.round().clamp(1.0, (mean * PAYLOAD_SIZE_MAX_FACTOR).max(1.0)) as usize
    }
}

impl PayloadGenerator for GaussianPayload {
    fn payload(&self, _seq: u64, size: u32) -> String {
        let length = Self::sample_size(size);
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect()
    }
}

/// Exactly `size` bytes cycling through `'a'..='z'`.
#[derive(Default)]
pub struct FixedPayload;

impl PayloadGenerator for FixedPayload {
    fn payload(&self, _seq: u64, size: u32) -> String {
        let mut payload = String::with_capacity(size as usize);
        for i in 0..size {
            let c = (97 + (i % 26)) as u8 as char;
            payload.push(c);
        }
        payload
    }
}

/// A short human readable payload naming the message and the size it stands in for.
#[derive(Default)]
pub struct LabelledPayload;

impl PayloadGenerator for LabelledPayload {
    fn payload(&self, seq: u64, size: u32) -> String {
        format!("Message {seq} was meant to be {size} bytes long")
    }
}
