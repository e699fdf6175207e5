use derive_more::derive::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid QoS level {0}, expected one of 0, 1 or 2")]
pub struct InvalidQos(pub u8);

/// MQTT delivery guarantee requested for every published message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize, Default, PartialOrd, Ord,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum Qos {
    #[display("0")]
    AtMostOnce,
    #[default]
    #[display("1")]
    AtLeastOnce,
    #[display("2")]
    ExactlyOnce,
}

impl From<Qos> for u8 {
    fn from(qos: Qos) -> Self {
        match qos {
            Qos::AtMostOnce => 0,
            Qos::AtLeastOnce => 1,
            Qos::ExactlyOnce => 2,
        }
    }
}

impl TryFrom<u8> for Qos {
    type Error = InvalidQos;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Qos::AtMostOnce),
            1 => Ok(Qos::AtLeastOnce),
            2 => Ok(Qos::ExactlyOnce),
            other => Err(InvalidQos(other)),
        }
    }
}

impl FromStr for Qos {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = s
            .trim()
            .parse::<u8>()
            .map_err(|_| format!("'{s}' is not a QoS level, expected one of 0, 1 or 2"))?;
        Qos::try_from(level).map_err(|e| e.to_string())
    }
}
