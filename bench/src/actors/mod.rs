pub mod mqtt_sender;
pub mod sender;
pub mod worker;
