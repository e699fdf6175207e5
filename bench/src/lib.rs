pub mod actors;
pub mod analytics;
pub mod args;
pub mod error;
pub mod orchestrator;
pub mod runner;
pub mod utils;

#[cfg(test)]
mod testing;
