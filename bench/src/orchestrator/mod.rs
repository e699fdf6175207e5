pub mod collector;
pub mod dispatcher;
pub mod handle;
pub mod launcher;
pub mod sink;
