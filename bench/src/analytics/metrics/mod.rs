pub mod group;
pub mod individual;
