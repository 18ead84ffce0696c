pub mod config;
pub mod stats;
pub mod subjects;
pub mod timer;
