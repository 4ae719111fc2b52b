//! buildlog - dual-sink build logging
//!
//! Every message is written immediately to a console sink and appended in the
//! background to a durable log file, with the two outputs kept independent.

pub mod config;
pub mod logger;
pub mod sink;
