//! InfluxDB 1.x source driver.

mod client;

pub use client::{InfluxClient, InfluxError};
