pub mod collector;
pub mod gauges;
pub mod server;

pub use collector::Collector;
pub use gauges::{GaugeBoard, MetricsError};
pub use server::{router, serve};
