pub mod configuration;
pub mod routing;
pub mod telemetry;
