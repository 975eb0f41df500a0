// Domain layer - Parameters, timeline and telemetry records
pub mod map_instance;
pub mod parameter;
pub mod telemetry;
pub mod timeline;
