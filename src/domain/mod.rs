// Domain layer - Plain data and invariants, no I/O
pub mod error;
pub mod machine;
pub mod prediction;
pub mod telemetry;
