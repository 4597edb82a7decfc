// Application layer - Use cases and the ports they depend on
pub mod collector;
pub mod machine_repository;
pub mod machine_service;
pub mod monitor_session;
pub mod prediction_service;
pub mod sampler;
