// Infrastructure layer - External dependencies and adapters
pub mod chunked_json;
pub mod config;
pub mod http_response;
pub mod memory_repository;
pub mod predictor_client;
pub mod supabase_repository;
