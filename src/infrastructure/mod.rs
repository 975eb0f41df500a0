// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod mock_provider;
pub mod storage;
pub mod stored_provider;
