// Application layer - Use cases and the seams infrastructure plugs into
pub mod dashboard_shell;
pub mod data_cache;
pub mod data_provider;
pub mod key_value_store;
pub mod scheduled_task;
pub mod session_script;
