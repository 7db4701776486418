pub mod history_service;
pub mod record_store;
pub mod request_log;
pub mod search_service;
pub mod usage_counter;
pub mod youtube_client;
