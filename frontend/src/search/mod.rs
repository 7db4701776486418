pub mod api;
pub mod components;
pub mod search_options;
