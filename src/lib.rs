pub mod api;
pub mod commands;
pub mod fetch;
pub mod runtime;
