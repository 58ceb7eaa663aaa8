pub mod admin;
pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod notify;
pub mod server;
pub mod shared;
pub mod tickets;
