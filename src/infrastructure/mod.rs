pub mod attachments;
pub mod config;
pub mod export;
pub mod repositories;
pub mod scheduler;
pub mod timezone;
