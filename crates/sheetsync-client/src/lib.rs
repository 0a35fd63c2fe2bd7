pub mod client;
pub mod config;
pub mod error;

pub use client::SheetsClient;
pub use config::Config;
pub use error::ClientError;
