pub mod client;
pub mod config;

pub use client::{parse_cos_url, CosClient, CosError, CosLocation, FetchedObject};
pub use config::CosCredentials;
