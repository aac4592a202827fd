pub mod batch;
pub mod camera;
pub mod config;
pub mod downloader;
pub mod http;
pub mod metadata;
pub mod observability;
pub mod pipeline;
pub mod sanitize;
pub mod scheduler;
