pub mod anchor;
pub mod config;
pub mod timeline;
