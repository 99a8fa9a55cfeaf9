pub mod analytics;
pub mod client;
pub mod document;
pub mod message;
pub mod portal;
pub mod project;
pub mod timeline;
