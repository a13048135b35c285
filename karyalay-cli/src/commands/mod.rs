pub mod base_url;
pub mod completion;
pub mod config;
pub mod detect;
pub mod resolve;
pub mod signals;
pub mod write;
