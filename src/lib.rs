pub mod error;
pub mod record;
pub mod env;
pub mod mapper;
pub mod attributes;
pub mod sink;
pub mod schema;
pub mod avro;
pub mod source;
pub mod pipeline;
pub mod config;
pub mod init;
pub mod interrupt;

pub use error::{Error, Result};
