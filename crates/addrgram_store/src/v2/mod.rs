pub mod codec;
pub mod crc;
pub mod reader;
pub mod types;
pub mod writer;

pub use types::MetaHeader;
