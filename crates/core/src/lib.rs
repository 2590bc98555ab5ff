pub mod chunk;
pub mod config;
pub mod document;
pub mod error;

pub use chunk::*;
pub use config::{load_dotenv, ChunkConfig};
pub use document::*;
pub use error::*;
