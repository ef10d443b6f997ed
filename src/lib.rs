pub mod buffer;
pub mod chunk;
pub mod config;
pub mod debug;
pub mod demo;
pub mod error;
pub mod opcode;
pub mod value;

pub use buffer::GrowthPolicy;
pub use chunk::{Chunk, ChunkImage, MAX_CONSTANTS};
pub use error::{ChunkError, ChunkResult};
pub use opcode::OpCode;
pub use value::Value;
