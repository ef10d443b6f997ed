use thiserror::Error;

use crate::opcode::OpCode;

/// Erreurs de construction et de décodage d'un chunk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    #[error("too many constants in one chunk (limit is {limit})")]
    ConstantPoolExhausted { limit: usize },

    #[error("constant index {index} at offset {offset:04} is out of range (pool size {len})")]
    ConstantOutOfRange { offset: usize, index: u8, len: usize },

    #[error("unknown opcode {byte} at offset {offset:04}")]
    UnknownOpcode { offset: usize, byte: u8 },

    #[error("{opcode} at offset {offset:04} expects {expected} operand byte(s) past the end of the chunk")]
    TruncatedInstruction { offset: usize, opcode: OpCode, expected: usize },

    #[error("offset {offset:04} is past the end of the chunk ({len} bytes)")]
    OffsetOutOfBounds { offset: usize, len: usize },

    #[error("chunk has {code} code bytes but {lines} line entries")]
    LineCountMismatch { code: usize, lines: usize },
}

pub type ChunkResult<T> = Result<T, ChunkError>;
