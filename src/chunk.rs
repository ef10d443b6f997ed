use log::debug;
use serde::{Deserialize, Serialize};

use crate::buffer::{GrowableBuffer, GrowthPolicy};
use crate::error::{ChunkError, ChunkResult};
use crate::opcode::OpCode;
use crate::value::Value;

/// L'opérande de `OP_CONSTANT` tient sur un octet.
pub const MAX_CONSTANTS: usize = u8::MAX as usize + 1;

/// Unité de bytecode compilé : instructions, lignes source et constantes.
///
/// `lines[i]` est la ligne source qui a produit `code[i]`, les deux tampons
/// ont donc toujours la même longueur.
#[derive(Debug, Clone)]
pub struct Chunk {
    code: GrowableBuffer<u8>,
    lines: GrowableBuffer<u32>,
    constants: Vec<Value>,
}

impl Chunk {
    pub fn new() -> Self {
        Chunk::with_growth(GrowthPolicy::default())
    }

    pub fn with_growth(policy: GrowthPolicy) -> Self {
        Chunk {
            code: GrowableBuffer::new(policy),
            lines: GrowableBuffer::new(policy),
            constants: Vec::new(),
        }
    }

    pub fn write(&mut self, byte: u8, line: u32) {
        self.code.push(byte);
        self.lines.push(line);
    }

    pub fn write_op(&mut self, op: OpCode, line: u32) {
        self.write(op.into(), line);
    }

    pub fn add_constant(&mut self, value: Value) -> ChunkResult<u8> {
        let index = u8::try_from(self.constants.len())
            .map_err(|_| ChunkError::ConstantPoolExhausted { limit: MAX_CONSTANTS })?;
        debug!("constant [{}] = {}", index, value);
        self.constants.push(value);
        Ok(index)
    }

    /// Libère tout le stockage. Le chunk redevient vide, comme après `new`.
    pub fn free(&mut self) {
        debug!(
            "freeing chunk ({} bytes, {} constants)",
            self.code.len(),
            self.constants.len()
        );
        self.code.free();
        self.lines.free();
        self.constants = Vec::new();
    }

    pub fn code(&self) -> &[u8] {
        self.code.as_slice()
    }

    pub fn lines(&self) -> &[u32] {
        self.lines.as_slice()
    }

    pub fn constants(&self) -> &[Value] {
        &self.constants
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.code.capacity()
    }

    pub fn growth_policy(&self) -> GrowthPolicy {
        self.code.policy()
    }

    pub fn line_at(&self, offset: usize) -> Option<u32> {
        self.lines.get(offset).copied()
    }

    pub fn constant(&self, index: u8) -> Option<&Value> {
        self.constants.get(index as usize)
    }

    /// Reconstruit un chunk à partir de son image sérialisée.
    pub fn from_image(image: &ChunkImage, policy: GrowthPolicy) -> ChunkResult<Self> {
        if image.code.len() != image.lines.len() {
            return Err(ChunkError::LineCountMismatch {
                code: image.code.len(),
                lines: image.lines.len(),
            });
        }

        let mut chunk = Chunk::with_growth(policy);
        for value in &image.constants {
            chunk.add_constant(*value)?;
        }
        for (byte, line) in image.code.iter().zip(&image.lines) {
            chunk.write(*byte, *line);
        }
        Ok(chunk)
    }

    pub fn to_image(&self) -> ChunkImage {
        ChunkImage {
            code: self.code().to_vec(),
            lines: self.lines().to_vec(),
            constants: self.constants.clone(),
        }
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Chunk::new()
    }
}

/// Forme sérialisable d'un chunk (fichiers JSON de `lox disasm`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChunkImage {
    pub code: Vec<u8>,
    pub lines: Vec<u32>,
    #[serde(default)]
    pub constants: Vec<Value>,
}
