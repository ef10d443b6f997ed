use std::fmt;

use crate::error::ChunkError;

// Les ordinaux font partie de l'encodage : on ajoute toujours à la fin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    Constant = 0, // operand: const_idx
    Return = 1,
}

impl OpCode {
    pub const ALL: [OpCode; 2] = [OpCode::Constant, OpCode::Return];

    /// Nombre d'octets d'opérande qui suivent l'opcode.
    ///
    /// Le désassembleur et la future boucle d'exécution avancent tous les deux
    /// avec cette fonction ; elle est la seule source de vérité.
    pub const fn operand_byte_count(self) -> usize {
        match self {
            OpCode::Constant => 1,
            OpCode::Return => 0,
        }
    }

    /// Taille totale de l'instruction (opcode compris).
    pub const fn width(self) -> usize {
        1 + self.operand_byte_count()
    }

    /// Décode l'octet situé à `offset` de `code`.
    pub fn decode(byte: u8, offset: usize) -> Result<Self, ChunkError> {
        OpCode::try_from(byte).map_err(|byte| ChunkError::UnknownOpcode { offset, byte })
    }

    pub const fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Constant => "OP_CONSTANT",
            OpCode::Return => "OP_RETURN",
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> Self {
        op as u8
    }
}

impl TryFrom<u8> for OpCode {
    type Error = u8;

    fn try_from(b: u8) -> Result<Self, Self::Error> {
        match b {
            0 => Ok(OpCode::Constant),
            1 => Ok(OpCode::Return),
            other => Err(other),
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.mnemonic())
    }
}
