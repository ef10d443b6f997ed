use std::fmt;
use std::io::{self, Write};

use log::warn;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::chunk::Chunk;
use crate::error::{ChunkError, ChunkResult};
use crate::opcode::OpCode;
use crate::value::Value;

/// Instruction décodée sans erreur.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Simple(OpCode),
    Constant { index: u8, value: Value },
}

impl Instruction {
    pub fn opcode(&self) -> OpCode {
        match self {
            Instruction::Simple(op) => *op,
            Instruction::Constant { .. } => OpCode::Constant,
        }
    }
}

/// Résultat du décodage best-effort d'une instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Instruction(Instruction),
    Unknown(u8),
    Malformed { opcode: OpCode, error: ChunkError },
    Invalid(ChunkError),
}

/// Une entrée du listing : où commence l'instruction, sa ligne source, ce
/// qu'elle contient et où commence la suivante.
#[derive(Debug, Clone, PartialEq)]
pub struct Disassembled {
    pub offset: usize,
    pub line: u32,
    /// Même ligne source que l'octet précédent.
    pub same_line: bool,
    pub decoded: Decoded,
    pub next: usize,
}

/// Options d'affichage, lues depuis la section `[disassembler]` de lox.toml.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingOptions {
    pub show_constants: bool,
}

/// Décode strictement l'instruction à `offset`.
///
/// Renvoie l'instruction et l'offset de la suivante. Une future boucle
/// d'exécution avance exactement de la même façon.
pub fn decode_instruction(chunk: &Chunk, offset: usize) -> ChunkResult<(Instruction, usize)> {
    let byte = *chunk.code().get(offset).ok_or(ChunkError::OffsetOutOfBounds {
        offset,
        len: chunk.len(),
    })?;
    let op = OpCode::decode(byte, offset)?;

    match op {
        OpCode::Constant => constant_instruction(chunk, offset),
        OpCode::Return => simple_instruction(op, offset),
    }
}

fn simple_instruction(op: OpCode, offset: usize) -> ChunkResult<(Instruction, usize)> {
    Ok((Instruction::Simple(op), offset + op.width()))
}

fn constant_instruction(chunk: &Chunk, offset: usize) -> ChunkResult<(Instruction, usize)> {
    // L'octet suivant contient l'index de la constante
    let index = operand(chunk, OpCode::Constant, offset, 0)?;
    let value = *chunk.constant(index).ok_or(ChunkError::ConstantOutOfRange {
        offset,
        index,
        len: chunk.constants().len(),
    })?;
    Ok((Instruction::Constant { index, value }, offset + OpCode::Constant.width()))
}

fn operand(chunk: &Chunk, op: OpCode, offset: usize, n: usize) -> ChunkResult<u8> {
    chunk
        .code()
        .get(offset + 1 + n)
        .copied()
        .ok_or(ChunkError::TruncatedInstruction {
            offset,
            opcode: op,
            expected: op.operand_byte_count(),
        })
}

/// Décode une instruction pour l'affichage, sans jamais échouer.
///
/// Un octet inconnu avance d'un octet ; une instruction tronquée saute à la
/// fin du chunk ; un index de constante invalide garde la taille normale de
/// l'instruction.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize) -> Disassembled {
    let line = chunk.line_at(offset).unwrap_or_default();
    let same_line = offset > 0 && offset < chunk.len() && chunk.line_at(offset - 1) == Some(line);

    let (decoded, next) = match decode_instruction(chunk, offset) {
        Ok((instruction, next)) => (Decoded::Instruction(instruction), next),
        Err(ChunkError::UnknownOpcode { byte, .. }) => {
            warn!("unknown opcode {} at offset {:04}", byte, offset);
            (Decoded::Unknown(byte), offset + 1)
        }
        Err(error @ ChunkError::ConstantOutOfRange { .. }) => {
            warn!("{}", error);
            let next = offset + OpCode::Constant.width();
            (Decoded::Malformed { opcode: OpCode::Constant, error }, next)
        }
        Err(error @ ChunkError::TruncatedInstruction { opcode, .. }) => {
            warn!("{}", error);
            (Decoded::Malformed { opcode, error }, chunk.len())
        }
        Err(error) => {
            warn!("{}", error);
            (Decoded::Invalid(error), offset.saturating_add(1))
        }
    };

    Disassembled { offset, line, same_line, decoded, next }
}

/// Itérateur sur le listing d'un chunk, de l'offset 0 jusqu'à `len(code)`.
pub struct Instructions<'a> {
    chunk: &'a Chunk,
    offset: usize,
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Disassembled;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.chunk.len() {
            return None;
        }
        let entry = disassemble_instruction(self.chunk, self.offset);
        self.offset = entry.next;
        Some(entry)
    }
}

impl Chunk {
    pub fn instructions(&self) -> Instructions<'_> {
        Instructions { chunk: self, offset: 0 }
    }
}

/// Listing complet d'un chunk, formaté à la demande.
pub struct Listing<'a> {
    pub chunk: &'a Chunk,
    pub name: &'a str,
    pub options: ListingOptions,
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.name)?;

        if self.options.show_constants {
            writeln!(f, ";; constants")?;
            for (i, value) in self.chunk.constants().iter().enumerate() {
                writeln!(f, "[{:04}] {}", i, value)?;
            }
            writeln!(f, ";; code")?;
        }

        for entry in self.chunk.instructions() {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

pub fn disassemble_chunk(chunk: &Chunk, name: &str) -> String {
    disassemble_chunk_with(chunk, name, &ListingOptions::default())
}

pub fn disassemble_chunk_with(chunk: &Chunk, name: &str, options: &ListingOptions) -> String {
    Listing { chunk, name, options: *options }.to_string()
}

pub fn write_chunk<W: Write>(
    out: &mut W,
    chunk: &Chunk,
    name: &str,
    options: &ListingOptions,
) -> io::Result<()> {
    write!(out, "{}", Listing { chunk, name, options: *options })
}

pub fn print_chunk(chunk: &Chunk, name: &str, options: &ListingOptions) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_chunk(&mut lock, chunk, name, options)?;
    lock.flush()
}

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoded::Instruction(instruction) => match instruction {
                Instruction::Simple(op) => write!(f, "{}", op),
                Instruction::Constant { index, value } => {
                    write!(f, "{:<16} {:4} '{}'", instruction.opcode(), index, value)
                }
            },
            Decoded::Unknown(byte) => write!(f, "Unknown opcode {}", byte),
            Decoded::Malformed {
                opcode: OpCode::Constant,
                error: ChunkError::ConstantOutOfRange { index, .. },
            } => write!(f, "{:<16} {:4} <no such constant>", OpCode::Constant, index),
            Decoded::Malformed { opcode, error } => write!(f, "{:<16} <{}>", opcode, error),
            Decoded::Invalid(error) => write!(f, "<{}>", error),
        }
    }
}

impl fmt::Display for Disassembled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04} ", self.offset)?;
        if self.same_line {
            write!(f, "   | ")?;
        } else {
            write!(f, "{:4} ", self.line)?;
        }
        write!(f, "{}", self.decoded)
    }
}

impl Serialize for Disassembled {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Disassembled", 5)?;
        s.serialize_field("offset", &self.offset)?;
        s.serialize_field("line", &self.line)?;
        s.serialize_field("same_line", &self.same_line)?;
        s.serialize_field("text", &self.decoded.to_string())?;
        s.serialize_field("next", &self.next)?;
        s.end()
    }
}
