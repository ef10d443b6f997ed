use crate::buffer::GrowthPolicy;
use crate::chunk::Chunk;
use crate::error::ChunkResult;
use crate::opcode::OpCode;
use crate::value::Value;

pub const DEMO_NAME: &str = "test chunk";

/// Chunk de démonstration : deux constantes puis un retour.
pub fn demo_chunk(policy: GrowthPolicy) -> ChunkResult<Chunk> {
    let mut chunk = Chunk::with_growth(policy);

    let constant = chunk.add_constant(Value::Number(1.2))?;
    chunk.write_op(OpCode::Constant, 11);
    chunk.write(constant, 11);

    let constant = chunk.add_constant(Value::Number(3.4))?;
    chunk.write_op(OpCode::Constant, 22);
    chunk.write(constant, 22);

    chunk.write_op(OpCode::Return, 22);
    Ok(chunk)
}
