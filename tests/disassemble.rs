use std::fs;

use pretty_assertions::assert_eq;

use lox_bytecode::config::load_config;
use lox_bytecode::debug::{self, Decoded, Instruction};
use lox_bytecode::demo::{DEMO_NAME, demo_chunk};
use lox_bytecode::{Chunk, ChunkError, ChunkImage, GrowthPolicy, OpCode, Value};

#[test]
fn demo_listing() {
    let chunk = demo_chunk(GrowthPolicy::default()).unwrap();
    assert_eq!(
        debug::disassemble_chunk(&chunk, DEMO_NAME),
        "== test chunk ==\n\
         0000   11 OP_CONSTANT         0 '1.2'\n\
         0002   22 OP_CONSTANT         1 '3.4'\n\
         0004    | OP_RETURN\n"
    );
}

#[test]
fn demo_chunk_layout() {
    let chunk = demo_chunk(GrowthPolicy::default()).unwrap();
    assert_eq!(chunk.code(), &[0, 0, 0, 1, 1]);
    assert_eq!(chunk.lines(), &[11, 11, 22, 22, 22]);
    assert_eq!(chunk.constants(), &[Value::Number(1.2), Value::Number(3.4)]);
}

#[test]
fn demo_listing_does_not_depend_on_growth_policy() {
    let small = demo_chunk(GrowthPolicy::new(1, 2)).unwrap();
    let large = demo_chunk(GrowthPolicy::new(64, 4)).unwrap();
    assert_eq!(
        debug::disassemble_chunk(&small, DEMO_NAME),
        debug::disassemble_chunk(&large, DEMO_NAME)
    );
}

#[test]
fn sample_image_matches_demo() {
    let content = fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/demos/test_chunk.json")).unwrap();
    let image: ChunkImage = serde_json::from_str(&content).unwrap();
    let chunk = Chunk::from_image(&image, GrowthPolicy::default()).unwrap();

    let demo = demo_chunk(GrowthPolicy::default()).unwrap();
    assert_eq!(chunk.to_image(), demo.to_image());
}

#[test]
fn image_file_with_unknown_bytes_still_lists() {
    let image: ChunkImage = serde_json::from_str(
        r#"{ "code": [0, 0, 200, 1], "lines": [1, 1, 2, 3], "constants": [7] }"#,
    )
    .unwrap();
    let chunk = Chunk::from_image(&image, GrowthPolicy::default()).unwrap();

    let decoded: Vec<_> = chunk.instructions().map(|e| e.decoded).collect();
    assert_eq!(
        decoded,
        vec![
            Decoded::Instruction(Instruction::Constant { index: 0, value: Value::Number(7.0) }),
            Decoded::Unknown(200),
            Decoded::Instruction(Instruction::Simple(OpCode::Return)),
        ]
    );
}

#[test]
fn image_without_constants_field() {
    let image: ChunkImage = serde_json::from_str(r#"{ "code": [1], "lines": [4] }"#).unwrap();
    let chunk = Chunk::from_image(&image, GrowthPolicy::default()).unwrap();
    assert_eq!(debug::disassemble_chunk(&chunk, "ret"), "== ret ==\n0000    4 OP_RETURN\n");
}

#[test]
fn constant_pool_overflow_is_reported() {
    let mut chunk = Chunk::new();
    let mut last = Ok(0);
    for i in 0..300 {
        last = chunk.add_constant(Value::Number(i as f64));
        if last.is_err() {
            assert_eq!(i, 256);
            break;
        }
    }
    assert_eq!(last, Err(ChunkError::ConstantPoolExhausted { limit: 256 }));
}

#[test]
fn config_file_drives_growth_and_listing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lox.toml");
    fs::write(
        &path,
        "[chunk]\ninitial_capacity = 2\ngrowth_factor = 4\n\n[disassembler]\nshow_constants = true\n",
    )
    .unwrap();

    let config = load_config(Some(&path)).unwrap();
    let chunk = demo_chunk(config.chunk.growth_policy()).unwrap();
    assert_eq!(chunk.capacity(), 8);

    let listing = debug::disassemble_chunk_with(&chunk, DEMO_NAME, &config.disassembler);
    assert!(listing.starts_with("== test chunk ==\n;; constants\n[0000] 1.2\n[0001] 3.4\n;; code\n"));
}
