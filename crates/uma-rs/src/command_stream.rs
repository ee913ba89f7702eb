//! Command-stream words understood by the accelerator.
//!
//! Code generation treats the stream as opaque; this module only exists so
//! tests and tooling can build and inspect streams. A word keeps the opcode in
//! its low 16 bits and an 8-bit operand index in bits 16..24.

use std::fmt;

use crate::error::{CodegenError, CodegenResult};

pub const OPCODE_LOAD_INPUT: i32 = 0x01;
pub const OPCODE_LOAD_WEIGHT: i32 = 0x02;
pub const OPCODE_GEMM: i32 = 0x10;
pub const OPCODE_STORE: i32 = 0x20;

const OPCODE_MASK: i32 = 0xFFFF;
const INDEX_SHIFT: u32 = 16;
const INDEX_MASK: i32 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    LoadInput { index: u8 },
    LoadWeight { index: u8 },
    Gemm,
    Store { index: u8 },
}

impl Command {
    pub fn opcode(self) -> i32 {
        match self {
            Command::LoadInput { .. } => OPCODE_LOAD_INPUT,
            Command::LoadWeight { .. } => OPCODE_LOAD_WEIGHT,
            Command::Gemm => OPCODE_GEMM,
            Command::Store { .. } => OPCODE_STORE,
        }
    }

    pub fn encode(self) -> i32 {
        let index = match self {
            Command::LoadInput { index }
            | Command::LoadWeight { index }
            | Command::Store { index } => index as i32,
            Command::Gemm => 0,
        };
        self.opcode() | (index << INDEX_SHIFT)
    }

    pub fn decode(word: i32) -> CodegenResult<Self> {
        if word >> (INDEX_SHIFT + 8) != 0 {
            return Err(CodegenError::UnknownCommand { word });
        }
        let index = ((word >> INDEX_SHIFT) & INDEX_MASK) as u8;
        match word & OPCODE_MASK {
            OPCODE_LOAD_INPUT => Ok(Command::LoadInput { index }),
            OPCODE_LOAD_WEIGHT => Ok(Command::LoadWeight { index }),
            OPCODE_GEMM if index == 0 => Ok(Command::Gemm),
            OPCODE_STORE => Ok(Command::Store { index }),
            _ => Err(CodegenError::UnknownCommand { word }),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::LoadInput { index } => write!(f, "load_inp[{index}]"),
            Command::LoadWeight { index } => write!(f, "load_wgt[{index}]"),
            Command::Gemm => write!(f, "gemm"),
            Command::Store { index } => write!(f, "store[{index}]"),
        }
    }
}

pub fn decode_stream(words: &[i32]) -> CodegenResult<Vec<Command>> {
    words.iter().map(|word| Command::decode(*word)).collect()
}

#[derive(Debug, Clone, Default)]
pub struct CommandStreamBuilder {
    words: Vec<i32>,
}

impl CommandStreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) -> &mut Self {
        self.words.push(command.encode());
        self
    }

    /// Indices wider than 8 bits are truncated to their low byte.
    pub fn load_input(&mut self, index: u32) -> &mut Self {
        self.push(Command::LoadInput {
            index: low_byte(index),
        })
    }

    pub fn load_weight(&mut self, index: u32) -> &mut Self {
        self.push(Command::LoadWeight {
            index: low_byte(index),
        })
    }

    pub fn gemm(&mut self) -> &mut Self {
        self.push(Command::Gemm)
    }

    pub fn store(&mut self, index: u32) -> &mut Self {
        self.push(Command::Store {
            index: low_byte(index),
        })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn finish(&self) -> Vec<i32> {
        self.words.clone()
    }
}

fn low_byte(index: u32) -> u8 {
    (index & INDEX_MASK as u32) as u8
}
