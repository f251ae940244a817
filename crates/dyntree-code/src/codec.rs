use base64::alphabet;
use dyntree_geom::Direction;

pub const FORK_CODE: u8 = 6;
pub const RETURN_CODE: u8 = 7;

const INVALID: u8 = 0xFF;

/// One decoded 3-bit instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    Move(Direction),
    Fork,
    Return,
}

impl Instruction {
    /// Interprets the low three bits of `code`.
    pub fn from_code(code: u8) -> Instruction {
        match code & 7 {
            FORK_CODE => Instruction::Fork,
            RETURN_CODE => Instruction::Return,
            d => match Direction::from_index(d) {
                Some(dir) => Instruction::Move(dir),
                None => Instruction::Return,
            },
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Instruction::Move(dir) => dir as u8,
            Instruction::Fork => FORK_CODE,
            Instruction::Return => RETURN_CODE,
        }
    }
}

/// Packs instruction pairs into base64 symbols, padding odd input with a return.
pub fn encode(instructions: &[u8]) -> String {
    let alphabet = alphabet::STANDARD;
    let symbols = alphabet.as_str().as_bytes();
    let mut out = String::with_capacity(instructions.len().div_ceil(2));
    for pair in instructions.chunks(2) {
        let hi = pair[0] & 7;
        let lo = pair.get(1).copied().unwrap_or(RETURN_CODE) & 7;
        out.push(char::from(symbols[usize::from(hi << 3 | lo)]));
    }
    out
}

/// Unpacks each base64 symbol into two instructions. Characters outside the
/// alphabet are skipped.
pub fn decode(text: &str) -> Vec<u8> {
    let alphabet = alphabet::STANDARD;
    let mut lookup = [INVALID; 256];
    for (value, &sym) in alphabet.as_str().as_bytes().iter().enumerate() {
        lookup[usize::from(sym)] = value as u8;
    }
    let mut out = Vec::with_capacity(text.len() * 2);
    for b in text.bytes() {
        let v = lookup[usize::from(b)];
        if v == INVALID {
            continue;
        }
        out.push(v >> 3);
        out.push(v & 7);
    }
    out
}

/// Accumulates instructions while walking a branch network.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeCompiler {
    instructions: Vec<u8>,
}

impl CodeCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            instructions: Vec::with_capacity(n),
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            instructions: decode(text),
        }
    }

    /// Appends a direction; anything outside 0..=5 is dropped.
    pub fn add_direction(&mut self, dir: i32) {
        if (0..=5).contains(&dir) {
            self.instructions.push(dir as u8);
        }
    }

    pub fn add_instruction(&mut self, instruction: Instruction) {
        self.instructions.push(instruction.code());
    }

    pub fn add_fork(&mut self) {
        self.instructions.push(FORK_CODE);
    }

    pub fn add_return(&mut self) {
        self.instructions.push(RETURN_CODE);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn encode(&self) -> String {
        encode(&self.instructions)
    }

    pub fn compile(self) -> Vec<u8> {
        self.instructions
    }
}
