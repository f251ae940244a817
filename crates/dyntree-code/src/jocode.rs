use core::convert::Infallible;
use core::fmt;
use core::str::FromStr;

use dyntree_geom::Direction;

use crate::codec::{Instruction, decode, encode};
use crate::facing::{forward_table, inverse_table};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    #[error("fork nesting deeper than {limit} at instruction {index}")]
    ForkDepthExceeded { index: usize, limit: usize },
}

/// A tree skeleton code together with the facing it is read in.
///
/// Stored instructions never change except through [`JoCode::rotate`];
/// [`JoCode::code_at`] reads them back through the inverse table of the
/// active facing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoCode {
    instructions: Vec<u8>,
    careful: bool,
    facing: Direction,
}

impl JoCode {
    pub fn new(text: &str) -> Self {
        Self::from_instructions(decode(text))
    }

    pub fn from_instructions(instructions: Vec<u8>) -> Self {
        Self {
            instructions: instructions.into_iter().map(|b| b & 7).collect(),
            careful: false,
            facing: Direction::North,
        }
    }

    /// Careful codes refuse to fuse into neighbouring branches and prune loops.
    pub fn with_careful(mut self, careful: bool) -> Self {
        self.careful = careful;
        self
    }

    #[inline]
    pub fn is_careful(&self) -> bool {
        self.careful
    }

    #[inline]
    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn set_facing(&mut self, facing: Direction) -> &mut Self {
        self.facing = facing;
        self
    }

    /// Rewrites every stored instruction through the forward table of `dir`.
    pub fn rotate(&mut self, dir: Direction) -> &mut Self {
        self.facing = dir;
        let table = forward_table(dir);
        for b in self.instructions.iter_mut() {
            *b = table[usize::from(*b)];
        }
        self
    }

    /// Instruction `index` as seen from the active facing.
    #[inline]
    pub fn code_at(&self, index: usize) -> Option<u8> {
        let table = inverse_table(self.facing);
        self.instructions.get(index).map(|&b| table[usize::from(b)])
    }

    #[inline]
    pub fn instruction_at(&self, index: usize) -> Option<Instruction> {
        self.code_at(index).map(Instruction::from_code)
    }

    #[inline]
    pub fn instructions(&self) -> &[u8] {
        &self.instructions
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
}

impl fmt::Display for JoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for JoCode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(JoCode::new(s))
    }
}
