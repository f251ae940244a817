//! Compact tree skeleton codes: direction/fork/return instructions, their
//! base64 text form, and facing rotation.
#![forbid(unsafe_code)]

mod codec;
mod facing;
mod jocode;

pub use codec::{CodeCompiler, FORK_CODE, Instruction, RETURN_CODE, decode, encode};
pub use facing::{forward_table, inverse_table};
pub use jocode::{CodeError, JoCode};
