//! Pattern algebra: instruction model, combinators, disassembly, checks.

pub mod charset;
pub mod dump;
pub mod error;
pub mod instruction;
pub mod patt;
pub mod verify;

mod infix;
mod prefix;
mod repeat;

pub use charset::CharSet;
pub use dump::{dump_pattern, dump_program};
pub use error::{PatternError, PatternErrorKind};
pub use instruction::{CapKind, Instruction, Offset};
pub use patt::{MAX_PATT_LEN, Pattern};
pub use verify::{verify_pattern, verify_program};
