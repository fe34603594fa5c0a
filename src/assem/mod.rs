mod node;
mod print;

pub use node::{Instr, Targets};
pub use print::print_body;
