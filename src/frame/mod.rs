mod x86;

use crate::assem::Instr;
use crate::temp::Temp;

pub use x86::X86Frame;

/// The slice of a calling convention that register allocation needs to see.
pub trait Frame {
    /// Every machine register. These become pre-colored interference nodes.
    fn registers(&self) -> &[Temp];

    /// Registers whose values must survive to the end of the procedure
    /// (return value, stack/frame pointers, callee-saved registers).
    fn return_sink(&self) -> &[Temp];

    /// Appends an empty operation that uses every return-sink register, so liveness
    /// keeps them alive up to the final instruction.
    fn proc_entry_exit2(&self, mut body: Vec<Instr>) -> Vec<Instr> {
        body.push(Instr::oper("", Vec::new(), self.return_sink().to_vec()));
        body
    }
}
