use super::Frame;
use crate::temp::Temp;

#[derive(Clone, Debug)]
pub struct X86Frame {
    registers: Vec<Temp>,
    return_sink: Vec<Temp>,
}

impl X86Frame {
    pub fn new() -> Self {
        X86Frame {
            registers: ["eax", "ebp", "ebx", "ecx", "edi", "edx", "eip", "esi", "esp"]
                .iter()
                .map(|&x| Temp::named(x))
                .collect(),
            return_sink: ["eax", "ebp", "esp", "ebx", "esi", "edi"]
                .iter()
                .map(|&x| Temp::named(x))
                .collect(),
        }
    }
    pub fn rv(&self) -> Temp {
        Temp::named("eax")
    }
    pub fn fp(&self) -> Temp {
        Temp::named("ebp")
    }
}

impl Default for X86Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame for X86Frame {
    fn registers(&self) -> &[Temp] {
        &self.registers
    }
    fn return_sink(&self) -> &[Temp] {
        &self.return_sink
    }
}
