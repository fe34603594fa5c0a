use std::fmt::Display;

use crate::temp::{Label, Temp};

/// Where control may go after an operation that carries jump information.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Targets {
    pub labels: Vec<Label>,
    pub falls_through: bool,
}

/// A machine instruction as produced by instruction selection.
///
/// Operand names inside `assem` are written as `` `d0 ``, `` `s1 ``, `` `j0 `` and refer
/// to the `dst`, `src` and jump-label lists respectively.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Instr {
    /// `jump == None` means the operation is not a control transfer and falls through.
    Oper {
        assem: String,
        dst: Vec<Temp>,
        src: Vec<Temp>,
        jump: Option<Targets>,
    },
    Move {
        assem: String,
        dst: Temp,
        src: Temp,
    },
    Label {
        assem: String,
        label: Label,
    },
}

impl Instr {
    pub fn oper(assem: &str, dst: Vec<Temp>, src: Vec<Temp>) -> Self {
        Instr::Oper {
            assem: assem.to_string(),
            dst,
            src,
            jump: None,
        }
    }

    /// Unconditional transfer to one of `labels`.
    pub fn jump(assem: &str, src: Vec<Temp>, labels: Vec<Label>) -> Self {
        Instr::Oper {
            assem: assem.to_string(),
            dst: Vec::new(),
            src,
            jump: Some(Targets {
                labels,
                falls_through: false,
            }),
        }
    }

    /// Conditional transfer: goes to one of `labels` or falls through.
    pub fn branch(assem: &str, src: Vec<Temp>, labels: Vec<Label>) -> Self {
        Instr::Oper {
            assem: assem.to_string(),
            dst: Vec::new(),
            src,
            jump: Some(Targets {
                labels,
                falls_through: true,
            }),
        }
    }

    pub fn mov(assem: &str, dst: Temp, src: Temp) -> Self {
        Instr::Move {
            assem: assem.to_string(),
            dst,
            src,
        }
    }

    pub fn label(label: Label) -> Self {
        Instr::Label {
            assem: format!("{}:", label),
            label,
        }
    }

    pub fn def(&self) -> &[Temp] {
        match self {
            Instr::Oper { dst, .. } => dst,
            Instr::Move { dst, .. } => std::slice::from_ref(dst),
            Instr::Label { .. } => &[],
        }
    }

    pub fn uses(&self) -> &[Temp] {
        match self {
            Instr::Oper { src, .. } => src,
            Instr::Move { src, .. } => std::slice::from_ref(src),
            Instr::Label { .. } => &[],
        }
    }

    pub fn is_move(&self) -> bool {
        matches!(self, Instr::Move { .. })
    }

    pub fn targets(&self) -> &[Label] {
        match self {
            Instr::Oper {
                jump: Some(targets),
                ..
            } => &targets.labels,
            _ => &[],
        }
    }

    pub fn falls_through(&self) -> bool {
        match self {
            Instr::Oper {
                jump: Some(targets),
                ..
            } => targets.falls_through,
            _ => true,
        }
    }

    /// The label this instruction defines, if it is a label.
    pub fn defines(&self) -> Option<&Label> {
        match self {
            Instr::Label { label, .. } => Some(label),
            _ => None,
        }
    }
}

fn format_assem(
    f: &mut std::fmt::Formatter<'_>,
    assem: &str,
    dst: &[Temp],
    src: &[Temp],
    jumps: &[Label],
) -> std::fmt::Result {
    let mut chars = assem.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '`' {
            write!(f, "{}", c)?;
            continue;
        }
        let kind = match chars.next() {
            Some(k) => k,
            None => return write!(f, "`"),
        };
        let mut digits = String::new();
        while let Some(&d) = chars.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            digits.push(d);
            chars.next();
        }
        let index = digits.parse::<usize>().ok();
        let operand = match (kind, index) {
            ('d', Some(i)) => dst.get(i).map(|t| t.to_string()),
            ('s', Some(i)) => src.get(i).map(|t| t.to_string()),
            ('j', Some(i)) => jumps.get(i).map(|l| l.to_string()),
            _ => None,
        };
        match operand {
            Some(operand) => write!(f, "{}", operand)?,
            None => write!(f, "`{}{}", kind, digits)?,
        }
    }
    Ok(())
}

impl Display for Instr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instr::Oper {
                assem, dst, src, ..
            } => format_assem(f, assem, dst, src, self.targets()),
            Instr::Move { assem, dst, src } => format_assem(
                f,
                assem,
                std::slice::from_ref(dst),
                std::slice::from_ref(src),
                &[],
            ),
            Instr::Label { assem, .. } => write!(f, "{}", assem),
        }
    }
}
