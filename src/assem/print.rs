use std::io;
use std::io::Write;
use super::Instr;

pub fn print_body<W: Write>(body: &[Instr], os: &mut W) -> io::Result<()> {
    let indent = 4;
    for instr in body {
        if !matches!(instr, Instr::Label { .. }) {
            write!(os, "{}", " ".repeat(indent))?;
        }
        writeln!(os, "{}", instr)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temp::{Label, Temp};

    #[test]
    fn labels_are_not_indented() {
        let body = vec![
            Instr::label(Label::named("main")),
            Instr::oper("movl $5, `d0", vec![Temp::named("t1")], vec![]),
        ];
        let mut out = Vec::new();
        print_body(&body, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "main:\n    movl $5, t1\n");
    }
}
