pub mod cond;
pub mod directive;
pub mod op;
pub mod reg;

use cond::Cond;
use directive::Directive;
use op::Opcode;
use reg::Reg;

/// A token found in one of the four mnemonic tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    Opcode(Opcode),
    Directive(Directive),
    Reg(Reg),
    Cond(Cond),
}

impl Mnemonic {
    /// Search every table. `None` means the token is in none of them.
    pub fn lookup(s: &str) -> Option<Self> {
        Opcode::parse(s)
            .map(Mnemonic::Opcode)
            .or_else(|| Directive::parse(s).map(Mnemonic::Directive))
            .or_else(|| Reg::parse(s).map(Mnemonic::Reg))
            .or_else(|| Cond::parse(s).map(Mnemonic::Cond))
    }
}

#[test]
fn test() {
    assert_eq!(Mnemonic::lookup("add"), Some(Mnemonic::Opcode(Opcode::ADD)));
    assert_eq!(
        Mnemonic::lookup("Equ"),
        Some(Mnemonic::Directive(Directive::EQU))
    );
    assert_eq!(Mnemonic::lookup("creg"), Some(Mnemonic::Reg(Reg::CREG)));
    assert_eq!(Mnemonic::lookup("GE"), Some(Mnemonic::Cond(Cond::GE)));
    assert_eq!(Mnemonic::lookup("LOOP"), None);
}
