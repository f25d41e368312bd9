use num_enum::IntoPrimitive;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[repr(u8)]
pub enum Opcode {
    STOP,
    ADD,
    SUB,
    MULT,
    MOVER,
    MOVEM,
    COMP,
    BC,
    DIV,
    READ,
    PRINT,
}

/// What an opcode expects after its mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    /// Single data symbol (I/O subset)
    Symbol,
    Register,
    Condition,
}

impl Opcode {
    pub fn parse(s: &str) -> Option<Self> {
        s.to_ascii_uppercase().parse::<Self>().ok()
    }

    pub fn code(self) -> u8 {
        self.into()
    }

    pub fn operand(self) -> Operand {
        use Opcode::*;
        match self {
            STOP => Operand::None,
            READ | PRINT => Operand::Symbol,
            BC => Operand::Condition,
            ADD | SUB | MULT | MOVER | MOVEM | COMP | DIV => Operand::Register,
        }
    }

    pub fn is_io(self) -> bool {
        self.operand() == Operand::Symbol
    }
}
