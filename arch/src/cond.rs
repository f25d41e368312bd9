use num_enum::IntoPrimitive;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Branch condition codes taken by `BC`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
pub enum Cond {
    EQ = 1,
    LT,
    GT,
    LE,
    GE,
    NE,
}

impl Cond {
    pub fn parse(s: &str) -> Option<Self> {
        s.to_ascii_uppercase().parse::<Self>().ok()
    }

    pub fn code(self) -> u8 {
        self.into()
    }
}

#[test]
fn test() {
    assert_eq!(Cond::parse("eq").map(Cond::code), Some(1));
    assert_eq!(Cond::parse("NE").map(Cond::code), Some(6));
    assert_eq!(Cond::parse("ANY"), None);
}
