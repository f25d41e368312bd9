use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Record class a directive is emitted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Class {
    /// Assembler directive
    AD,
    /// Declarative (storage)
    DL,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
pub enum Directive {
    START,
    END,
    ORIGIN,
    EQU,
    LTORG,
    DS,
    DC,
}

impl Directive {
    pub fn parse(s: &str) -> Option<Self> {
        s.to_ascii_uppercase().parse::<Self>().ok()
    }

    pub fn class(self) -> Class {
        match self {
            Directive::DS | Directive::DC => Class::DL,
            _ => Class::AD,
        }
    }

    /// Code within the directive's class, 1-based.
    pub fn code(self) -> u8 {
        use Directive::*;
        match self {
            START => 1,
            END => 2,
            ORIGIN => 3,
            EQU => 4,
            LTORG => 5,
            DS => 1,
            DC => 2,
        }
    }
}

#[test]
fn test() {
    assert_eq!(Directive::parse("ltorg"), Some(Directive::LTORG));
    assert_eq!(Directive::parse("Ds").map(Directive::class), Some(Class::DL));
    assert_eq!(Directive::START.code(), 1);
    assert_eq!(Directive::DC.code(), 2);
    assert_eq!(Directive::parse("MACRO"), None);
}
