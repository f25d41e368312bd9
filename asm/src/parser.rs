use arch::{
    cond::Cond,
    directive::Directive,
    op::{Opcode, Operand as OperandKind},
    reg::Reg,
    Mnemonic,
};
use std::num::ParseIntError;

use crate::error::Error;

// ----------------------------------------------------------------------------
// Tokens

/// Split a source line into tokens. `;` outside quotes starts a comment,
/// trailing commas are dropped from every token.
pub fn tokenize(raw: &str) -> Vec<&str> {
    strip_comment(raw)
        .split_whitespace()
        .map(|tok| tok.trim_end_matches(','))
        .filter(|tok| !tok.is_empty())
        .collect()
}

fn strip_comment(raw: &str) -> &str {
    let mut quote = None;
    for (i, c) in raw.char_indices() {
        match (quote, c) {
            (None, ';') => return &raw[..i],
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            _ => {}
        }
    }
    raw
}

// ----------------------------------------------------------------------------
// Statement

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt<'a> {
    /// `STOP`, `LOOP STOP`
    OpcodeOnly { label: Option<&'a str>, op: Opcode },
    /// `START`, `START 100`
    Start(u32),
    /// `ORIGIN 200`, `ORIGIN LOOP`
    Origin(Value<'a>),
    Ltorg,
    End,
    /// `BUF DS 10`
    Reserve { name: &'a str, len: u32 },
    /// `ONE DC '1'`
    Declare { name: &'a str, value: i64 },
    /// `TWO EQU ONE`
    Equate { name: &'a str, value: Value<'a> },
    /// `READ A`, `NEXT PRINT A`
    SymbolOperand {
        label: Option<&'a str>,
        op: Opcode,
        operand: Operand<'a>,
    },
    /// `MOVER AREG, ='5'`, `LOOP BC LT, NEXT`
    RegisterOperand {
        label: Option<&'a str>,
        op: Opcode,
        index: u8,
        operand: Operand<'a>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand<'a> {
    /// Literal text including its `=` sigil
    Literal(&'a str),
    Symbol(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    Num(i64),
    Symbol(&'a str),
}

impl<'a> Stmt<'a> {
    /// Map a tokenized statement to its shape. `tokens` must not be empty;
    /// anything past the fourth token is not looked at.
    pub fn classify(line: usize, tokens: &[&'a str]) -> Result<Stmt<'a>, Error> {
        match *tokens {
            [] => Err(Error::malformed(line, "empty statement")),
            [t0] => Self::one(line, t0),
            [t0, t1] => Self::two(line, t0, t1),
            [t0, t1, t2] => Self::three(line, t0, t1, t2),
            [t0, t1, t2, t3, ..] => Self::four(line, t0, t1, t2, t3),
        }
    }

    fn one(line: usize, t0: &'a str) -> Result<Stmt<'a>, Error> {
        if let Some(op) = Opcode::parse(t0) {
            return match op.operand() {
                OperandKind::None => Ok(Stmt::OpcodeOnly { label: None, op }),
                _ => Err(Error::malformed(line, format!("`{op}` requires operands"))),
            };
        }
        match Directive::parse(t0) {
            Some(Directive::START) => Ok(Stmt::Start(0)),
            Some(Directive::END) => Ok(Stmt::End),
            Some(Directive::LTORG) => Ok(Stmt::Ltorg),
            Some(dir) => Err(Error::malformed(line, format!("`{dir}` requires an operand"))),
            None => Err(unexpected(line, t0)),
        }
    }

    fn two(line: usize, t0: &'a str, t1: &'a str) -> Result<Stmt<'a>, Error> {
        if let Some(op) = Opcode::parse(t0) {
            // Outside the I/O subset the leading token names the statement's own location
            return Ok(match op.is_io() {
                true => Stmt::SymbolOperand {
                    label: None,
                    op,
                    operand: Operand::parse(line, t1)?,
                },
                false => Stmt::OpcodeOnly {
                    label: Some(t0),
                    op,
                },
            });
        }

        let dir = Directive::parse(t0);
        if dir.is_none() {
            if let Some(op) = Opcode::parse(t1) {
                return match op.operand() {
                    OperandKind::None => Ok(Stmt::OpcodeOnly {
                        label: Some(t0),
                        op,
                    }),
                    _ => Err(Error::malformed(line, format!("`{op}` requires operands"))),
                };
            }
        }

        match dir {
            Some(Directive::START) => Ok(Stmt::Start(parse_address(line, t1)?)),
            Some(Directive::ORIGIN) => {
                let value = Value::parse(line, t1)?;
                if let Value::Num(n) = value {
                    to_address(line, t1, n)?;
                }
                Ok(Stmt::Origin(value))
            }
            Some(dir) => Err(Error::malformed(
                line,
                format!("`{dir}` does not take `{t1}` as an operand"),
            )),
            None => Err(unexpected(line, t0)),
        }
    }

    fn three(line: usize, t0: &'a str, t1: &'a str, t2: &'a str) -> Result<Stmt<'a>, Error> {
        match Directive::parse(t1) {
            Some(Directive::DS) => {
                return Ok(Stmt::Reserve {
                    name: t0,
                    len: parse_length(line, t2)?,
                })
            }
            Some(Directive::DC) => {
                return Ok(Stmt::Declare {
                    name: t0,
                    value: parse_constant(line, t2)?,
                })
            }
            Some(Directive::EQU) => {
                return Ok(Stmt::Equate {
                    name: t0,
                    value: Value::parse(line, t2)?,
                })
            }
            Some(dir) => {
                return Err(Error::malformed(
                    line,
                    format!("`{dir}` cannot follow a label"),
                ))
            }
            None => {}
        }

        if let Some(op) = Opcode::parse(t0) {
            if let OperandKind::Register | OperandKind::Condition = op.operand() {
                return Ok(Stmt::RegisterOperand {
                    label: None,
                    op,
                    index: index(line, op, t1)?,
                    operand: Operand::parse(line, t2)?,
                });
            }
        }

        if let (Some(op), None) = (Opcode::parse(t0), Opcode::parse(t1)) {
            return Err(Error::malformed(
                line,
                match op.operand() {
                    OperandKind::None => format!("`{op}` takes no operands"),
                    _ => format!("`{op}` takes one operand"),
                },
            ));
        }

        // `FOO AREG, X` reads as a mistyped opcode rather than a label
        let op = Opcode::parse(t1).ok_or_else(|| match Mnemonic::lookup(t1) {
            Some(_) => unexpected(line, t0),
            None => unexpected(line, t1),
        })?;
        Ok(Stmt::SymbolOperand {
            label: Some(t0),
            op,
            operand: Operand::parse(line, t2)?,
        })
    }

    fn four(
        line: usize,
        t0: &'a str,
        t1: &'a str,
        t2: &'a str,
        t3: &'a str,
    ) -> Result<Stmt<'a>, Error> {
        let op = Opcode::parse(t1).ok_or_else(|| unexpected(line, t1))?;
        match op.operand() {
            OperandKind::Register | OperandKind::Condition => Ok(Stmt::RegisterOperand {
                label: Some(t0),
                op,
                index: index(line, op, t2)?,
                operand: Operand::parse(line, t3)?,
            }),
            _ => Err(Error::malformed(
                line,
                format!("`{op}` does not take a register operand"),
            )),
        }
    }

    pub fn is_pool_boundary(&self) -> bool {
        matches!(self, Stmt::Ltorg | Stmt::End)
    }
}

impl<'a> Operand<'a> {
    fn parse(line: usize, tok: &'a str) -> Result<Operand<'a>, Error> {
        match tok.strip_prefix('=') {
            Some("") => Err(Error::InvalidLiteral {
                line,
                text: tok.to_string(),
            }),
            Some(_) => Ok(Operand::Literal(tok)),
            None => Ok(Operand::Symbol(tok)),
        }
    }
}

impl<'a> Value<'a> {
    fn parse(line: usize, tok: &'a str) -> Result<Value<'a>, Error> {
        if tok.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '\'' | '"')) {
            parse_constant(line, tok).map(Value::Num)
        } else {
            Ok(Value::Symbol(tok))
        }
    }
}

// ----------------------------------------------------------------------------
// Operand helpers

/// Register or condition code index, depending on what `op` takes.
fn index(line: usize, op: Opcode, tok: &str) -> Result<u8, Error> {
    let found = match op.operand() {
        OperandKind::Condition => Cond::parse(tok).map(Cond::code),
        _ => Reg::parse(tok).map(Reg::code),
    };
    found.ok_or_else(|| match Mnemonic::lookup(tok) {
        Some(_) => Error::malformed(line, format!("`{op}` cannot take `{tok}`")),
        None => Error::UnknownMnemonic {
            line,
            token: tok.to_string(),
        },
    })
}

/// A token where a mnemonic was required: misplaced if some table knows it,
/// unknown otherwise.
fn unexpected(line: usize, tok: &str) -> Error {
    match Mnemonic::lookup(tok) {
        Some(_) => Error::malformed(line, format!("unexpected `{tok}`")),
        None => Error::UnknownMnemonic {
            line,
            token: tok.to_string(),
        },
    }
}

fn parse_with_prefix(s: &str) -> Result<i64, ParseIntError> {
    let (neg, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (radix, digits) = match body.get(..2) {
        Some("0b") => (2, &body[2..]),
        Some("0o") => (8, &body[2..]),
        Some("0x") => (16, &body[2..]),
        _ => (10, body),
    };
    let val = i64::from_str_radix(digits, radix)?;
    Ok(if neg { -val } else { val })
}

/// Numeric or quoted constant. A quoted single non-digit character yields
/// its code point.
pub fn parse_constant(line: usize, tok: &str) -> Result<i64, Error> {
    let invalid = || Error::InvalidLiteral {
        line,
        text: tok.to_string(),
    };
    let inner = match tok.chars().next() {
        Some(q @ ('\'' | '"')) => tok
            .strip_prefix(q)
            .and_then(|rest| rest.strip_suffix(q))
            .filter(|inner| !inner.is_empty())
            .ok_or_else(invalid)?,
        _ => return parse_with_prefix(tok).map_err(|_| invalid()),
    };
    if let Ok(val) = parse_with_prefix(inner) {
        return Ok(val);
    }
    let mut chars = inner.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c as i64),
        _ => Err(invalid()),
    }
}

fn to_address(line: usize, tok: &str, val: i64) -> Result<u32, Error> {
    u32::try_from(val).map_err(|_| Error::InvalidLiteral {
        line,
        text: tok.to_string(),
    })
}

fn parse_address(line: usize, tok: &str) -> Result<u32, Error> {
    let val = parse_with_prefix(tok).map_err(|_| Error::InvalidLiteral {
        line,
        text: tok.to_string(),
    })?;
    to_address(line, tok, val)
}

fn parse_length(line: usize, tok: &str) -> Result<u32, Error> {
    match parse_address(line, tok)? {
        0 => Err(Error::InvalidLiteral {
            line,
            text: tok.to_string(),
        }),
        len => Ok(len),
    }
}
