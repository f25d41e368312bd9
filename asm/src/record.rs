use arch::{directive::Class, directive::Directive, op::Opcode};
use color_print::cformat;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Head {
    IS(u8),
    AD(u8),
    DL(u8),
}

impl From<Opcode> for Head {
    fn from(op: Opcode) -> Self {
        Head::IS(op.code())
    }
}

impl From<Directive> for Head {
    fn from(dir: Directive) -> Self {
        match dir.class() {
            Class::AD => Head::AD(dir.code()),
            Class::DL => Head::DL(dir.code()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Register or condition code
    Index(u8),
    Symbol(usize),
    Literal(usize),
    Const(i64),
}

/// One line of intermediate code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub lc: u32,
    pub head: Head,
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new(lc: u32, head: impl Into<Head>, fields: Vec<Field>) -> Self {
        Record {
            lc,
            head: head.into(),
            fields,
        }
    }

    pub fn cformat(&self) -> String {
        let head = match self.head {
            Head::IS(code) => cformat!("<red>(IS, {:02})</>", code),
            Head::AD(code) => cformat!("<m>(AD, {:02})</>", code),
            Head::DL(code) => cformat!("<c>(DL, {:02})</>", code),
        };
        let fields: String = self
            .fields
            .iter()
            .map(|field| match field {
                Field::Index(idx) => cformat!(" <blue>({})</>", idx),
                Field::Symbol(pos) => cformat!(" <g>(S, {})</>", pos),
                Field::Literal(pos) => cformat!(" <y>(L, {})</>", pos),
                Field::Const(val) => cformat!(" <y>(C, {})</>", val),
            })
            .collect();
        format!("{:03}) {}{}", self.lc, head, fields)
    }
}

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Head::IS(code) => write!(f, "(IS, {:02})", code),
            Head::AD(code) => write!(f, "(AD, {:02})", code),
            Head::DL(code) => write!(f, "(DL, {:02})", code),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Index(idx) => write!(f, "({})", idx),
            Field::Symbol(pos) => write!(f, "(S, {})", pos),
            Field::Literal(pos) => write!(f, "(L, {})", pos),
            Field::Const(val) => write!(f, "(C, {})", val),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}) {}", self.lc, self.head)?;
        for field in &self.fields {
            write!(f, " {}", field)?;
        }
        Ok(())
    }
}

#[test]
fn test() {
    let rec = Record::new(
        7,
        Opcode::MOVER,
        vec![Field::Index(1), Field::Literal(2)],
    );
    assert_eq!(rec.to_string(), "007) (IS, 04) (1) (L, 2)");

    let rec = Record::new(100, Directive::START, vec![Field::Const(100)]);
    assert_eq!(rec.to_string(), "100) (AD, 01) (C, 100)");

    let rec = Record::new(101, Directive::DS, vec![Field::Const(2)]);
    assert_eq!(rec.to_string(), "101) (DL, 01) (C, 2)");
}
