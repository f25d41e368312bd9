use bimap::BiMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Literal {
    pub pos: usize,
    pub text: String,
    /// 0 until a pool holding this literal is addressed.
    pub addr: u32,
}

/// Literal operands deduplicated by exact text.
#[derive(Debug, Default)]
pub struct LiteralTable {
    entries: Vec<Literal>,
    index: BiMap<String, usize>,
}

impl LiteralTable {
    pub fn new() -> Self {
        LiteralTable {
            entries: Vec::new(),
            index: BiMap::new(),
        }
    }

    pub fn intern(&mut self, text: &str) -> usize {
        if let Some(&pos) = self.index.get_by_left(text) {
            return pos;
        }
        let pos = self.entries.len() + 1;
        self.entries.push(Literal {
            pos,
            text: text.to_string(),
            addr: 0,
        });
        self.index.insert(text.to_string(), pos);
        pos
    }

    pub fn lookup(&self, text: &str) -> Option<&Literal> {
        self.index.get_by_left(text).and_then(|&pos| self.get(pos))
    }

    pub fn get(&self, pos: usize) -> Option<&Literal> {
        pos.checked_sub(1).and_then(|idx| self.entries.get(idx))
    }

    pub fn text(&self, pos: usize) -> Option<&str> {
        self.index.get_by_right(&pos).map(String::as_str)
    }

    pub(crate) fn set_addr(&mut self, pos: usize, addr: u32) {
        if let Some(entry) = pos.checked_sub(1).and_then(|idx| self.entries.get_mut(idx)) {
            entry.addr = addr;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
