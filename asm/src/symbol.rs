use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub pos: usize,
    pub addr: u32,
    pub value: i64,
    pub len: u32,
    #[serde(skip)]
    pub defined: bool,
}

/// Identifiers in creation order. Entries are never removed, so the
/// position handed out for a name stays valid for the whole run.
#[derive(Debug, Default)]
pub struct SymbolTable(IndexMap<String, Symbol>);

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable(IndexMap::new())
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.0.get(name)
    }

    /// Define `name`, creating it if absent or patching a previous entry
    /// (a forward reference or an earlier definition) in place.
    pub fn define_or_reference(&mut self, name: &str, addr: u32, value: i64, len: u32) -> usize {
        let next = self.0.len() + 1;
        let entry = self.0.entry(name.to_string()).or_insert(Symbol {
            pos: next,
            addr: 0,
            value: 0,
            len: 0,
            defined: false,
        });
        entry.addr = addr;
        entry.value = value;
        entry.len = len;
        entry.defined = true;
        entry.pos
    }

    /// Position of `name`, creating a forward-reference placeholder when it
    /// has not been seen yet. Existing entries are left untouched.
    pub fn reference(&mut self, name: &str) -> usize {
        let next = self.0.len() + 1;
        self.0
            .entry(name.to_string())
            .or_insert(Symbol {
                pos: next,
                addr: 0,
                value: 0,
                len: 0,
                defined: false,
            })
            .pos
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.0.get(name).is_some_and(|sym| sym.defined)
    }

    /// Names referenced but never defined.
    pub fn undefined(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, sym)| !sym.defined)
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.0.iter().map(|(name, sym)| (name.as_str(), sym))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
