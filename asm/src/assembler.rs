use arch::{directive::Directive, op::Opcode};
use indexmap::IndexMap;

use crate::{
    error::Error,
    literal::LiteralTable,
    msg::Diag,
    parser::{tokenize, Operand, Stmt, Value},
    pool::{Pool, PoolManager},
    record::{Field, Record},
    symbol::SymbolTable,
};

/// State of one translation run: the three tables, the location counter and
/// everything emitted so far.
#[derive(Debug, Default)]
pub struct Assembler {
    symbols: SymbolTable,
    literals: LiteralTable,
    pools: PoolManager,
    lc: u32,
    records: Vec<(usize, Record)>,
    diags: Vec<Diag>,
    // line each symbol was defined on, or first referenced on while undefined
    sites: IndexMap<String, usize>,
    last_line: usize,
    ended: bool,
    trailing: bool,
    finished: bool,
}

impl Assembler {
    pub fn new() -> Self {
        Default::default()
    }

    /// Translate a whole source unit. Stops at the first error.
    pub fn assemble(src: &str) -> Result<Self, Error> {
        let mut asm = Assembler::new();
        for (idx, raw) in src.lines().enumerate() {
            asm.feed(idx + 1, raw)?;
        }
        asm.finish()?;
        Ok(asm)
    }

    /// Process one source line (1-based `line`).
    pub fn feed(&mut self, line: usize, raw: &str) -> Result<(), Error> {
        let tokens = tokenize(raw);
        if tokens.is_empty() {
            return Ok(());
        }
        let stmt = Stmt::classify(line, &tokens)?;
        if self.ended {
            if !self.trailing {
                self.diags
                    .push(Diag::warn(line, "Statements after END are ignored".to_string()));
                self.trailing = true;
            }
            return Ok(());
        }
        self.last_line = line;

        if let Some(extra) = tokens.get(4..).filter(|rest| !rest.is_empty()) {
            self.diags.push(Diag::warn(
                line,
                format!("Extra operands ignored: `{}`", extra.join(" ")),
            ));
        }
        if let (Stmt::OpcodeOnly { label: Some(label), .. }, [_, ignored]) = (&stmt, &tokens[..]) {
            if Opcode::parse(label).is_some() {
                self.diags
                    .push(Diag::warn(line, format!("Operand ignored: `{}`", ignored)));
            }
        }
        self.encode(line, stmt)
    }

    /// Close the run. A source without END gets its final pool closed here.
    pub fn finish(&mut self) -> Result<(), Error> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        if !self.ended {
            if self.last_line > 0 {
                self.diags.push(Diag::warn(
                    self.last_line,
                    "Missing END; literal pool closed at end of input".to_string(),
                ));
            }
            self.flush_pools(self.last_line)?;
            self.ended = true;
        }
        for name in self.symbols.undefined() {
            let line = self.sites.get(name).copied().unwrap_or_default();
            self.diags
                .push(Diag::warn(line, format!("Symbol `{}` is never defined", name)));
        }
        Ok(())
    }

    fn encode(&mut self, line: usize, stmt: Stmt) -> Result<(), Error> {
        let lc = self.lc;
        let boundary = stmt.is_pool_boundary();
        let end = matches!(stmt, Stmt::End);

        self.lc = match stmt {
            Stmt::OpcodeOnly { label, op } => {
                self.define_label(line, label);
                self.emit(line, Record::new(lc, op, vec![]));
                self.step(line, 1)?
            }
            Stmt::Start(base) => {
                self.emit(
                    line,
                    Record::new(base, Directive::START, vec![Field::Const(base.into())]),
                );
                base.checked_add(1).ok_or(Error::CounterOverflow { line })?
            }
            Stmt::Origin(value) => {
                let (field, target) = match value {
                    Value::Num(n) => (Field::Const(n), to_address(line, n)?),
                    Value::Symbol(name) => {
                        let (pos, addr) = self.defined(line, name, Directive::ORIGIN)?;
                        (Field::Symbol(pos), addr)
                    }
                };
                self.emit(line, Record::new(lc, Directive::ORIGIN, vec![field]));
                target
            }
            Stmt::Ltorg => {
                self.emit(line, Record::new(lc, Directive::LTORG, vec![]));
                self.step(line, 1)?
            }
            Stmt::End => self.step(line, 1)?,
            Stmt::Reserve { name, len } => {
                self.define(line, name, lc, 0, len);
                self.emit(
                    line,
                    Record::new(lc, Directive::DS, vec![Field::Const(len.into())]),
                );
                self.step(line, len)?
            }
            Stmt::Declare { name, value } => {
                self.define(line, name, lc, value, 1);
                self.emit(
                    line,
                    Record::new(lc, Directive::DC, vec![Field::Const(value)]),
                );
                self.step(line, 1)?
            }
            Stmt::Equate { name, value } => {
                let field = match value {
                    Value::Num(n) => {
                        self.define(line, name, to_address(line, n)?, 0, 0);
                        Field::Const(n)
                    }
                    Value::Symbol(target) => {
                        let (pos, _) = self.defined(line, target, Directive::EQU)?;
                        let sym = self.symbols.lookup(target).cloned();
                        if let Some(sym) = sym {
                            self.define(line, name, sym.addr, sym.value, sym.len);
                        }
                        Field::Symbol(pos)
                    }
                };
                self.emit(line, Record::new(lc, Directive::EQU, vec![field]));
                self.step(line, 1)?
            }
            Stmt::SymbolOperand { label, op, operand } => {
                self.define_label(line, label);
                let field = self.operand(line, operand);
                self.emit(line, Record::new(lc, op, vec![field]));
                self.step(line, 1)?
            }
            Stmt::RegisterOperand {
                label,
                op,
                index,
                operand,
            } => {
                self.define_label(line, label);
                let field = self.operand(line, operand);
                self.emit(line, Record::new(lc, op, vec![Field::Index(index), field]));
                self.step(line, 1)?
            }
        };

        if boundary {
            self.flush_pools(line)?;
        }
        self.ended = end;
        Ok(())
    }

    /// Close the open pool, then lay all closed pools out from the current
    /// location counter.
    fn flush_pools(&mut self, line: usize) -> Result<(), Error> {
        self.pools.close_pool();
        self.pools
            .assign_addresses(self.lc, &mut self.literals)
            .ok_or(Error::CounterOverflow { line })?;
        Ok(())
    }

    fn step(&self, line: usize, n: u32) -> Result<u32, Error> {
        self.lc
            .checked_add(n)
            .ok_or(Error::CounterOverflow { line })
    }

    fn emit(&mut self, line: usize, record: Record) {
        self.records.push((line, record));
    }

    fn define_label(&mut self, line: usize, label: Option<&str>) {
        if let Some(label) = label {
            self.define(line, label, self.lc, 0, 0);
        }
    }

    fn define(&mut self, line: usize, name: &str, addr: u32, value: i64, len: u32) -> usize {
        if self.symbols.is_defined(name) {
            let prev = self.sites.get(name).copied().unwrap_or_default();
            self.diags
                .push(Diag::warn(line, format!("Re-defined symbol: `{}`", name)));
            self.diags.push(Diag::note(
                prev,
                "Already defined here. The value has been overridden.".to_string(),
            ));
        }
        self.sites.insert(name.to_string(), line);
        self.symbols.define_or_reference(name, addr, value, len)
    }

    /// Position and address of a symbol that must already be defined.
    fn defined(&self, line: usize, name: &str, dir: Directive) -> Result<(usize, u32), Error> {
        match self.symbols.lookup(name) {
            Some(sym) if sym.defined => Ok((sym.pos, sym.addr)),
            _ => Err(Error::malformed(
                line,
                format!("`{dir}` needs `{name}` to be defined first"),
            )),
        }
    }

    fn operand(&mut self, line: usize, operand: Operand) -> Field {
        match operand {
            Operand::Literal(text) => {
                let pos = self.literals.intern(text);
                self.pools.record_occurrence(pos);
                Field::Literal(pos)
            }
            Operand::Symbol(name) => {
                self.sites.entry(name.to_string()).or_insert(line);
                Field::Symbol(self.symbols.reference(name))
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Accessors

impl Assembler {
    pub fn lc(&self) -> u32 {
        self.lc
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn literals(&self) -> &LiteralTable {
        &self.literals
    }

    pub fn pools(&self) -> &[Pool] {
        self.pools.pools()
    }

    /// Literal occurrences not yet in a closed pool.
    pub fn pending(&self) -> &[usize] {
        self.pools.pending()
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().map(|(_, record)| record)
    }

    /// Records paired with the source line that produced them.
    pub fn listing(&self) -> &[(usize, Record)] {
        &self.records
    }

    pub fn diags(&self) -> &[Diag] {
        &self.diags
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Intermediate code, one record per line.
    pub fn intermediate(&self) -> String {
        self.records()
            .map(|record| format!("{}\n", record))
            .collect()
    }
}

fn to_address(line: usize, n: i64) -> Result<u32, Error> {
    u32::try_from(n).map_err(|_| Error::InvalidLiteral {
        line,
        text: n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> Assembler {
        Assembler::assemble(src).unwrap()
    }

    #[test]
    fn start_then_reserve() {
        let asm = run("START 100\nA DS 2\nSTOP\nEND\n");
        let a = asm.symbols().lookup("A").unwrap();
        assert_eq!((a.addr, a.len), (101, 2));
        let lcs: Vec<_> = asm.records().map(|r| r.lc).collect();
        assert_eq!(lcs, vec![100, 101, 103]);
        assert!(asm.pools().is_empty());
        assert_eq!(asm.lc(), 105);
    }

    #[test]
    fn end_emits_nothing_and_stops() {
        let asm = run("STOP\nEND\nSTOP\n");
        assert_eq!(asm.records().count(), 1);
        assert!(asm.is_finished());
        assert!(asm.diags().iter().any(|d| d.line == 3 && d.is_warn()));
    }

    #[test]
    fn missing_end_still_closes_pool() {
        let asm = run("MOVER AREG, ='5'\nSTOP\n");
        assert_eq!(asm.pools().len(), 1);
        assert_eq!(asm.literals().lookup("='5'").map(|l| l.addr), Some(2));
        assert!(asm.diags().iter().any(|d| d.is_warn()));
    }

    #[test]
    fn origin_moves_counter() {
        let asm = run("START 10\nORIGIN 50\nSTOP\nEND\n");
        let lcs: Vec<_> = asm.records().map(|r| r.lc).collect();
        assert_eq!(lcs, vec![10, 11, 50]);
    }

    #[test]
    fn origin_needs_defined_symbol() {
        let err = Assembler::assemble("ORIGIN LATER\nLATER STOP\nEND\n").unwrap_err();
        assert!(matches!(err, Error::Malformed { line: 1, .. }));
    }

    #[test]
    fn equate_copies_symbol() {
        let asm = run("START 20\nONE DC 1\nUNO EQU ONE\nFAR EQU 300\nEND\n");
        let uno = asm.symbols().lookup("UNO").unwrap();
        assert_eq!((uno.addr, uno.value, uno.len), (21, 1, 1));
        assert_eq!(asm.symbols().lookup("FAR").map(|s| s.addr), Some(300));
        let text = asm.intermediate();
        assert!(text.contains("022) (AD, 04) (S, 1)"));
        assert!(text.contains("023) (AD, 04) (C, 300)"));
    }

    #[test]
    fn redefinition_warns_and_overrides() {
        let asm = run("L STOP\nL STOP\nEND\n");
        assert_eq!(asm.symbols().lookup("L").map(|s| s.addr), Some(1));
        assert!(asm
            .diags()
            .iter()
            .any(|d| d.line == 2 && d.is_warn()));
        assert!(asm.diags().iter().any(|d| d.line == 1 && !d.is_warn()));
    }

    #[test]
    fn never_defined_symbol_warns_at_reference() {
        let asm = run("STOP\nREAD GHOST\nEND\n");
        assert!(asm.diags().iter().any(|d| d.line == 2 && d.is_warn()));
        assert_eq!(asm.symbols().lookup("GHOST").map(|s| s.addr), Some(0));
    }

    #[test]
    fn counter_overflow_is_reported() {
        let err = Assembler::assemble("START 4294967295\nSTOP\n").unwrap_err();
        assert!(matches!(err, Error::CounterOverflow { line: 1 }));
    }

    #[test]
    fn pool_slots_past_counter_range_overflow() {
        let src = "START 4294967291\nMOVER AREG, =1\nMOVER BREG, =2\nEND\n";
        let err = Assembler::assemble(src).unwrap_err();
        assert!(matches!(err, Error::CounterOverflow { line: 4 }));

        let src = "START 4294967291\nMOVER AREG, =1\nMOVER BREG, =2\n";
        let err = Assembler::assemble(src).unwrap_err();
        assert!(matches!(err, Error::CounterOverflow { line: 3 }));
    }

    #[test]
    fn statements_after_end_are_still_checked() {
        let err = Assembler::assemble("STOP\nEND\nFROB AREG, X\n").unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownMnemonic { line: 3, ref token } if token == "FROB"
        ));

        let err = Assembler::assemble("END\nPRINT =\n").unwrap_err();
        assert!(matches!(err, Error::InvalidLiteral { line: 2, .. }));

        let asm = run("STOP\nEND\nREAD X\n");
        assert!(asm.symbols().lookup("X").is_none());
        assert_eq!(asm.records().count(), 1);
    }
}
