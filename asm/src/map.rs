use indexmap::IndexMap;
use serde::Serialize;

use crate::{error::Error, literal::Literal, symbol::Symbol, Assembler};

/// Final tables in a serializable shape.
#[derive(Debug, Serialize)]
pub struct TableMap<'a> {
    pub symbols: IndexMap<&'a str, &'a Symbol>,
    pub literals: Vec<&'a Literal>,
    pub pools: Vec<PoolEntry<'a>>,
}

#[derive(Debug, Serialize)]
pub struct PoolEntry<'a> {
    pub num: usize,
    pub start: u32,
    pub slots: Vec<SlotEntry<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SlotEntry<'a> {
    pub literal: &'a str,
    pub addr: u32,
}

impl<'a> TableMap<'a> {
    pub fn generate(asm: &'a Assembler) -> Self {
        let pools = asm
            .pools()
            .iter()
            .map(|pool| PoolEntry {
                num: pool.num,
                start: pool.start,
                slots: pool
                    .occurrences
                    .iter()
                    .map(|occ| SlotEntry {
                        literal: asm.literals().text(occ.literal).unwrap_or_default(),
                        addr: occ.addr,
                    })
                    .collect(),
            })
            .collect();

        TableMap {
            symbols: asm.symbols().iter().collect(),
            literals: asm.literals().iter().collect(),
            pools,
        }
    }

    pub fn to_yaml(&self) -> Result<String, Error> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[test]
fn test() {
    let asm = Assembler::assemble("LOOP MOVER BREG, =2\nBC ANY, LOOP\nEND\n");
    assert!(asm.is_err());

    let asm = Assembler::assemble("LOOP MOVER BREG, =2\nBC NE, LOOP\nEND\n").unwrap();
    let map = TableMap::generate(&asm);
    assert_eq!(map.symbols.get("LOOP").map(|s| s.addr), Some(0));
    assert_eq!(map.pools[0].slots[0].literal, "=2");

    let yaml = map.to_yaml().unwrap();
    assert!(yaml.contains("LOOP:"));
    assert!(yaml.contains("=2"));
    assert!(!yaml.contains("defined"));
}
