use crate::literal::LiteralTable;
use serde::Serialize;

/// One textual appearance of a literal inside a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    /// Literal table position
    pub literal: usize,
    pub addr: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pool {
    pub num: usize,
    pub start: u32,
    pub occurrences: Vec<Occurrence>,
}

impl Pool {
    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}

/// Closed pools plus the accumulator collecting occurrences for the next one.
#[derive(Debug, Default)]
pub struct PoolManager {
    pools: Vec<Pool>,
    current: Vec<usize>,
}

impl PoolManager {
    pub fn new() -> Self {
        PoolManager {
            pools: Vec::new(),
            current: Vec::new(),
        }
    }

    /// Append to the open pool, duplicates included.
    pub fn record_occurrence(&mut self, literal: usize) {
        self.current.push(literal);
    }

    /// Move the accumulator into the pool list under the next number.
    /// An empty accumulator records nothing.
    pub fn close_pool(&mut self) -> Option<usize> {
        if self.current.is_empty() {
            return None;
        }
        let num = self.pools.len() + 1;
        let occurrences = std::mem::take(&mut self.current)
            .into_iter()
            .map(|literal| Occurrence { literal, addr: 0 })
            .collect();
        self.pools.push(Pool {
            num,
            start: 0,
            occurrences,
        });
        Some(num)
    }

    /// Lay every closed pool out contiguously from `counter`, one slot per
    /// occurrence. The literal table keeps whichever slot was written last.
    /// Returns the counter past the final slot, or `None` once it would leave
    /// the address range.
    pub fn assign_addresses(
        &mut self,
        mut counter: u32,
        literals: &mut LiteralTable,
    ) -> Option<u32> {
        for pool in &mut self.pools {
            pool.start = counter;
            for occ in &mut pool.occurrences {
                occ.addr = counter;
                literals.set_addr(occ.literal, counter);
                counter = counter.checked_add(1)?;
            }
        }
        Some(counter)
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    /// Occurrences waiting in the open pool.
    pub fn pending(&self) -> &[usize] {
        &self.current
    }
}
