use color_print::cprintln;

use crate::{literal::LiteralTable, pool::Pool, symbol::SymbolTable, Assembler};

pub fn symbol_table(tab: &SymbolTable) -> String {
    let mut out = String::from("#\tSymbol\tAddress\tValue\tLength\n");
    for (name, sym) in tab.iter() {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            sym.pos, name, sym.addr, sym.value, sym.len
        ));
    }
    out
}

pub fn literal_table(tab: &LiteralTable) -> String {
    let mut out = String::from("#\tLiteral\tAddress\n");
    for lit in tab.iter() {
        out.push_str(&format!("{}\t{}\t{}\n", lit.pos, lit.text, lit.addr));
    }
    out
}

/// Each occurrence is listed with the slot it was given in its own pool.
pub fn pool_table(pools: &[Pool], literals: &LiteralTable) -> String {
    let mut out = String::from("Pool\tStart\tLiterals\n");
    for pool in pools {
        let slots = pool
            .occurrences
            .iter()
            .map(|occ| {
                let text = literals.text(occ.literal).unwrap_or("?");
                format!("{}@{}", text, occ.addr)
            })
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("{}\t{}\t{}\n", pool.num, pool.start, slots));
    }
    out
}

pub fn print_tables(asm: &Assembler) {
    cprintln!("<s>Symbol Table</>");
    print!("{}", symbol_table(asm.symbols()));
    cprintln!("\n<s>Literal Table</>");
    print!("{}", literal_table(asm.literals()));
    cprintln!("\n<s>Pool Table</>");
    print!("{}", pool_table(asm.pools(), asm.literals()));
}

/// Source listing with the record each line produced.
pub fn print_listing(path: &str, lines: &[&str], asm: &Assembler) {
    println!(
        "{}+------[{}]{}",
        "-".repeat(29),
        path,
        "-".repeat(45usize.saturating_sub(path.len()))
    );
    let mut records = asm.listing().iter().peekable();
    for (idx, raw) in lines.iter().enumerate() {
        let line_num = idx + 1;
        let body = match records.next_if(|(line, _)| *line == line_num) {
            Some((_, record)) => {
                let pad = 29usize.saturating_sub(record.to_string().len());
                format!("{}{}", record.cformat(), " ".repeat(pad))
            }
            None => " ".repeat(29),
        };
        println!("{}| {:>4}: {}", body, line_num, raw);
    }
    println!("-----------------------------+-----------------------------------------------------");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_are_pure_reads() {
        let asm = Assembler::assemble("MOVER AREG, ='5'\nLTORG\nADD AREG, ='5'\nEND\n").unwrap();
        let first = (
            symbol_table(asm.symbols()),
            literal_table(asm.literals()),
            pool_table(asm.pools(), asm.literals()),
        );
        let second = (
            symbol_table(asm.symbols()),
            literal_table(asm.literals()),
            pool_table(asm.pools(), asm.literals()),
        );
        assert_eq!(first, second);
        assert_eq!(first.1, "#\tLiteral\tAddress\n1\t='5'\t5\n");
        assert_eq!(
            first.2,
            "Pool\tStart\tLiterals\n1\t4\t='5'@4\n2\t5\t='5'@5\n"
        );
    }

    #[test]
    fn symbol_rows_in_creation_order() {
        let asm = Assembler::assemble("START 100\nREAD N\nN DS 1\nEND\n").unwrap();
        assert_eq!(
            symbol_table(asm.symbols()),
            "#\tSymbol\tAddress\tValue\tLength\n1\tN\t102\t0\t1\n"
        );
    }
}
