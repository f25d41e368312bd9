use poolasm::{Assembler, Error};

fn assemble(code: &str) -> Assembler {
    for (idx, line) in code.lines().enumerate() {
        println!("{:>2}: {}", idx + 1, line);
    }
    let asm = Assembler::assemble(code).unwrap();
    print!("{}", asm.intermediate());
    asm
}

#[test]
fn forward_reference_resolves_in_place() {
    let mut asm = Assembler::new();
    asm.feed(1, "START 200").unwrap();
    asm.feed(2, "MOVER AREG, X").unwrap();
    assert_eq!(asm.symbols().lookup("X").map(|s| s.addr), Some(0));
    asm.feed(3, "ADD AREG, X").unwrap();
    assert_eq!(asm.symbols().lookup("X").map(|s| s.addr), Some(0));
    asm.feed(4, "X DC 9").unwrap();
    let x = asm.symbols().lookup("X").unwrap();
    assert_eq!((x.pos, x.addr, x.value, x.len), (1, 203, 9, 1));
    asm.feed(5, "SUB AREG, X").unwrap();
    assert_eq!(asm.symbols().lookup("X").map(|s| s.addr), Some(203));
    assert_eq!(asm.symbols().len(), 1);
}

#[test]
fn identical_literals_share_one_position() {
    let asm = assemble(
        "MOVER AREG, ='5'
         ADD BREG, ='5'
         SUB CREG, ='1'
         LTORG
         MULT DREG, ='5'
         END",
    );
    assert_eq!(asm.literals().len(), 2);
    assert_eq!(asm.literals().lookup("='5'").map(|l| l.pos), Some(1));
    assert!(asm.intermediate().contains("004) (IS, 03) (4) (L, 1)"));
}

#[test]
fn literal_addresses_wait_for_pool_boundary() {
    let mut asm = Assembler::new();
    asm.feed(1, "MOVER AREG, =7").unwrap();
    asm.feed(2, "STOP").unwrap();
    assert_eq!(asm.literals().lookup("=7").map(|l| l.addr), Some(0));
    assert_eq!(asm.pending(), &[1]);
    asm.feed(3, "LTORG").unwrap();
    assert_eq!(asm.literals().lookup("=7").map(|l| l.addr), Some(3));
    assert!(asm.pending().is_empty());
}

#[test]
fn pool_starts_are_contiguous() {
    let asm = assemble(
        "START 10
         MOVER AREG, =1
         MOVER BREG, =2
         MOVER CREG, =1
         LTORG
         ADD AREG, =3
         LTORG
         SUB AREG, =4
         SUB BREG, =5
         END",
    );
    let pools = asm.pools();
    assert_eq!(pools.len(), 3);
    for pair in pools.windows(2) {
        assert_eq!(pair[1].start, pair[0].start + pair[0].len() as u32);
    }
    // END sits at 19, so the layout starts at 20
    assert_eq!(pools[0].start, 20);
    assert_eq!(pools[0].len(), 3);
    let nums: Vec<_> = pools.iter().map(|p| p.num).collect();
    assert_eq!(nums, vec![1, 2, 3]);
}

#[test]
fn empty_pool_is_never_recorded() {
    let asm = assemble(
        "MOVER AREG, =1
         LTORG
         LTORG
         STOP
         END",
    );
    assert_eq!(asm.pools().len(), 1);
}

#[test]
fn duplicate_in_one_pool_advances_twice() {
    let asm = assemble(
        "MOVER AREG, =1
         ADD AREG, =1
         END",
    );
    let slots: Vec<_> = asm.pools()[0].occurrences.iter().map(|o| o.addr).collect();
    assert_eq!(slots, vec![3, 4]);
    assert_eq!(asm.literals().lookup("=1").map(|l| l.addr), Some(4));
}

#[test]
fn literal_reused_across_pools_keeps_last_address() {
    let asm = assemble(
        "MOVER AREG, ='5'
         LTORG
         ADD AREG, ='5'
         STOP
         END",
    );
    let pools = asm.pools();
    assert_eq!(pools.len(), 2);
    assert_eq!(pools[0].occurrences[0].literal, 1);
    assert_eq!(pools[1].occurrences[0].literal, 1);
    // END at 4: pool 1 gets 5, pool 2 gets 6
    assert_eq!(pools[1].occurrences[0].addr, 6);
    assert_eq!(asm.literals().lookup("='5'").map(|l| l.addr), Some(6));
}

#[test]
fn storage_reservation_advances_by_length() {
    let asm = assemble(
        "START 50
         BUF DS 7
         NEXT STOP
         END",
    );
    let buf = asm.symbols().lookup("BUF").unwrap();
    assert_eq!((buf.addr, buf.len, buf.value), (51, 7, 0));
    assert_eq!(asm.symbols().lookup("NEXT").map(|s| s.addr), Some(58));
}

#[test]
fn start_reserve_stop_end() {
    let asm = assemble("START 100\nA DS 2\nSTOP\nEND\n");
    let a = asm.symbols().lookup("A").unwrap();
    assert_eq!((a.addr, a.len), (101, 2));
    let lcs: Vec<_> = asm.records().map(|r| r.lc).collect();
    assert_eq!(lcs, vec![100, 101, 103]);
    assert!(asm.pools().is_empty());
    assert_eq!(
        asm.intermediate(),
        "100) (AD, 01) (C, 100)\n101) (DL, 01) (C, 2)\n103) (IS, 00)\n"
    );
}

#[test]
fn unknown_mnemonic_aborts_at_its_line() {
    let src = "START 100
READ A
FROB AREG, A
A DS 1
END";
    match Assembler::assemble(src) {
        Err(Error::UnknownMnemonic { line, token }) => {
            assert_eq!(line, 3);
            assert_eq!(token, "FROB");
        }
        other => panic!("expected unknown mnemonic, got {:?}", other.map(|_| ())),
    }

    // Statements before the bad line were processed, nothing after it was
    let mut asm = Assembler::new();
    let mut failed = None;
    for (idx, raw) in src.lines().enumerate() {
        if let Err(err) = asm.feed(idx + 1, raw) {
            failed = err.line();
            break;
        }
    }
    assert_eq!(failed, Some(3));
    assert_eq!(asm.records().count(), 2);
    assert_eq!(asm.symbols().lookup("A").map(|s| s.addr), Some(0));
}

#[test]
fn invalid_literal_operand_aborts() {
    let err = Assembler::assemble("START 1\nX DC 'oops'\nEND").unwrap_err();
    assert!(matches!(err, Error::InvalidLiteral { line: 2, ref text } if text == "'oops'"));
    assert_eq!(err.line(), Some(2));
}
