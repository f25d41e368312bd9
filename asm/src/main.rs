use color_print::cprintln;
use poolasm::{report, Assembler, Error, TableMap};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

/// Intermediate code always lands here.
const OUTPUT: &str = "temp.i";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Source file
    input: String,

    /// Print every source line next to the record it produced
    #[clap(short, long)]
    verbose: bool,

    /// Also write the final tables to this file as YAML
    #[clap(short, long)]
    map: Option<String>,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("Pool Assembler");

    println!("1. Read Source");
    println!("  < {}", args.input);
    let src = match std::fs::read_to_string(&args.input) {
        Ok(src) => src,
        Err(err) => fail(Error::MissingSource(args.input.clone(), err), &args.input, &[]),
    };
    let lines: Vec<&str> = src.lines().collect();

    println!("2. Assemble");
    let asm = match Assembler::assemble(&src) {
        Ok(asm) => asm,
        Err(err) => fail(err, &args.input, &lines),
    };
    for diag in asm.diags() {
        diag.print(&args.input, &lines);
    }
    println!(
        "  - {} records, {} symbols, {} literals, {} pools",
        asm.records().count(),
        asm.symbols().len(),
        asm.literals().len(),
        asm.pools().len()
    );

    println!("3. Write Output");
    println!("  > {}", OUTPUT);
    if let Err(err) = std::fs::write(OUTPUT, asm.intermediate()) {
        fail(Error::Write(OUTPUT.to_string(), err), &args.input, &lines);
    }
    if let Some(path) = &args.map {
        println!("  > {}", path);
        let written = TableMap::generate(&asm)
            .to_yaml()
            .and_then(|yaml| std::fs::write(path, yaml).map_err(|e| Error::Write(path.clone(), e)));
        if let Err(err) = written {
            fail(err, &args.input, &lines);
        }
    }

    if args.verbose {
        report::print_listing(&args.input, &lines, &asm);
    }
    print!("{}", asm.intermediate());
    println!();
    report::print_tables(&asm);

    cprintln!("\n<g,s>Intermediate code written to</> {}", OUTPUT);
}

fn fail(err: Error, file: &str, lines: &[&str]) -> ! {
    err.print_diag(file, lines);
    std::process::exit(1);
}
