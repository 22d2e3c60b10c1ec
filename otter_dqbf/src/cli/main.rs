//! A command line interface to the otter_dqbf library.
//!
//! Exit codes follow the incremental-solver convention: 10 for satisfiable,
//! 20 for unsatisfiable, 1 for an error, and 0 for info-only invocations.

use std::{io::BufReader, path::PathBuf, time::Instant};

use clap::{value_parser, Arg, ArgAction, Command};

use otter_dqbf::{
    builder::DqcirParser,
    config::Config,
    context::DqbfContext,
    reports::Report,
};

/// A minimal logger, sending debug-and-below records to stdout as comment lines.
struct StdoutLogger;

impl log::Log for StdoutLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Debug
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            println!("c [{}] {}", record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StdoutLogger = StdoutLogger;

fn cli() -> Command {
    Command::new("otter_dqbf")
        .about("Determines whether a dependency quantified boolean formula is satisfiable or unsatisfiable")
        .arg(
            Arg::new("file")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("The DQCIR file to solve."),
        )
        .arg(
            Arg::new("info")
                .long("info")
                .action(ArgAction::SetTrue)
                .help("Show formula information only."),
        )
        .arg(
            Arg::new("detect_equiv")
                .long("detect-equiv")
                .action(ArgAction::SetTrue)
                .help("Detect equivalent existential variables."),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable detailed logging during solving."),
        )
}

fn main() {
    let matches = cli().get_matches();

    let path = matches
        .get_one::<PathBuf>("file")
        .expect("file is required")
        .clone();
    let show_info = matches.get_flag("info");
    let detect_equiv = matches.get_flag("detect_equiv");
    let verbose = matches.get_flag("verbose");

    if verbose {
        let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(log::LevelFilter::Debug));
    }

    let file = match std::fs::File::open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("ERROR: cannot open {path:?}: {e}");
            std::process::exit(1);
        }
    };

    println!("c Parsing {path:?}");
    let mut parser = DqcirParser::default();
    if let Err(e) = parser.parse(BufReader::new(file)) {
        eprintln!("ERROR: parse failure: {e:?}");
        std::process::exit(1);
    }
    println!(
        "c Parsed {} universal variables, {} existential variables, {} gates",
        parser.universal_count(),
        parser.existential_count(),
        parser.gate_count()
    );

    let parts = match parser.into_parts() {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("ERROR: parse failure: {e:?}");
            std::process::exit(1);
        }
    };
    println!("c Matrix of {} clauses", parts.matrix.len());

    let mut ctx = match DqbfContext::from_parts(parts, Config::default()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };

    if show_info || verbose {
        print!("{}", ctx.formula_info());
    }

    if show_info {
        std::process::exit(0);
    }

    if detect_equiv {
        let classes = ctx.equivalent_existentials();
        println!("c Found {} equivalence classes:", classes.len());
        for (index, class) in classes.iter().enumerate() {
            let names = class
                .iter()
                .map(|atom| ctx.name_of(*atom))
                .collect::<Vec<_>>()
                .join(", ");
            println!("c   Class {index}: {names}");
        }
        std::process::exit(0);
    }

    println!("c Solving");
    let start = Instant::now();

    let report = match ctx.solve() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };

    let elapsed = start.elapsed();

    match report {
        Report::Satisfiable => println!("s SATISFIABLE"),
        Report::Unsatisfiable => println!("s UNSATISFIABLE"),
        Report::Unknown => println!("s UNKNOWN"),
    }

    let statistics = ctx.statistics();
    println!("c Time: {} ms", elapsed.as_millis());
    println!("c Statistics:");
    println!("c   iterations: {}", statistics.iterations);
    println!("c   existential_vars: {}", statistics.existential_count);
    println!("c   universal_vars: {}", statistics.universal_count);
    println!("c   expansion_vars: {}", statistics.expansion_count);

    std::process::exit(report.exit_code());
}
