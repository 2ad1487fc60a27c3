use anyhow::{Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use indexmap::IndexMap;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use ltms::cnf::cnf::Cnf;
use ltms::cnf::dimacs::{
    lit_from_dimacs_int, lit_to_dimacs_int, load_cnf, load_premises, to_dimacs,
};
use ltms::cnf::random::{random_cnf, random_premises};
use ltms::report::{ExplainOptions, ExplainReport, ReportMode, explain_cnf};
use ltms::solver::{SatProblem, SatSolver};
use ltms::{Lit, Ltms};

#[derive(Debug, Parser)]
#[command(name = "ltms")]
#[command(about = "Explain why premises contradict a CNF formula")]
struct Cli {
    /// More log output: -v debug, -vv trace.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// List the explanations found for a contradiction.
    Explain {
        path: String,
        #[command(flatten)]
        premises: PremiseArgs,
        #[arg(long)]
        smallest: bool,
        #[arg(long)]
        certify: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print SAT if the premises force no contradiction, UNSAT otherwise.
    Check {
        path: String,
        #[command(flatten)]
        premises: PremiseArgs,
    },
    /// Write a random instance for benchmarking.
    Gen {
        #[arg(long)]
        vars: u32,
        #[arg(long)]
        clauses: usize,
        #[arg(long, default_value_t = 3)]
        width: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        premises: usize,
        #[arg(long)]
        cnf_out: String,
        #[arg(long)]
        premises_out: Option<String>,
    },
}

#[derive(Debug, Args)]
struct PremiseArgs {
    /// Signed DIMACS literal to fix, repeatable.
    #[arg(long = "assume", allow_hyphen_values = true)]
    assume: Vec<i64>,
    /// File of signed literals to fix.
    #[arg(long)]
    premises: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    match cli.command {
        Cmd::Explain {
            path,
            premises,
            smallest,
            certify,
            json,
        } => explain_cmd(&path, &premises, smallest, certify, json)?,
        Cmd::Check { path, premises } => check_cmd(&path, &premises)?,
        Cmd::Gen {
            vars,
            clauses,
            width,
            seed,
            premises,
            cnf_out,
            premises_out,
        } => gen_cmd(
            vars,
            clauses,
            width,
            seed,
            premises,
            &cnf_out,
            premises_out.as_deref(),
        )?,
    }
    Ok(())
}

fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn collect_premises(args: &PremiseArgs) -> Result<IndexMap<u32, bool>> {
    let mut premises = match &args.premises {
        Some(path) => load_premises(path)?,
        None => IndexMap::new(),
    };
    for &value in &args.assume {
        let Some(lit) = lit_from_dimacs_int(value) else {
            bail!("invalid premise literal {}", value);
        };
        premises.insert(lit.var, lit.sign);
    }
    Ok(premises)
}

fn explain_cmd(
    path: &str,
    premise_args: &PremiseArgs,
    smallest: bool,
    certify: bool,
    json: bool,
) -> Result<()> {
    let cnf = load_cnf(path)?;
    let premises = collect_premises(premise_args)?;
    let mode = if smallest {
        ReportMode::Smallest
    } else {
        ReportMode::All
    };
    let report = explain_cnf(&cnf, &premises, &ExplainOptions { mode, certify })?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&cnf, &report);
    }
    Ok(())
}

fn print_report(cnf: &Cnf, report: &ExplainReport) {
    println!(
        "vars={} clauses={} premises={} propagations={} contradictions={}",
        report.vars, report.clauses, report.premises, report.propagations, report.contradictions
    );
    if report.satisfiable {
        println!("SAT: premises force no contradiction");
        return;
    }
    for (i, explanation) in report.explanations.iter().enumerate() {
        let certified = match explanation.certified {
            Some(true) => " certified",
            Some(false) => " NOT-CERTIFIED",
            None => "",
        };
        println!(
            "explanation {}: size={} replays={}{}",
            i,
            explanation.clauses.len(),
            explanation.replays,
            certified
        );
        for &index in &explanation.clauses {
            let Some(clause) = cnf.clauses.get(index) else {
                continue;
            };
            let lits = clause
                .iter()
                .map(|&l| lit_to_dimacs_int(l).to_string())
                .collect::<Vec<_>>()
                .join(" ");
            println!("  c{}: {} 0", index, lits);
        }
    }
}

fn check_cmd(path: &str, premise_args: &PremiseArgs) -> Result<()> {
    let cnf = load_cnf(path)?;
    let mut ltms = Ltms::from_cnf(&cnf);
    ltms.assume_all(collect_premises(premise_args)?);
    let verdict = if ltms.is_satisfiable() { "SAT" } else { "UNSAT" };
    println!("{} ({} assigned)", verdict, ltms.model().len());
    Ok(())
}

fn gen_cmd(
    vars: u32,
    clauses: usize,
    width: usize,
    seed: u64,
    premise_count: usize,
    cnf_out: &str,
    premises_out: Option<&str>,
) -> Result<()> {
    let cnf = random_cnf(vars, clauses, width, seed)?;
    std::fs::write(cnf_out, to_dimacs(&cnf))?;
    if let Some(out) = premises_out {
        let premises = random_premises(vars, premise_count, seed)?;
        let text = premises
            .iter()
            .map(|(&v, &b)| lit_to_dimacs_int(Lit::new(v, b)).to_string())
            .collect::<Vec<_>>()
            .join(" ");
        std::fs::write(out, format!("{} 0\n", text))?;
    }
    println!(
        "GEN: wrote {} | vars={} clauses={} width={} seed={}",
        cnf_out,
        cnf.num_vars,
        cnf.clauses.len(),
        width,
        seed
    );
    Ok(())
}
