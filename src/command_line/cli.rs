#![allow(clippy::cast_precision_loss)]

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use propsat::sat::cnf::Cnf;
use propsat::sat::dimacs::parse_file;
use propsat::sat::dpll::SatSolver;
use propsat::sat::solver::{Phase, SearchStats, Solution, Solver, SolverConfig, VariableOrder};
use propsat::sat::theory::Theory;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};

#[derive(Parser, Debug)]
#[command(
    name = "propsat",
    version,
    about = "A DPLL SAT solver with watched literals"
)]
pub(crate) struct Cli {
    /// DIMACS file to solve when no subcommand is given.
    pub path: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub common: CommonOptions,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a DIMACS file.
    File {
        #[arg(long)]
        path: PathBuf,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every `.cnf` file below a directory.
    Dir {
        #[arg(long)]
        path: PathBuf,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve clauses given inline, e.g. `"a -b; b c"`.
    Text {
        #[arg(short, long)]
        input: String,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OrderArg {
    #[default]
    Fixed,
    Random,
}

#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check a reported valuation against every clause.
    #[arg(short, long, action = ArgAction::Set, default_value_t = true)]
    pub(crate) verify: bool,

    #[arg(short, long, action = ArgAction::Set, default_value_t = true)]
    pub(crate) stats: bool,

    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,

    #[arg(long, value_enum, default_value_t = OrderArg::Fixed)]
    pub(crate) variable_order: OrderArg,

    /// Seed for `--variable-order random`; drawn at random if absent.
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Value tried first for each decision.
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub(crate) phase: bool,

    /// Give up after this many decisions.
    #[arg(long)]
    pub(crate) max_decisions: Option<usize>,
}

impl Default for CommonOptions {
    fn default() -> Self {
        Self {
            debug: false,
            verify: true,
            stats: true,
            print_solution: false,
            variable_order: OrderArg::Fixed,
            seed: None,
            phase: true,
            max_decisions: None,
        }
    }
}

impl CommonOptions {
    pub(crate) fn config(&self) -> SolverConfig {
        let variable_order = match self.variable_order {
            OrderArg::Fixed => VariableOrder::Fixed,
            OrderArg::Random => {
                let seed = self.seed.unwrap_or_else(|| fastrand::u64(..));
                log::info!("Random variable order with seed {seed}");
                VariableOrder::Random { seed }
            }
        };

        SolverConfig {
            variable_order,
            phase: Phase(self.phase),
        }
    }
}

/// Outcome of one run, `None` when the decision budget ran out.
pub(crate) struct Run {
    pub(crate) solution: Option<Solution>,
    pub(crate) elapsed: Duration,
    pub(crate) stats: SearchStats,
    pub(crate) num_vars: usize,
}

pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if !path.is_dir() {
        return Err(format!("Provided path is not a directory: {}", path.display()));
    }

    for entry in walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }

        if file_path.extension().is_none_or(|ext| ext != "cnf") {
            eprintln!("Skipping non-CNF file: {}", file_path.display());
            continue;
        }

        solve_file(file_path, common)?;
    }

    Ok(())
}

pub(crate) fn solve_file(path: &Path, common: &CommonOptions) -> Result<(), String> {
    let time = Instant::now();
    let cnf = parse_file(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let parse_time = time.elapsed();

    solve_and_report(&cnf, common, Some(path), parse_time)
}

pub(crate) fn solve_text(input: &str, common: &CommonOptions) -> Result<(), String> {
    let time = Instant::now();
    let cnf: Cnf = input.parse().map_err(|e| format!("{e}"))?;
    let parse_time = time.elapsed();

    solve_and_report(&cnf, common, None, parse_time)
}

pub(crate) fn verify_solution(cnf: &Cnf, solution: &Solution) -> Result<(), String> {
    match solution {
        Solution::Satisfiable(valuation) => {
            let ok = cnf.verify(valuation);
            println!("Verified: {ok:?}");
            if ok {
                Ok(())
            } else {
                Err("Solution failed verification!".to_string())
            }
        }
        Solution::Unsatisfiable => {
            println!("UNSAT");
            Ok(())
        }
    }
}

pub(crate) fn solve(cnf: &Cnf, label: Option<&Path>, common: &CommonOptions) -> Run {
    if let Some(name) = label {
        println!("Solving: {}", name.display());
    }

    let theory = Theory::from_cnf(cnf);
    let num_vars = theory.num_vars();
    log::debug!("Variables: {num_vars}, clauses: {}, literals: {}", cnf.len(), cnf.num_literals());

    let time = Instant::now();
    let mut solver = SatSolver::with_config(theory, common.config());
    let solution = match common.max_decisions {
        Some(max) => solver.solve_within(max),
        None => Some(solver.solve()),
    };
    let elapsed = time.elapsed();

    log::debug!("Solution: {solution:?} in {elapsed:?}");

    Run {
        solution,
        elapsed,
        stats: solver.stats(),
        num_vars,
    }
}

/// Allocated and resident memory in MiB, if jemalloc reports them.
fn memory_mib() -> Option<(f64, f64)> {
    epoch::advance().ok()?;
    let allocated = stats::allocated::read().ok()?;
    let resident = stats::resident::read().ok()?;
    Some((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

pub(crate) fn solve_and_report(
    cnf: &Cnf,
    common: &CommonOptions,
    label: Option<&Path>,
    parse_time: Duration,
) -> Result<(), String> {
    let run = solve(cnf, label, common);

    if common.stats {
        print_stats(parse_time, cnf, &run, memory_mib());
    }

    match &run.solution {
        Some(solution) => {
            if common.print_solution {
                if let Solution::Satisfiable(valuation) = solution {
                    println!("Solution: {valuation}");
                }
            }
            println!("\n{solution}");

            if common.verify {
                verify_solution(cnf, solution)?;
            }
        }
        None => println!("\nUNKNOWN (decision limit reached)"),
    }

    Ok(())
}

pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

pub(crate) fn print_stats(parse_time: Duration, cnf: &Cnf, run: &Run, memory: Option<(f64, f64)>) {
    let elapsed_secs = run.elapsed.as_secs_f64();
    let s = &run.stats;

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Variables", run.num_vars);
    stat_line("Clauses", cnf.len());
    stat_line("Literals", cnf.num_literals());

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Propagations", s.propagations, elapsed_secs);
    stat_line_with_rate("Conflicts", s.conflicts, elapsed_secs);
    stat_line_with_rate("Backtracks", s.backtracks, elapsed_secs);
    if let Some((allocated, resident)) = memory {
        stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
        stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    }
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}
