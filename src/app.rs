//! The CLI's argument structs and subcommand dispatch, kept in the
//! teacher's `clap::Parser`/`Subcommand` derive style (`app.rs`'s
//! `Cli`/`CliCommands`/`actual`), re-pointed at `count`/`enumerate`/`nth`
//! instead of election subcommands. This binary is a thin demonstration
//! over the library — not part of the tested contract (SPEC_FULL.md §0).

use clap::{AppSettings, ArgEnum, Parser, Subcommand};
use color_eyre::eyre::{bail, Result};
use num_bigint::BigInt;
use tabwriter::TabWriter;
use std::io::Write;

use combinatus::bignum::Count;
use combinatus::config::EngineConfig;
use combinatus::constraint::{Aggregate, Comparison};
use combinatus::family::Family;
use combinatus::request::RequestBuilder;

#[derive(Parser, Debug)]
#[clap(version, about)]
#[clap(global_setting(AppSettings::PropagateVersion))]
pub struct Cli {
    #[clap(subcommand)]
    pub command: CliCommands,
}

#[derive(Subcommand, Debug)]
pub enum CliCommands {
    /// Print the exact cardinality of a request, without enumerating it.
    Count(CliShared),
    /// Print the full (or rank-sliced) enumeration as a tab-separated matrix.
    Enumerate(CliEnumerate),
    /// Print the single row at a 1-based rank.
    Nth(CliNth),
}

/// Options shared by every subcommand: the base sequence and the family
/// it resolves to.
#[derive(Parser, Debug)]
pub struct CliShared {
    /// Base sequence, e.g. `1,2,3,4,5`
    #[clap(long, value_delimiter = ',')]
    pub values: Vec<i64>,

    /// Width of each chosen tuple
    #[clap(short = 'm', long)]
    pub m: usize,

    /// Arrange (permute) rather than choose (combine)
    #[clap(long)]
    pub permutation: bool,

    /// Allow repeated elements
    #[clap(long)]
    pub repetition: bool,

    /// Per-value multiplicities for a multiset request, e.g. `2,1,2`
    #[clap(long, value_delimiter = ',')]
    pub freqs: Option<Vec<u32>>,

    /// Aggregate to constrain (`sum`, `product`, `mean`, `min`, `max`)
    #[clap(long, arg_enum)]
    pub aggregate: Option<CliAggregate>,

    /// Comparison against `--target` (`lt`, `le`, `gt`, `ge`, `eq`, `between`)
    #[clap(long, arg_enum, requires = "aggregate")]
    pub comparison: Option<CliComparison>,

    /// One target for most comparisons, two (low,high) for `between`
    #[clap(long, value_delimiter = ',')]
    pub target: Vec<f64>,
}

#[derive(ArgEnum, Debug, Clone, Copy)]
pub enum CliAggregate {
    Sum,
    Product,
    Mean,
    Min,
    Max,
}

#[derive(ArgEnum, Debug, Clone, Copy)]
pub enum CliComparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Between,
}

#[derive(Parser, Debug)]
pub struct CliEnumerate {
    #[clap(flatten)]
    pub shared: CliShared,

    /// 1-based rank of the first row to emit
    #[clap(long)]
    pub lower: Option<String>,

    /// 1-based rank of the last row to emit
    #[clap(long)]
    pub upper: Option<String>,

    /// Fill the matrix with a `rayon` thread pool
    #[clap(long)]
    pub parallel: bool,

    /// Width of the `rayon` thread pool (implies `--parallel`)
    #[clap(long)]
    pub n_threads: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct CliNth {
    #[clap(flatten)]
    pub shared: CliShared,

    /// 1-based rank to look up
    pub index: String,
}

fn resolve_family(shared: &CliShared) -> Family {
    if let Some(freqs) = &shared.freqs {
        if shared.permutation {
            let total: u32 = freqs.iter().sum();
            if shared.m as u32 == total {
                Family::MultisetPermutationsFull
            } else {
                Family::MultisetPermutationsPartial
            }
        } else {
            Family::MultisetCombinations
        }
    } else if shared.permutation {
        if shared.repetition {
            Family::PermutationsRep
        } else {
            Family::PermutationsNoRep
        }
    } else if shared.repetition {
        Family::CombinationsRep
    } else {
        Family::CombinationsNoRep
    }
}

fn aggregate_and_comparison(shared: &CliShared) -> Result<Option<(Aggregate, Comparison)>> {
    let Some(cli_agg) = shared.aggregate else { return Ok(None) };
    let Some(cli_cmp) = shared.comparison else {
        bail!("--comparison is required alongside --aggregate");
    };
    let aggregate = match cli_agg {
        CliAggregate::Sum => Aggregate::Sum,
        CliAggregate::Product => Aggregate::Product,
        CliAggregate::Mean => Aggregate::Mean,
        CliAggregate::Min => Aggregate::Min,
        CliAggregate::Max => Aggregate::Max,
    };
    let comparison = match cli_cmp {
        CliComparison::Lt => Comparison::Lt(single_target(&shared.target)?),
        CliComparison::Le => Comparison::Le(single_target(&shared.target)?),
        CliComparison::Gt => Comparison::Gt(single_target(&shared.target)?),
        CliComparison::Ge => Comparison::Ge(single_target(&shared.target)?),
        CliComparison::Eq => Comparison::Eq(single_target(&shared.target)?),
        CliComparison::Between => {
            let [lo, hi] = two_targets(&shared.target)?;
            Comparison::Between(lo, hi)
        }
    };
    Ok(Some((aggregate, comparison)))
}

fn single_target(target: &[f64]) -> Result<f64> {
    match target {
        [t] => Ok(*t),
        _ => bail!("this comparison needs exactly one --target value"),
    }
}

fn two_targets(target: &[f64]) -> Result<[f64; 2]> {
    match target {
        [lo, hi] => Ok([*lo, *hi]),
        _ => bail!("`between` needs exactly two --target values"),
    }
}

fn build_request(shared: CliShared, config: &EngineConfig, lower: Option<BigInt>, upper: Option<BigInt>) -> Result<combinatus::request::Request<i64>> {
    let family = resolve_family(&shared);
    let constraint = aggregate_and_comparison(&shared)?;
    let mut builder = RequestBuilder::new(shared.values, family).with_m(shared.m);
    if let Some(freqs) = shared.freqs {
        builder = builder.with_freqs(freqs);
    }
    if let Some((aggregate, comparison)) = constraint {
        builder = builder.with_constraint(aggregate, comparison, config.default_tolerance);
    }
    builder = builder.with_lower_upper(lower, upper);
    Ok(builder.build(config)?)
}

fn print_matrix(rows: &[i64], m: usize) -> Result<()> {
    let mut tw = TabWriter::new(std::io::stdout());
    for row in rows.chunks(m) {
        let line: Vec<String> = row.iter().map(|x| x.to_string()).collect();
        writeln!(tw, "{}", line.join("\t"))?;
    }
    tw.flush()?;
    Ok(())
}

pub fn do_count(args: CliShared) -> Result<()> {
    let config = EngineConfig::default();
    let request = build_request(args, &config, None, None)?;
    let count = combinatus::count_request(&request)?;
    match count {
        Count::Small(f) => println!("{}", f as i64),
        Count::Big(b) => println!("{}", b),
    }
    Ok(())
}

pub fn do_enumerate(args: CliEnumerate) -> Result<()> {
    let config = EngineConfig::default();
    let lower = args.lower.map(|s| s.parse::<BigInt>()).transpose()?;
    let upper = args.upper.map(|s| s.parse::<BigInt>()).transpose()?;
    let m = args.shared.m;
    let mut request = build_request(args.shared, &config, lower, upper)?;
    request.parallel = args.parallel || args.n_threads.is_some();
    request.n_threads = args.n_threads;
    let rows = combinatus::combinatorics(&request, &config)?;
    print_matrix(&rows, m)
}

pub fn do_nth(args: CliNth) -> Result<()> {
    let config = EngineConfig::default();
    let index: BigInt = args.index.parse()?;
    let m = args.shared.m;
    let request = build_request(args.shared, &config, None, None)?;
    let row = combinatus::nth(&request, index)?;
    print_matrix(&row, m)
}

/// Does the top-level command.
pub fn actual(cli: Cli) -> Result<()> {
    match cli.command {
        CliCommands::Count(args) => do_count(args),
        CliCommands::Enumerate(args) => do_enumerate(args),
        CliCommands::Nth(args) => do_nth(args),
    }
}
