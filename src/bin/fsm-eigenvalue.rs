//! Parametric modeling of buckling and free vibration in prismatic shell
//! structures, performed by solving the eigenvalue problem in HCFSM.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use fsm_eigenvalue::loader::LoadedData;
use fsm_eigenvalue::prelude::*;
use fsm_eigenvalue::store::{Header, DEFAULT_PAGINATE_BY};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Data file describing the parametric model, see `demos/plate-strip.yaml`
    data_file: PathBuf,

    /// Store results to FILENAME, `<data_file>.jsonl` by default
    #[arg(short, long, value_name = "FILENAME")]
    results_file: Option<PathBuf>,

    /// JSON integral table; simply supported integrals are computed when omitted
    #[arg(long, value_name = "FILENAME")]
    integral_db: Option<PathBuf>,

    /// Number of worker threads, one per CPU by default
    #[arg(short = 'j', long, value_name = "NUM")]
    workers: Option<usize>,

    /// Show progress every NUM grid points
    #[arg(short, long, value_name = "NUM", default_value_t = DEFAULT_PAGINATE_BY)]
    paginate_by: usize,

    /// Govern by the eigenvalue closest to zero instead of the smallest one
    #[arg(long)]
    closest_to_zero: bool,

    /// Be quiet, show only warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Be very verbose, show debug information
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            log::LevelFilter::Warn
        } else if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }

    fn sweep_options(&self) -> SweepOptions {
        let mut options = SweepOptions::default();
        if let Some(workers) = self.workers {
            options = options.with_workers(workers);
        }
        if self.closest_to_zero {
            options = options.with_governing_rule(GoverningRule::ClosestToZero);
        }
        options
    }
}

fn run_sweep<S>(data: LoadedData, source: S, args: &Args, results_file: &Path) -> anyhow::Result<()>
where
    S: IntegralSource + 'static,
{
    let LoadedData {
        model,
        search_space,
        contents,
    } = data;

    let mut writer = ResultsWriter::create(results_file, args.paginate_by)
        .with_context(|| format!("Failed to create results file '{}'", results_file.display()))?;
    writer.write_header(Header::new(&contents, model.dof_count(), &search_space))?;

    let total = search_space.grid_size();
    let results = sweep(&search_space, Arc::new(model), source, &args.sweep_options())?;
    writer.store(results, total)?;
    writer.into_inner()?;

    Ok(())
}

fn run(args: &Args) -> anyhow::Result<()> {
    let results_file = args
        .results_file
        .clone()
        .unwrap_or_else(|| args.data_file.with_extension("jsonl"));

    let data = load_data_file(&args.data_file)
        .with_context(|| format!("Failed to load data file '{}'", args.data_file.display()))?;

    match &args.integral_db {
        Some(path) => run_sweep(data, IntegralDbFile::new(path), args, &results_file),
        None => {
            if data.model.beam_type() != BeamType::SimplySupported {
                bail!(
                    "Beam type {:?} needs an integral table, pass one with --integral-db",
                    data.model.beam_type()
                );
            }
            let table = IntegralTable::simply_supported(data.search_space.m.iter().copied());
            run_sweep(data, Arc::new(table), args, &results_file)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .format_timestamp_secs()
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some((a, t_b, m)) = e.downcast_ref::<FsmError>().and_then(FsmError::grid_point) {
                log::error!("Failed at a={}, t_b={}, m={}", a, t_b, m);
            }
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
