use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use ddtw_core::{AlignError, BandConstraint, Ddtw, Dtw, estimate_derivatives};
use ddtw_io::{
    ALIGNED_SIGNALS_TITLE, ALIGNMENT_PATH_TITLE, Dataset, ExperimentName, RAW_SIGNALS_TITLE,
    ResultWriter, SignalReader, plot_aligned_signals, plot_alignment_path, plot_raw_signals,
};

#[derive(Parser)]
#[command(name = "ddtw")]
#[command(about = "Derivative dynamic time warping for one-dimensional signals")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Alignment settings shared by every aligning subcommand.
#[derive(Args, Debug, Clone, Copy)]
struct AlignArgs {
    /// Sakoe-Chiba warping window radius (0 = unconstrained)
    #[arg(long, default_value_t = 0)]
    window: usize,
}

impl AlignArgs {
    fn ddtw(self) -> Ddtw<Dtw> {
        Ddtw::new(Dtw::from_constraint(BandConstraint::from_window(self.window)))
    }
}

/// Signal selection for single-pair subcommands.
#[derive(Args, Debug, Clone)]
struct PairArgs {
    /// Id of the first signal (defaults to the first row)
    #[arg(long)]
    first: Option<String>,

    /// Id of the second signal (defaults to the second row)
    #[arg(long)]
    second: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the estimated derivatives of every signal
    Derivative {
        /// Path to the input CSV file
        #[arg(long)]
        data: PathBuf,
    },

    /// Align two signals in derivative space
    Align {
        /// Path to the input CSV file
        #[arg(long)]
        data: PathBuf,

        #[command(flatten)]
        pair: PairArgs,

        /// Experiment name for output files; no file is written when omitted
        #[arg(long)]
        experiment: Option<String>,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        align: AlignArgs,
    },

    /// Compute the DDTW distance between every pair of signals
    Pairwise {
        /// Path to the input CSV file
        #[arg(long)]
        data: PathBuf,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        align: AlignArgs,
    },

    /// Render raw, path, and aligned figures for two signals
    ///
    /// The path figure is drawn in derivative index space. For the aligned
    /// figure the path is shifted by one sample so that derivative i pairs
    /// with raw sample i + 1, which differs from indexing the raw signals
    /// with the derivative path directly.
    Plot {
        /// Path to the input CSV file
        #[arg(long)]
        data: PathBuf,

        #[command(flatten)]
        pair: PairArgs,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        align: AlignArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct DerivativeOutput<'a> {
    id: &'a str,
    derivatives: &'a [f64],
}

#[derive(Serialize)]
struct AlignOutput<'a> {
    first: &'a str,
    second: &'a str,
    window: usize,
    distance: f64,
    path_len: usize,
    artifact: Option<PathBuf>,
}

#[derive(Serialize)]
struct PairwiseOutput {
    experiment: String,
    n_signals: usize,
    n_pairs: usize,
    window: usize,
    artifact: PathBuf,
}

#[derive(Serialize)]
struct PlotOutput {
    experiment: String,
    first: String,
    second: String,
    figures: Vec<PathBuf>,
}

fn read_dataset(data: &Path) -> Result<Dataset> {
    SignalReader::new(data)
        .read()
        .with_context(|| format!("failed to read input CSV {}", data.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Derivative { data } => {
            let dataset = read_dataset(&data)?;

            let derivatives = dataset
                .ids
                .iter()
                .zip(&dataset.signals)
                .map(|(id, signal)| {
                    estimate_derivatives(signal)
                        .with_context(|| format!("cannot estimate derivatives of \"{id}\""))
                })
                .collect::<Result<Vec<_>>>()?;

            let output: Vec<DerivativeOutput<'_>> = dataset
                .ids
                .iter()
                .zip(&derivatives)
                .map(|(id, d)| DerivativeOutput {
                    id: id.as_str(),
                    derivatives: d.as_slice(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Align {
            data,
            pair,
            experiment,
            output_dir,
            align,
        } => {
            // Validate the name before any work is done.
            let experiment = experiment.map(ExperimentName::new).transpose()?;
            let dataset = read_dataset(&data)?;
            let [(id_1, s1), (id_2, s2)] =
                dataset.pair(pair.first.as_deref(), pair.second.as_deref())?;

            let alignment = align
                .ddtw()
                .align(s1, s2)
                .with_context(|| format!("cannot align \"{id_1}\" with \"{id_2}\""))?;
            info!(
                distance = alignment.distance.value(),
                path_len = alignment.path.len(),
                "alignment complete"
            );

            let artifact = match experiment {
                Some(name) => Some(
                    ResultWriter::new(&output_dir, name)?.write_alignment(id_1, id_2, &alignment)?,
                ),
                None => None,
            };

            let output = AlignOutput {
                first: id_1.as_str(),
                second: id_2.as_str(),
                window: align.window,
                distance: alignment.distance.value(),
                path_len: alignment.path.len(),
                artifact,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Pairwise {
            data,
            experiment,
            output_dir,
            align,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;
            let dataset = read_dataset(&data)?;

            let matrix = align.ddtw().pairwise(&dataset.signals).map_err(|e| {
                let context = match &e {
                    AlignError::BatchSignal { index, .. } => dataset
                        .ids
                        .get(*index)
                        .map_or_else(String::new, |id| format!(" (signal \"{id}\")")),
                    _ => String::new(),
                };
                anyhow::Error::new(e).context(format!("pairwise alignment failed{context}"))
            })?;

            let writer = ResultWriter::new(&output_dir, experiment_name)?;
            let artifact = writer.write_pairwise(&dataset.ids, &matrix)?;

            let output = PairwiseOutput {
                experiment,
                n_signals: matrix.len(),
                n_pairs: matrix.iter().count(),
                window: align.window,
                artifact,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Plot {
            data,
            pair,
            experiment,
            output_dir,
            align,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;
            let dataset = read_dataset(&data)?;
            let [(id_1, s1), (id_2, s2)] =
                dataset.pair(pair.first.as_deref(), pair.second.as_deref())?;

            let alignment = align
                .ddtw()
                .align(s1, s2)
                .with_context(|| format!("cannot align \"{id_1}\" with \"{id_2}\""))?;

            // Derivative index i sits at sample i + 1 of the raw signal.
            let raw_path = alignment.path.shifted(1);
            let aligned = plot_aligned_signals(
                s1.as_slice(),
                s2.as_slice(),
                &raw_path,
                ALIGNED_SIGNALS_TITLE,
            )
            .context("cannot resample signals along the alignment path")?;

            let writer = ResultWriter::new(&output_dir, experiment_name)?;
            let figures = vec![
                writer.write_figure(
                    RAW_SIGNALS_TITLE,
                    &plot_raw_signals(s1.as_slice(), s2.as_slice(), RAW_SIGNALS_TITLE),
                )?,
                writer.write_figure(
                    ALIGNMENT_PATH_TITLE,
                    &plot_alignment_path(&alignment.path, ALIGNMENT_PATH_TITLE),
                )?,
                writer.write_figure(ALIGNED_SIGNALS_TITLE, &aligned)?,
            ];

            let output = PlotOutput {
                experiment,
                first: id_1.to_string(),
                second: id_2.to_string(),
                figures,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn plot_help_describes_path_shift() {
        let cli = Cli::command();
        let plot = cli.find_subcommand("plot").unwrap();
        let help = plot.get_long_about().unwrap().to_string();
        assert!(help.contains("shifted by one"), "unexpected help: {help}");
    }

    #[test]
    fn window_defaults_to_unconstrained() {
        let cli = Cli::try_parse_from(["ddtw", "align", "--data", "x.csv"]).unwrap();
        match cli.command {
            Command::Align { align, .. } => assert_eq!(align.window, 0),
            _ => panic!("expected align subcommand"),
        }
    }
}
