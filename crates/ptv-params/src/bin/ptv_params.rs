use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
#[cfg(not(feature = "tracing"))]
use ptv_params::core::level_from_verbosity;
use ptv_params::{Loaded, ParameterManager, ParamsError, PluginRegistry, StrictError};

#[derive(Parser, Debug)]
#[command(name = "ptv-params", version, about = "Convert and check PTV parameter sets")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a legacy parameter directory into a unified YAML file.
    Convert { par_dir: PathBuf, yaml: PathBuf },
    /// Write a unified YAML file out as a legacy parameter directory.
    Export { yaml: PathBuf, par_dir: PathBuf },
    /// Print one section, or the whole document.
    Show {
        yaml: PathBuf,
        section: Option<String>,
    },
    /// Build the native engine configuration and report problems.
    Check {
        yaml: PathBuf,
        /// Experiment directory calibration and image paths are relative to
        /// (defaults to the YAML file's directory).
        #[arg(long)]
        root: Option<PathBuf>,
        /// Fail on warnings too.
        #[arg(long)]
        strict: bool,
    },
    /// List the plugins found in a directory.
    Plugins { dir: PathBuf },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Strict(#[from] StrictError),

    #[error("some files could not be written to {}", .0.display())]
    PartialWrite(PathBuf),
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbose: u8) {
    let _ = ptv_params::core::init_with_level(level_from_verbosity(verbose));
}

#[cfg(feature = "tracing")]
fn init_logging(_verbose: u8) {
    let _ = tracing_log::LogTracer::init();
    ptv_params::core::init_tracing(false);
}

fn print_registry(registry: &PluginRegistry) {
    println!("sequence: {}", registry.available_sequence.join(", "));
    println!("tracking: {}", registry.available_tracking.join(", "));
    println!(
        "selected: sequence={} tracking={}",
        registry.selected_sequence, registry.selected_tracking
    );
}

fn default_root(yaml: &Path) -> PathBuf {
    match yaml.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Convert { par_dir, yaml } => {
            let mut params = ParameterManager::from_directory(&par_dir)?;
            params.to_yaml(&yaml)?;
            println!(
                "{} camera(s), {} warning(s) -> {}",
                params.get_n_cam(),
                params.diagnostics().len(),
                yaml.display()
            );
        }
        Command::Export { yaml, par_dir } => {
            let params = ParameterManager::from_yaml(&yaml)?;
            if !params.to_directory(&par_dir)? {
                return Err(CliError::PartialWrite(par_dir));
            }
            println!("{} camera(s) -> {}", params.get_n_cam(), par_dir.display());
        }
        Command::Show { yaml, section } => {
            let params = ParameterManager::from_yaml(&yaml)?;
            match section {
                Some(name) => print!("{}", serde_yaml::to_string(params.get_parameter(&name)?)?),
                None => {
                    println!("num_cams: {}", params.get_n_cam());
                    print!("{}", serde_yaml::to_string(params.parameters())?);
                }
            }
        }
        Command::Check { yaml, root, strict } => {
            let params = ParameterManager::from_yaml(&yaml)?;
            let root = root.unwrap_or_else(|| default_root(&yaml));
            let mut warnings = params.diagnostics().to_vec();
            warnings.extend(params.check_referenced_files(&root)?);
            // Each warning was already logged when it was raised.
            let native = params.native_config(&root)?.drain_into(&mut warnings);
            println!(
                "ok: {} camera(s), frames {}..={}, {} warning(s)",
                native.control.num_cams,
                native.sequence.first,
                native.sequence.last,
                warnings.len()
            );
            if strict {
                Loaded::with_warnings((), warnings).into_strict()?;
            }
        }
        Command::Plugins { dir } => {
            print_registry(&PluginRegistry::scan(&dir));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
