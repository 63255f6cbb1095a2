use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use memory_mosaic::config::{validate_config, Config, ConfigLoader, LoggingConfig};
use memory_mosaic::export;
use memory_mosaic::memory::{
    MemoryAccess, MsvcRttiResolver, RegionPointerValidator, SnapshotMemory, SnapshotRegion,
};
use memory_mosaic::scanner::{AddressSpaceScanner, ScanOptions, TracingProgressSink};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Scan a module image for vtable pointers and recover their RTTI class names
#[derive(Debug, Parser)]
#[command(name = "memory-mosaic", version, about)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Raw module image, overrides `target.dump`
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Module load address in hex, overrides `target.base`
    #[arg(long)]
    base: Option<String>,

    /// Address step in bytes, overrides `scanner.step`
    #[arg(long)]
    step: Option<u32>,

    /// Output directory, overrides `output.directory`
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(dump) = &self.dump {
            config.target.dump = dump.clone();
        }
        if let Some(base) = &self.base {
            config.target.base = base.clone();
        }
        if self.step.is_some() {
            config.scanner.step = self.step;
        }
        if let Some(output) = &self.output {
            config.output.directory = output.clone();
        }
    }
}

/// Console logging plus, when enabled, a per-day log file
fn init_logging(logging: &LoggingConfig) -> Result<Option<PathBuf>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let log_path = logging.log_file_path(Local::now().date_naive());
    let file_layer = match &log_path {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                fs::create_dir_all(dir)
                    .with_context(|| format!("creating log directory {}", dir.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .init();
    Ok(log_path)
}

fn load_snapshot(config: &Config) -> Result<SnapshotMemory> {
    let target = &config.target;
    let mut module = SnapshotRegion::from_file(&target.dump, target.base_address()?)
        .with_context(|| format!("loading module image {}", target.dump.display()))?;
    if let Some(name) = &target.module_name {
        module.name = name.clone();
    }

    let mut memory = SnapshotMemory::with_module(target.architecture, module);
    for region in &target.regions {
        let image = SnapshotRegion::from_file(&region.path, region.base_address()?)
            .with_context(|| format!("loading region image {}", region.path.display()))?;
        memory.add_region(image);
    }
    Ok(memory)
}

fn run(config: &Config) -> Result<bool> {
    let memory = load_snapshot(config)?;
    let validator = RegionPointerValidator::from_snapshot(&memory);
    let resolver = MsvcRttiResolver::new(&memory);

    let module_name = memory
        .module()
        .map(|module| module.name.clone())
        .unwrap_or_default();
    let options = ScanOptions::default()
        .with_step(config.scanner.effective_step(memory.arch()))
        .with_deduplicate(config.scanner.deduplicate)
        .with_module_name(module_name);

    let scanner = AddressSpaceScanner::new(&memory, &validator, &resolver).with_options(options);
    let report = scanner.scan(&mut TracingProgressSink)?;

    let output = &config.output;
    let (addresses_file, class_names_file) = if output.timestamp {
        let now = Local::now().naive_local();
        (
            export::stamped_file_name(&output.addresses_file, now),
            export::stamped_file_name(&output.class_names_file, now),
        )
    } else {
        (output.addresses_file.clone(), output.class_names_file.clone())
    };
    export::write_json(&report, &output.directory, &addresses_file, &class_names_file)?;

    match report.abort_error() {
        None => {
            info!(
                "Found {} pointer slots and {} classes ({} class occurrences), removed {} duplicates",
                report.addresses.len(),
                report.class_names.bucket_count(),
                report.class_names.entry_count(),
                report.removed_duplicates
            );
            Ok(true)
        }
        Some((address, err)) => {
            warn!(
                "Scan terminated early at {} after {}/{} addresses: {}. Results are partial.",
                address, report.visited, report.total, err
            );
            Ok(false)
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let mut config = ConfigLoader::new(&args.config).load_or_default()?;
    args.apply(&mut config);
    validate_config(&config)?;

    let log_path = init_logging(&config.logging)?;
    info!("Starting MemoryMosaic v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = log_path {
        info!(file = %path.display(), "Logging to file");
    }

    let code = match run(&config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            error!("Scan failed: {:#}", err);
            ExitCode::FAILURE
        }
    };

    info!("Shutting down MemoryMosaic");
    Ok(code)
}
