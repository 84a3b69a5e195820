//! Benchmark (`dual-bench`) configuration.

use clap::Parser;
use qe_02_bench_driver::{BenchResult, DriverConfig, IterationBudget};
use shared_types::{ConfigError, ReplicaSpec};
use std::net::SocketAddr;
use std::path::PathBuf;

use super::{positive, ConfigFile};

const DEFAULT_ITER: i64 = 100;
const DEFAULT_MAX_ASYNC: i64 = 10;
const DEFAULT_MAX_CLI_MSG: i64 = 65_536;

/// Command line of the `dual-bench` binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "dual-bench", version, about = "Dual-path order-fairness benchmark client")]
pub struct BenchArgs {
    /// Weak-path configuration: replica list plus benchmark options.
    pub weak_config: PathBuf,

    /// Strong-path configuration: only its replica list is read.
    pub strong_config: PathBuf,

    /// Index of this client in the weak replica list.
    #[arg(short = 'i', long)]
    pub idx: Option<i64>,

    /// Client id stamped on commands (-1: use the index).
    #[arg(long, allow_negative_numbers = true)]
    pub cid: Option<i64>,

    /// Pairs to issue (negative: unlimited).
    #[arg(long, allow_negative_numbers = true)]
    pub iter: Option<i64>,

    /// Maximum pairs in flight.
    #[arg(long = "max-async")]
    pub max_async: Option<i64>,

    /// Maximum message size in bytes.
    #[arg(short = 'S', long = "max-cli-msg")]
    pub max_cli_msg: Option<i64>,

    /// Also write the full report as JSON to this path.
    #[arg(long = "results-json")]
    pub results_json: Option<PathBuf>,
}

/// Validated benchmark settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub idx: usize,
    pub client_id: u32,
    /// Negative means unlimited.
    pub iter: i64,
    pub max_async: usize,
    pub max_msg_size: usize,
    /// Client addresses of the weak path's replicas.
    pub weak: Vec<SocketAddr>,
    /// Client addresses of the strong path's replicas.
    pub strong: Vec<SocketAddr>,
    pub results_json: Option<PathBuf>,
}

impl BenchConfig {
    /// Load both files named in `args` and apply the overrides.
    pub fn resolve(args: &BenchArgs) -> Result<Self, ConfigError> {
        let weak_file = ConfigFile::load(&args.weak_config)?;
        let strong_file = ConfigFile::load(&args.strong_config)?;
        Self::from_files(args, &weak_file, &strong_file)
    }

    /// Combine parsed files with command-line overrides.
    pub fn from_files(
        args: &BenchArgs,
        weak_file: &ConfigFile,
        strong_file: &ConfigFile,
    ) -> Result<Self, ConfigError> {
        let raw_idx = args.idx.or(weak_file.idx).unwrap_or(0);
        let weak_specs = weak_file.replicas()?;
        ReplicaSpec::select(&weak_specs, raw_idx)?;
        let idx = usize::try_from(raw_idx).map_err(|_| ConfigError::IndexOutOfRange {
            idx: raw_idx,
            len: weak_specs.len(),
        })?;

        let client_id = match args.cid.or(weak_file.cid).unwrap_or(-1) {
            -1 => u32::try_from(idx).map_err(|_| ConfigError::InvalidOption {
                option: "cid".into(),
                reason: format!("index {idx} does not fit a client id"),
            })?,
            cid => u32::try_from(cid).map_err(|_| ConfigError::InvalidOption {
                option: "cid".into(),
                reason: format!("must be -1 or a 32-bit client id, got {cid}"),
            })?,
        };

        Ok(Self {
            idx,
            client_id,
            iter: args.iter.or(weak_file.iter).unwrap_or(DEFAULT_ITER),
            max_async: positive(
                "max-async",
                args.max_async.or(weak_file.max_async).unwrap_or(DEFAULT_MAX_ASYNC),
            )?,
            max_msg_size: positive(
                "max-cli-msg",
                args.max_cli_msg.or(weak_file.max_cli_msg).unwrap_or(DEFAULT_MAX_CLI_MSG),
            )?,
            weak: client_addrs(&weak_specs)?,
            strong: client_addrs(&strong_file.replicas()?)?,
            results_json: args.results_json.clone(),
        })
    }

    pub fn driver_config(&self) -> BenchResult<DriverConfig> {
        DriverConfig::new(
            self.client_id,
            self.max_async,
            IterationBudget::from_iter_count(self.iter),
        )
    }
}

fn client_addrs(specs: &[ReplicaSpec]) -> Result<Vec<SocketAddr>, ConfigError> {
    specs
        .iter()
        .enumerate()
        .map(|(idx, spec)| spec.client_addr().ok_or(ConfigError::MissingClientPort { idx }))
        .collect()
}
