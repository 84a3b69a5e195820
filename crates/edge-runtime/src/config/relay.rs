//! Relay (`speedbump`) configuration.

use clap::Parser;
use shared_net::NetConfig;
use shared_types::{ConfigError, ReplicaSpec};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use super::{positive, ConfigFile};

const DEFAULT_CLINWORKER: i64 = 8;
const DEFAULT_CLIBURST: i64 = 1_000;
const DEFAULT_MAX_CLI_MSG: i64 = 65_536;

/// Command line of the `speedbump` binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "speedbump", version, about = "Forwarding relay in front of one consensus node")]
pub struct RelayArgs {
    /// Relay configuration file: `replica` lists the relays, one per node.
    pub relay_config: PathBuf,

    /// Node configuration file: `replica` lists the consensus nodes.
    pub node_config: PathBuf,

    /// Index of this relay (and of its node) in the replica lists.
    #[arg(short = 'i', long)]
    pub idx: Option<i64>,

    /// Port listening for clients.
    #[arg(short = 'c', long)]
    pub cport: Option<u16>,

    /// Worker threads for client connection I/O.
    #[arg(short = 'M', long)]
    pub clinworker: Option<i64>,

    /// Client messages dispatched per event-loop wakeup.
    #[arg(short = 'B', long)]
    pub cliburst: Option<i64>,

    /// Maximum client message size in bytes.
    #[arg(short = 'S', long = "max-cli-msg")]
    pub max_cli_msg: Option<i64>,
}

/// Validated relay settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub idx: usize,
    /// Where clients connect.
    pub listen: SocketAddr,
    /// Client port of the consensus node this relay fronts.
    pub node: SocketAddr,
    /// Client-facing network.
    pub client_net: NetConfig,
    /// Node-facing network.
    pub node_net: NetConfig,
}

impl RelayConfig {
    /// Load both files named in `args` and apply the overrides.
    pub fn resolve(args: &RelayArgs) -> Result<Self, ConfigError> {
        let relay_file = ConfigFile::load(&args.relay_config)?;
        let node_file = ConfigFile::load(&args.node_config)?;
        Self::from_files(args, &relay_file, &node_file)
    }

    /// Combine parsed files with command-line overrides.
    ///
    /// The relay entry at `idx` provides the client port to listen on unless
    /// `--cport` is given; the node entry at `idx` provides the node's client
    /// address.
    pub fn from_files(
        args: &RelayArgs,
        relay_file: &ConfigFile,
        node_file: &ConfigFile,
    ) -> Result<Self, ConfigError> {
        let raw_idx = args.idx.or(relay_file.idx).unwrap_or(0);

        let relays = relay_file.replicas()?;
        let this_relay = ReplicaSpec::select(&relays, raw_idx)?;
        let idx = usize::try_from(raw_idx).map_err(|_| ConfigError::IndexOutOfRange {
            idx: raw_idx,
            len: relays.len(),
        })?;
        let cport = args
            .cport
            .or(this_relay.client_port)
            .or(relay_file.cport)
            .ok_or(ConfigError::MissingClientPort { idx })?;

        let nodes = node_file.replicas()?;
        let node = ReplicaSpec::select(&nodes, raw_idx)?
            .client_addr()
            .ok_or(ConfigError::MissingClientPort { idx })?;

        let clinworker = positive(
            "clinworker",
            args.clinworker.or(relay_file.clinworker).unwrap_or(DEFAULT_CLINWORKER),
        )?;
        let cliburst = positive(
            "cliburst",
            args.cliburst.or(relay_file.cliburst).unwrap_or(DEFAULT_CLIBURST),
        )?;
        let max_cli_msg = positive(
            "max-cli-msg",
            args.max_cli_msg.or(relay_file.max_cli_msg).unwrap_or(DEFAULT_MAX_CLI_MSG),
        )?;

        Ok(Self {
            idx,
            listen: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), cport),
            node,
            client_net: NetConfig::default()
                .with_max_msg_size(max_cli_msg)
                .with_burst_size(cliburst)
                .with_worker_threads(clinworker),
            node_net: NetConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(idx: Option<i64>) -> RelayArgs {
        RelayArgs {
            relay_config: PathBuf::from("relay.toml"),
            node_config: PathBuf::from("node.toml"),
            idx,
            cport: None,
            clinworker: None,
            cliburst: None,
            max_cli_msg: None,
        }
    }

    fn files() -> (ConfigFile, ConfigFile) {
        let relay = ConfigFile::parse(
            r#"
            replica = ["10.0.0.1:30000;40000", "10.0.0.2:30001;40001"]
            cliburst = 50
            "#,
        )
        .unwrap();
        let node = ConfigFile::parse(
            r#"
            replica = ["10.0.1.1:10000;20000", "10.0.1.2:10001;20001"]
            "#,
        )
        .unwrap();
        (relay, node)
    }

    #[test]
    fn test_defaults_and_selection() {
        let (relay, node) = files();
        let config = RelayConfig::from_files(&args(Some(1)), &relay, &node).unwrap();
        assert_eq!(config.idx, 1);
        assert_eq!(config.listen, "0.0.0.0:40001".parse().unwrap());
        assert_eq!(config.node, "10.0.1.2:20001".parse().unwrap());
        assert_eq!(config.client_net.burst_size, 50);
        assert_eq!(config.client_net.worker_threads, 8);
        assert_eq!(config.client_net.max_msg_size, 65_536);
    }

    #[test]
    fn test_flags_override_file() {
        let (relay, node) = files();
        let mut a = args(None);
        a.cport = Some(5555);
        a.cliburst = Some(7);
        a.max_cli_msg = Some(128);
        let config = RelayConfig::from_files(&a, &relay, &node).unwrap();
        assert_eq!(config.idx, 0);
        assert_eq!(config.listen.port(), 5555);
        assert_eq!(config.client_net.burst_size, 7);
        assert_eq!(config.client_net.max_msg_size, 128);
    }

    #[test]
    fn test_index_out_of_range() {
        let (relay, node) = files();
        assert_eq!(
            RelayConfig::from_files(&args(Some(2)), &relay, &node),
            Err(ConfigError::IndexOutOfRange { idx: 2, len: 2 })
        );
    }

    #[test]
    fn test_node_without_client_port() {
        let (relay, _) = files();
        let node = ConfigFile::parse(r#"replica = ["10.0.1.1:10000"]"#).unwrap();
        assert_eq!(
            RelayConfig::from_files(&args(None), &relay, &node),
            Err(ConfigError::MissingClientPort { idx: 0 })
        );
    }

    #[test]
    fn test_zero_workers_rejected() {
        let (relay, node) = files();
        let mut a = args(None);
        a.clinworker = Some(0);
        assert!(matches!(
            RelayConfig::from_files(&a, &relay, &node),
            Err(ConfigError::InvalidOption { option, .. }) if option == "clinworker"
        ));
    }

    #[test]
    fn test_cli_parsing() {
        let a = RelayArgs::try_parse_from([
            "speedbump", "relay.toml", "node.toml", "--idx", "3", "--max-cli-msg", "4096",
        ])
        .unwrap();
        assert_eq!(a.idx, Some(3));
        assert_eq!(a.max_cli_msg, Some(4096));
        assert_eq!(a.node_config, PathBuf::from("node.toml"));
    }
}
