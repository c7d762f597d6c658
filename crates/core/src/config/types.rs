use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("triage.db")
}

/// Doctor roster configuration.
///
/// The seed list is inserted with fixed ids on startup. Doctors that already
/// exist are left alone, so availability changes made at runtime survive a
/// restart.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RosterConfig {
    #[serde(default = "default_true")]
    pub seed_on_startup: bool,
    #[serde(default = "default_seed")]
    pub seed: Vec<SeedDoctor>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            seed_on_startup: true,
            seed: default_seed(),
        }
    }
}

/// A doctor entry in the startup seed.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SeedDoctor {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub on_leave: bool,
}

impl SeedDoctor {
    fn new(id: i64, name: &str, on_leave: bool) -> Self {
        Self {
            id,
            name: name.to_string(),
            on_leave,
        }
    }
}

fn default_seed() -> Vec<SeedDoctor> {
    vec![
        SeedDoctor::new(1, "Dr. Smith", false),
        SeedDoctor::new(2, "Dr. Jane Doe", true),
        SeedDoctor::new(3, "Dr. Emily Carter", false),
        SeedDoctor::new(4, "Dr. Robert Brown", false),
    ]
}

/// Matching pass configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DispatchConfig {
    /// Check engine preconditions (pending patients, available doctors,
    /// unique ids) before each pass.
    #[serde(default = "default_true")]
    pub validate_inputs: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            validate_inputs: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Sanitized config for API responses
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub roster: SanitizedRosterConfig,
    pub dispatch: DispatchConfig,
}

/// Roster config without the full seed list.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedRosterConfig {
    pub seed_on_startup: bool,
    pub seed_count: usize,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            roster: SanitizedRosterConfig {
                seed_on_startup: config.roster.seed_on_startup,
                seed_count: config.roster.seed.len(),
            },
            dispatch: config.dispatch.clone(),
        }
    }
}
