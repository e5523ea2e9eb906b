use std::{
    env, fmt,
    net::{AddrParseError, SocketAddr},
};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REFRESH_INTERVAL_MS: u64 = 2_000;
const DEFAULT_STARTING_BALANCE: f64 = 50_000.0;
const DEFAULT_PRICE_SEED: u64 = 17;

const MIN_REFRESH_INTERVAL_MS: u64 = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub refresh_interval_ms: u64,
    pub starting_balance: f64,
    pub price_seed: u64,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidListenAddr(AddrParseError),
    InvalidRefreshInterval,
    InvalidStartingBalance,
    InvalidPriceSeed,
    NonUnicodeListenAddr,
    NonUnicodeRefreshInterval,
    NonUnicodeStartingBalance,
    NonUnicodePriceSeed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidListenAddr(err) => {
                write!(f, "PANEL_SERVER_ADDR is not a valid socket address: {err}")
            }
            Self::InvalidRefreshInterval => {
                write!(
                    f,
                    "PANEL_REFRESH_INTERVAL_MS must be an integer of at least {MIN_REFRESH_INTERVAL_MS}"
                )
            }
            Self::InvalidStartingBalance => {
                write!(f, "PANEL_STARTING_BALANCE must be a finite positive number")
            }
            Self::InvalidPriceSeed => {
                write!(f, "PANEL_PRICE_SEED must be an unsigned integer")
            }
            Self::NonUnicodeListenAddr => {
                write!(f, "PANEL_SERVER_ADDR contains non-unicode data")
            }
            Self::NonUnicodeRefreshInterval => {
                write!(f, "PANEL_REFRESH_INTERVAL_MS contains non-unicode data")
            }
            Self::NonUnicodeStartingBalance => {
                write!(f, "PANEL_STARTING_BALANCE contains non-unicode data")
            }
            Self::NonUnicodePriceSeed => {
                write!(f, "PANEL_PRICE_SEED contains non-unicode data")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidListenAddr(err) => Some(err),
            _ => None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = match env::var("PANEL_SERVER_ADDR") {
            Ok(value) => value.parse().map_err(ConfigError::InvalidListenAddr)?,
            Err(env::VarError::NotPresent) => DEFAULT_LISTEN_ADDR
                .parse()
                .expect("default listen address must be valid"),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeListenAddr);
            }
        };

        let refresh_interval_ms = match env::var("PANEL_REFRESH_INTERVAL_MS") {
            Ok(value) => {
                let parsed: u64 = value
                    .parse()
                    .map_err(|_| ConfigError::InvalidRefreshInterval)?;
                if parsed < MIN_REFRESH_INTERVAL_MS {
                    return Err(ConfigError::InvalidRefreshInterval);
                }
                parsed
            }
            Err(env::VarError::NotPresent) => DEFAULT_REFRESH_INTERVAL_MS,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeRefreshInterval);
            }
        };

        let starting_balance = match env::var("PANEL_STARTING_BALANCE") {
            Ok(value) => {
                let parsed: f64 = value
                    .parse()
                    .map_err(|_| ConfigError::InvalidStartingBalance)?;
                if !parsed.is_finite() || parsed <= 0.0 {
                    return Err(ConfigError::InvalidStartingBalance);
                }
                parsed
            }
            Err(env::VarError::NotPresent) => DEFAULT_STARTING_BALANCE,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeStartingBalance);
            }
        };

        let price_seed = match env::var("PANEL_PRICE_SEED") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidPriceSeed)?,
            Err(env::VarError::NotPresent) => DEFAULT_PRICE_SEED,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodePriceSeed);
            }
        };

        Ok(Self {
            listen_addr,
            refresh_interval_ms,
            starting_balance,
            price_seed,
        })
    }
}
