use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Default address for both the client and the server
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:5000";

/// Environment variable overriding the address the server listens on
pub const ADDRESS_VAR: &str = "GRUBDASH_ADDRESS";

/// Environment variable overriding the number of worker threads of the server
pub const WORKERS_VAR: &str = "GRUBDASH_WORKERS";

/// Errors that can occur when parsing the command line arguments
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CLIError {
    #[error("Invalid target format. Should be <host>:<port>")]
    InvalidUrlFormat,

    #[error("Missing parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("Invalid parameter '{0}'")]
    InvalidParameter(String),
}

fn address_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9\.\-]+:\d{1,5}$").expect("valid address pattern"))
}

/// Validate the format of the TCP address provided by the user
///
/// Returns its input if the address is in the format <host>:<port>, otherwise InvalidUrlFormat
pub fn validate_address(url: &str) -> Result<&str, CLIError> {
    if address_pattern().is_match(url) {
        Ok(url)
    } else {
        Err(CLIError::InvalidUrlFormat)
    }
}

/// Settings of the server binary.
///
/// Each setting comes from the command line if given there, else from the environment, else
/// from the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// `<host>:<port>` to listen on
    pub address: String,
    /// Number of threads handling connections
    pub workers: usize,
    /// Whether to start with the bundled dishes and orders
    pub seed: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            address: DEFAULT_ADDRESS.to_string(),
            workers: std::thread::available_parallelism()
                .map(|x| x.into())
                .unwrap_or(4),
            seed: true,
        }
    }
}

fn parse_workers(value: &str) -> Result<usize, CLIError> {
    value
        .parse::<usize>()
        .ok()
        .filter(|workers| *workers > 0)
        .ok_or_else(|| CLIError::InvalidParameter(value.to_string()))
}

impl ServerConfig {
    /// Build the configuration from an environment lookup and the program arguments.
    ///
    /// Usage: `server [<host>:<port>] [--workers N] [--empty]`
    pub fn load<E, I>(env: E, mut args: I) -> Result<Self, CLIError>
    where
        E: Fn(&str) -> Option<String>,
        I: Iterator<Item = String>,
    {
        let mut config = ServerConfig::default();

        if let Some(address) = env(ADDRESS_VAR) {
            config.address = validate_address(&address)?.to_string();
        }
        if let Some(workers) = env(WORKERS_VAR) {
            config.workers = parse_workers(&workers)?;
        }

        args.next(); // Skip the program name
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--empty" => config.seed = false,
                "--workers" => {
                    let workers = args.next().ok_or(CLIError::MissingParameter("workers"))?;
                    config.workers = parse_workers(&workers)?;
                }
                flag if flag.starts_with("--") => {
                    return Err(CLIError::InvalidParameter(flag.to_string()))
                }
                address => config.address = validate_address(address)?.to_string(),
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        std::iter::once("server".to_string())
            .chain(list.iter().map(|s| s.to_string()))
            .collect::<Vec<_>>()
            .into_iter()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_validate_address() {
        assert_eq!(validate_address("127.0.0.1:5000"), Ok("127.0.0.1:5000"));
        assert_eq!(validate_address("localhost:80"), Ok("localhost:80"));
        assert_eq!(validate_address("localhost"), Err(CLIError::InvalidUrlFormat));
        assert_eq!(
            validate_address("http://localhost:80"),
            Err(CLIError::InvalidUrlFormat)
        );
        assert_eq!(
            validate_address("localhost:123456"),
            Err(CLIError::InvalidUrlFormat)
        );
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::load(no_env, args(&[])).unwrap();
        assert_eq!(config.address, DEFAULT_ADDRESS);
        assert!(config.seed);
        assert!(config.workers > 0);
    }

    #[test]
    fn test_arguments() {
        let config =
            ServerConfig::load(no_env, args(&["0.0.0.0:8080", "--workers", "2", "--empty"])).unwrap();
        assert_eq!(config.address, "0.0.0.0:8080");
        assert_eq!(config.workers, 2);
        assert!(!config.seed);
    }

    #[test]
    fn test_arguments_override_environment() {
        let env: HashMap<&str, &str> =
            HashMap::from([(ADDRESS_VAR, "10.0.0.1:9000"), (WORKERS_VAR, "3")]);
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());

        let config = ServerConfig::load(lookup, args(&[])).unwrap();
        assert_eq!(config.address, "10.0.0.1:9000");
        assert_eq!(config.workers, 3);

        let config = ServerConfig::load(lookup, args(&["localhost:1234"])).unwrap();
        assert_eq!(config.address, "localhost:1234");
        assert_eq!(config.workers, 3);
    }

    #[test]
    fn test_invalid_arguments() {
        assert_eq!(
            ServerConfig::load(no_env, args(&["--workers"])),
            Err(CLIError::MissingParameter("workers"))
        );
        assert_eq!(
            ServerConfig::load(no_env, args(&["--workers", "0"])),
            Err(CLIError::InvalidParameter("0".to_string()))
        );
        assert_eq!(
            ServerConfig::load(no_env, args(&["--verbose"])),
            Err(CLIError::InvalidParameter("--verbose".to_string()))
        );
        assert_eq!(
            ServerConfig::load(no_env, args(&["nowhere"])),
            Err(CLIError::InvalidUrlFormat)
        );
    }
}
