#![forbid(unsafe_code)]

use anyhow::{Result, anyhow};
use lazy_static::lazy_static;
use log::{LevelFilter, error, info};
use serde::Deserialize;
use std::{env, fs, path::Path};
use structopt::StructOpt;
use toml;

use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;

// Menagerie utilities
use crate::utils::errors::Errors;
use crate::utils::web_utils::get_absolute_path;

// ***************************************************************************
//                                Constants
// ***************************************************************************
// Directory and file locations. Unless otherwise noted, all files and directories
// are relative to the root directory.
const ENV_ROOT_DIR          : &str = "MENAGERIE_ROOT_DIR";
const DEFAULT_ROOT_DIR      : &str = "~/.menagerie";
const CONFIG_DIR            : &str = "/config";
const LOGS_DIR              : &str = "/logs";
const LOG4RS_CONFIG_FILE    : &str = "/log4rs.yml";       // relative to config dir
const MENAGERIE_CONFIG_FILE : &str = "/menagerie.toml";   // relative to config dir
const SERVER_LOG_FILE       : &str = "/menagerie.log";    // relative to logs dir

// Logging pattern for the built-in log4rs configuration.
const LOG_PATTERN           : &str = "{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}";

// Networking.
const DEFAULT_HTTP_ADDR     : &str = "127.0.0.1";
const DEFAULT_HTTP_PORT     : u16  = 3000;

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Assign the command line arguments BEFORE RUNTIME_CTX is initialized in main.
lazy_static! {
    pub static ref SERVER_ARGS: ServerArgs = init_server_args();
}

// Calculate the data directories BEFORE RUNTIME_CTX is initialized in main.
lazy_static! {
    pub static ref SERVER_DIRS: ServerDirs = init_server_dirs();
}

// ***************************************************************************
//                             Directory Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// ServerDirs:
// ---------------------------------------------------------------------------
#[derive(Debug, Deserialize)]
pub struct ServerDirs {
    pub root_dir: String,
    pub config_dir: String,
    pub logs_dir: String,
}

// ***************************************************************************
//                               Config Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// CommandLineArgs:
// ---------------------------------------------------------------------------
#[derive(Debug, StructOpt)]
#[structopt(name = "menagerie_args", about = "Command line arguments for the Menagerie server.")]
pub struct ServerArgs {
    /// Specify the server's root data directory.
    ///
    /// This directory contains the configuration and log files the server
    /// uses during execution.
    #[structopt(short, long)]
    pub root_dir: Option<String>,

    /// Create the data directories and then exit.
    ///
    /// The data directories will be rooted at a root directory calculated
    /// using the following priority order:
    ///
    ///   1. If set, the value of the MENAGERIE_ROOT_DIR environment variable,
    ///
    ///   2. Otherwise, if set, the value of the --root-dir command line argument,
    ///
    ///   3. Otherwise, ~/.menagerie
    ///
    #[structopt(short, long)]
    pub create_dirs_only: bool,
}

// ---------------------------------------------------------------------------
// Parms:
// ---------------------------------------------------------------------------
#[derive(Debug)]
pub struct Parms {
    pub config_file: String,
    pub config: Config,
}

// ---------------------------------------------------------------------------
// RuntimeCtx:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct RuntimeCtx {
    pub parms: Parms,
    pub server_args: &'static ServerArgs,
    pub server_dirs: &'static ServerDirs,
}

// ---------------------------------------------------------------------------
// Config:
// ---------------------------------------------------------------------------
#[derive(Debug, Deserialize)]
pub struct Config {
    pub title: String,
    pub http_addr: String,
    pub http_port: u16,
}

impl Config {
    pub fn new() -> Self {
        Config::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Menagerie Server".to_string(),
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            http_port: DEFAULT_HTTP_PORT,
        }
    }
}

// ***************************************************************************
//                            Directory Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_server_args:
// ---------------------------------------------------------------------------
/** Get the command line arguments. */
fn init_server_args() -> ServerArgs {
    let args = ServerArgs::from_args();
    println!("{:?}", args);
    args
}

// ---------------------------------------------------------------------------
// init_server_dirs:
// ---------------------------------------------------------------------------
/** Calculate the external data directories.  Every directory is created if
 * it does not already exist; any failure aborts the server.
 */
fn init_server_dirs() -> ServerDirs {
    // Check that each path is absolute and is a directory if it
    // exists.  If it doesn't exist, create it.
    let root_dir = get_root_dir();
    check_server_dir(&root_dir, "root directory");

    let config_dir = root_dir.clone() + CONFIG_DIR;
    check_server_dir(&config_dir, "config directory");

    let logs_dir = root_dir.clone() + LOGS_DIR;
    check_server_dir(&logs_dir, "logs directory");

    // Package up and return the directories.
    ServerDirs {
        root_dir, config_dir, logs_dir,
    }
}

// ---------------------------------------------------------------------------
// check_server_dir:
// ---------------------------------------------------------------------------
/** Check that the path is absolute and, if it exists, that it is a
 * directory.  If it doesn't exist, create it.
 *
 * Any failure results in a panic.
 */
fn check_server_dir(dir: &String, msgname: &str) {
    // Get the path object.
    let path = Path::new(dir);
    if !path.is_absolute() {
        panic!("The menagerie {} path must be absolute: {}", msgname, dir);
    }
    if path.exists() {
        // Make sure the path represents a directory.
        if !path.is_dir() {
            panic!("The menagerie {} path must be a directory: {}", msgname, dir);
        }
    } else {
        // Create the directory and any missing parents.
        match fs::create_dir_all(path) {
            Ok(_) => (),
            Err(e) => {
                panic!("Make directory error for {:?}: {}", path, &e.to_string());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// get_root_dir:
// ---------------------------------------------------------------------------
fn get_root_dir() -> String {
    // Order of precedence:
    //  1. Environment variable
    //  2. Command line --root-dir argument
    //  3. Default location
    //
    let root_dir = env::var(ENV_ROOT_DIR).unwrap_or_else(
        |_| {
            match SERVER_ARGS.root_dir.clone() {
                Some(r) => r,
                None => DEFAULT_ROOT_DIR.to_string(),
            }
        });

    // Canonicalize the path.
    get_absolute_path(&root_dir)
}

// ***************************************************************************
//                               Log Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_log:
// ---------------------------------------------------------------------------
/** Initialize log4rs logging.  A log4rs.yml file in the config directory
 * takes precedence; without one, a built-in configuration logs to the
 * console and to a file under the logs directory.
 */
pub fn init_log() {
    let logconfig = init_log_config();
    if Path::new(&logconfig).is_file() {
        match log4rs::init_file(logconfig.clone(), Default::default()) {
            Ok(_) => (),
            Err(e) => {
                println!("{}", e);
                let s = format!("{}", Errors::Log4rsInitialization(logconfig));
                panic!("{}", s);
            },
        }
        info!("Log4rs initialized using: {}", logconfig);
    } else {
        match log4rs::init_config(default_log_config()) {
            Ok(_) => (),
            Err(e) => {
                println!("{}", e);
                let s = format!("{}", Errors::Log4rsInitialization(e.to_string()));
                panic!("{}", s);
            },
        }
        info!("Log4rs initialized using the built-in configuration.");
    }
}

// ---------------------------------------------------------------------------
// init_log_config:
// ---------------------------------------------------------------------------
fn init_log_config() -> String {
    SERVER_DIRS.config_dir.clone() + LOG4RS_CONFIG_FILE
}

// ---------------------------------------------------------------------------
// default_log_config:
// ---------------------------------------------------------------------------
/** The configuration used when no log4rs.yml is present: console appender
 * plus a log file in the logs directory, both at Info level.
 */
fn default_log_config() -> LogConfig {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let logfile_path = SERVER_DIRS.logs_dir.clone() + SERVER_LOG_FILE;
    let logfile = match FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(&logfile_path) {
            Ok(f) => f,
            Err(e) => {
                panic!("Unable to open log file {}: {}", logfile_path, &e.to_string());
            },
        };

    let config = LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .build(Root::builder()
            .appender("stdout")
            .appender("logfile")
            .build(LevelFilter::Info));
    match config {
        Ok(c) => c,
        Err(e) => {
            panic!("{}", Errors::Log4rsInitialization(e.to_string()));
        },
    }
}

/// ***************************************************************************
//                             Parms Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_parms:
// ---------------------------------------------------------------------------
/** Retrieve the application parameters from the configuration file in the
 * config data directory.  If the file is missing, built-in defaults are
 * used; if it is present but unparsable, startup fails.
 */
fn get_parms() -> Result<Parms> {
    // Get the config file path from its data directory.
    let config_file = SERVER_DIRS.config_dir.clone() + MENAGERIE_CONFIG_FILE;

    // Read the configuration file.
    let config_file_abs = get_absolute_path(&config_file);
    info!("{}", Errors::ReadingConfigFile(config_file_abs.clone()));
    let contents = match fs::read_to_string(&config_file_abs) {
        Ok(c) => c,
        Err(_) => {
            println!("Unable to read configuration at {}. Using default values.", config_file);
            return Ok(Parms { config_file: Default::default(), config: Config::new() });
        }
    };

    // Parse the toml configuration.
    let config : Config = match toml::from_str(&contents) {
        Ok(c)  => c,
        Err(e) => {
            let msg = format!("{}\n   {}", Errors::TOMLParseError(config_file_abs), e);
            error!("{}", msg);
            return Result::Err(anyhow!(msg));
        }
    };

    Ok(Parms { config_file: config_file_abs, config })
}

// ***************************************************************************
//                             Config Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_runtime_context:
// ---------------------------------------------------------------------------
pub fn init_runtime_context() -> RuntimeCtx {
    // If this fails the application aborts.
    let parms = get_parms().expect("FAILED to read configuration file.");
    RuntimeCtx {parms, server_args: &SERVER_ARGS, server_dirs: &SERVER_DIRS}
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use crate::utils::config::Config;

    #[test]
    fn print_config() {
        println!("{:?}", Config::new());
    }

    #[test]
    fn default_config_values() {
        let config = Config::new();
        assert_eq!(config.title, "Menagerie Server");
        assert_eq!(config.http_addr, "127.0.0.1");
        assert_eq!(config.http_port, 3000);
    }

    #[test]
    fn full_config_parses() {
        let text = r#"
            title = "Test Menagerie"
            http_addr = "0.0.0.0"
            http_port = 8080
        "#;
        let config: Config = toml::from_str(text).expect("toml should parse");
        assert_eq!(config.title, "Test Menagerie");
        assert_eq!(config.http_addr, "0.0.0.0");
        assert_eq!(config.http_port, 8080);
    }

    #[test]
    fn malformed_config_is_rejected() {
        let text = "title = ";
        assert!(toml::from_str::<Config>(text).is_err());
    }

    #[test]
    fn incomplete_config_is_rejected() {
        // All three fields are required when a file is present.
        let text = r#"title = "Only a title""#;
        assert!(toml::from_str::<Config>(text).is_err());
    }
}
