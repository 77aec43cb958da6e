use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Feedbot Console — configuration and status dashboard for the feed bot.
#[derive(Parser, Debug, Clone)]
#[command(name = "feedbot-console")]
pub struct CliArgs {
    /// Console HTTP port
    #[arg(long = "port", default_value_t = DEFAULT_CONSOLE_PORT)]
    pub port: u16,

    /// Directory for persisted settings (defaults to the platform data dir)
    #[arg(long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Also write tracing output to this file
    #[arg(short = 'l', long = "log-file")]
    pub log_file: Option<PathBuf>,
}

pub struct ConsoleConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub log_file: Option<PathBuf>,
}

// Port constants
pub const DEFAULT_CONSOLE_PORT: u16 = 9480;

// Log constants
pub const LOG_BUFFER_SIZE: usize = 100;
pub const LOG_BROADCAST_CAPACITY: usize = 256;

// Startup phase dwell times
pub const STARTUP_DWELL_BROWSER_MS: u64 = 2000;
pub const STARTUP_DWELL_NAVIGATE_MS: u64 = 1500;
pub const STARTUP_DWELL_LOGIN_MS: u64 = 3000;
pub const STARTUP_DWELL_POPUP_MS: u64 = 1000;

// Run loop constants
pub const DEFAULT_ITERATIONS: u32 = 10;
pub const DEFAULT_ITERATION_INTERVAL_MS: u64 = 2000;

// Simulated executor constants
pub const SIMULATED_SUCCESS_RATE: f64 = 0.7;

impl ConsoleConfig {
    pub fn from_args(args: CliArgs) -> Self {
        let data_dir = args.data_dir.unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("feedbot-console")
        });

        ConsoleConfig {
            port: args.port,
            data_dir,
            log_file: args.log_file,
        }
    }
}

/// Which feed action a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionMode {
    Like,
    Comment,
}

/// The full bot configuration as edited in the dashboard form.
///
/// The run loop reads only `mode`, `iterations`, and `interval_ms`; the
/// `profile` is handed to the action executor unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub mode: ActionMode,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default)]
    pub profile: AutomationProfile,
}

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_interval_ms() -> u64 {
    DEFAULT_ITERATION_INTERVAL_MS
}

/// Driver, credential, and selector parameters the console never
/// interprets itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationProfile {
    pub driver_path: String,
    pub url: String,
    pub login_url: String,
    pub username: String,
    pub password: String,
    pub scroll_distance: u32,
    pub delay_between_actions_ms: u64,
    pub handle_popup: bool,
    pub selectors: Selectors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selectors {
    pub login_xpath: String,
    pub username_xpath: String,
    pub password_xpath: String,
    pub login_btn_xpath: String,
    pub popup_btn_xpath: String,
    pub like_btn_css: String,
    pub like_btn_xpath: String,
    pub like_btn_classname: String,
    pub comment_classname: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            mode: ActionMode::Like,
            iterations: DEFAULT_ITERATIONS,
            interval_ms: DEFAULT_ITERATION_INTERVAL_MS,
            profile: AutomationProfile::default(),
        }
    }
}

impl Default for AutomationProfile {
    fn default() -> Self {
        AutomationProfile {
            driver_path: "/usr/local/bin/geckodriver".to_string(),
            url: "https://www.bandlab.com/".to_string(),
            login_url: "https://www.bandlab.com/feed".to_string(),
            username: String::new(),
            password: String::new(),
            scroll_distance: 750,
            delay_between_actions_ms: 1000,
            handle_popup: true,
            selectors: Selectors::default(),
        }
    }
}

impl Default for Selectors {
    fn default() -> Self {
        Selectors {
            login_xpath: "/html/body/div[1]/site-top-bar/nav/section[2]/ul/li[4]/a".to_string(),
            username_xpath: "//*[@id=\"username\"]".to_string(),
            password_xpath: "//*[@id=\"password\"]".to_string(),
            login_btn_xpath: "/html/body/main/div/div/div/div/div/section/form/div[4]/button"
                .to_string(),
            popup_btn_xpath: "/html/body/privacy-banner/div/div[2]/button".to_string(),
            like_btn_css: ".row-gap-medium-up-4 > div:nth-child(1) > post-card:nth-child(1) like"
                .to_string(),
            like_btn_xpath:
                "/html/body/main/div/section/div[2]/div[2]/div[3]/div/div[1]/post-card/div/post-tile-social/div/div[1]/span/like"
                    .to_string(),
            like_btn_classname: "button-scd".to_string(),
            comment_classname: "comment-input".to_string(),
        }
    }
}
