//! Clap derive structures for the `everhome` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// everhome -- control Everhome covers, switches, lights, and sensors
#[derive(Debug, Parser)]
#[command(
    name = "everhome",
    version,
    about = "Control Everhome smart-home devices from the command line",
    long_about = "Lists Everhome cloud devices with normalized state and sends\n\
        commands to covers, switches, and lights.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "EVERHOME_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, env = "EVERHOME_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Access token (overrides profile and keyring)
    #[arg(long, env = "EVERHOME_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "EVERHOME_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept invalid TLS certificates (test servers only)
    #[arg(long, short = 'k', env = "EVERHOME_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "EVERHOME_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Category names accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Cover,
    Switch,
    Light,
    BinarySensor,
}

impl From<CategoryArg> for everhome_core::Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Cover => Self::Cover,
            CategoryArg::Switch => Self::Switch,
            CategoryArg::Light => Self::Light,
            CategoryArg::BinarySensor => Self::BinarySensor,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and inspect devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Open, close, stop, or position covers
    Cover(CoverArgs),

    /// Turn switches on or off
    #[command(alias = "sw")]
    Switch(SwitchArgs),

    /// Turn lights on or off and set brightness
    Light(LightArgs),

    /// Send a raw action to a device
    Action(ActionArgs),

    /// Poll the account and print each new device list
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices with their current state
    #[command(alias = "ls")]
    List {
        /// Only show devices of this category
        #[arg(long, short = 'c')]
        category: Option<CategoryArg>,
    },

    /// Show one device in detail
    Get {
        /// Device ID
        id: String,
    },
}

// ── Covers ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CoverArgs {
    #[command(subcommand)]
    pub command: CoverCommand,
}

#[derive(Debug, Subcommand)]
pub enum CoverCommand {
    /// Open (raise) a cover
    Open { id: String },
    /// Close (lower) a cover
    Close { id: String },
    /// Stop a moving cover
    Stop { id: String },
    /// Move a cover to a position (0 closed, 100 open)
    Position {
        id: String,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        position: u8,
    },
}

// ── Switches ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SwitchArgs {
    #[command(subcommand)]
    pub command: SwitchCommand,
}

#[derive(Debug, Subcommand)]
pub enum SwitchCommand {
    /// Turn a switch on
    On { id: String },
    /// Turn a switch off
    Off { id: String },
}

// ── Lights ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LightArgs {
    #[command(subcommand)]
    pub command: LightCommand,
}

#[derive(Debug, Subcommand)]
pub enum LightCommand {
    /// Turn a light on, optionally at a brightness
    On {
        id: String,
        /// Brightness, 0-255
        #[arg(long, short = 'b')]
        brightness: Option<u8>,
    },
    /// Turn a light off
    Off { id: String },
}

// ── Raw action ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ActionArgs {
    /// Device ID
    pub id: String,

    /// Action name (e.g., up, down, on, off, set_position)
    pub action: String,

    /// Action parameter as key=value; values are parsed as JSON when possible
    #[arg(long = "param", short = 'P', value_name = "KEY=VALUE")]
    pub params: Vec<String>,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll interval in seconds (overrides profile)
    #[arg(long, short = 'i', value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Only poll devices of these categories
    #[arg(long, short = 'c')]
    pub category: Vec<CategoryArg>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the current configuration (tokens masked)
    Show,

    /// Store an access token in the system keyring
    SetToken {
        /// Token to store; prompts when omitted
        token: Option<String>,
    },

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
