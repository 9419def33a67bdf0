use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for deosil
#[derive(Parser)]
#[command(
    name = "deosil",
    version = env!("CARGO_PKG_VERSION"),
    about = "Clock in and out once a day, track overtime against an 8h day",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Use an alternative configuration file
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use (vim, nano, or custom path)")]
        editor: Option<String>,
    },

    /// Clock in (start today's session)
    In,

    /// Clock out (close the open session)
    Out,

    /// Clock in or out depending on today's state
    Toggle,

    /// Show today's state, times and overtime
    Status,

    /// Change the start/end time of a recorded session
    Edit {
        /// Work date of the session (YYYY-MM-DD)
        date: String,

        #[arg(long = "in", help = "New clock-in time (HH:MM)")]
        start: Option<String>,

        #[arg(
            long = "out",
            help = "New clock-out time (HH:MM); earlier than the clock-in means the next day"
        )]
        end: Option<String>,

        #[arg(
            long = "clear-out",
            conflicts_with = "end",
            help = "Remove the clock-out time (reopens the session)"
        )]
        clear_out: bool,
    },

    /// Monthly table with overtime / undertime totals
    Month {
        /// Month to show (YYYY-MM); defaults to the current month
        #[arg(long, short, value_name = "YYYY-MM")]
        period: Option<String>,

        #[arg(long, help = "Print the month as JSON")]
        json: bool,
    },

    /// Log in to the remote store (email + password)
    Login {
        #[arg(long)]
        email: String,

        /// Password; read from $DEOSIL_PASSWORD or stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored login
    Logout,

    /// Show the current user and remote status
    Whoami,

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
