//! Command-line interface for peerconnect.
//!
//! This module provides the CLI structure and command handlers for the
//! `peerconnect` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::directory::StudentId;

pub use commands::{
    parse_student_id, ConfigCommand, DashboardCommand, DiscoverCommand, ProfileCommand,
    ProfileSaveArgs, StatusCommand, TabArg,
};

/// peerconnect - Find peers, build project teams
///
/// Keep a student profile, browse the student directory, and track the
/// connection requests you have sent. Everything is stored locally.
#[derive(Debug, Parser)]
#[command(name = "peerconnect")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the home page
    Home,

    /// Show the navigation links
    Routes,

    /// Show the page at a path such as /discover
    Open {
        /// Route path
        path: String,
    },

    /// Show or save your profile
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Browse and search students
    Discover(DiscoverCommand),

    /// List the departments you can filter by
    Departments,

    /// Send a connection request
    Connect {
        /// Student id
        #[arg(value_parser = parse_student_id)]
        id: StudentId,
    },

    /// List your connections
    Connections {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Remove a connection
    Disconnect {
        /// Student id
        #[arg(value_parser = parse_student_id)]
        id: StudentId,
    },

    /// Show statistics and one dashboard panel
    Dashboard(DashboardCommand),

    /// Submit the login form
    Login {
        /// Email address
        #[arg(long)]
        email: String,

        /// Password
        #[arg(long)]
        password: String,
    },

    /// Submit the registration form
    Register {
        /// Full name
        #[arg(long)]
        name: String,

        /// Email address
        #[arg(long)]
        email: String,

        /// Password
        #[arg(long)]
        password: String,
    },

    /// Show storage and profile status
    Status(StatusCommand),

    /// Erase the saved profile and connections
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
