//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::dashboard::Tab;
use crate::directory::StudentId;
use crate::profile::UserProfile;

/// Profile commands.
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the saved profile
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Overwrite the saved profile
    Save(ProfileSaveArgs),
}

/// Profile form fields.
#[derive(Debug, Args)]
pub struct ProfileSaveArgs {
    /// Full name
    #[arg(long)]
    pub name: String,

    /// College ID
    #[arg(long)]
    pub college_id: String,

    /// Year of study, e.g. "2nd Year"
    #[arg(long)]
    pub year: String,

    /// Department
    #[arg(long)]
    pub department: String,

    /// Skills and interests, comma-separated
    #[arg(long)]
    pub skills: String,

    /// Project areas, comma-separated
    #[arg(long, default_value = "")]
    pub projects: String,

    /// Profile picture to embed
    #[arg(long, value_name = "FILE")]
    pub picture: Option<PathBuf>,
}

impl ProfileSaveArgs {
    /// The form values as a profile, without the picture.
    #[must_use]
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            name: self.name.clone(),
            college_id: self.college_id.clone(),
            year: self.year.clone(),
            department: self.department.clone(),
            profile_pic: String::new(),
            skills: self.skills.clone(),
            projects: self.projects.clone(),
        }
    }
}

/// Discover command arguments.
#[derive(Debug, Args)]
pub struct DiscoverCommand {
    /// Search by name, skills, or interests
    #[arg(default_value = "")]
    pub query: String,

    /// Only show students from this department
    #[arg(short, long, default_value = "")]
    pub department: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Dashboard command arguments.
#[derive(Debug, Args)]
pub struct DashboardCommand {
    /// Panel shown below the statistics
    #[arg(short, long, value_enum, default_value = "profile")]
    pub tab: TabArg,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Dashboard tab argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TabArg {
    /// My Profile
    Profile,
    /// Browse Students
    Browse,
    /// My Connections
    Connections,
}

impl From<TabArg> for Tab {
    fn from(arg: TabArg) -> Self {
        match arg {
            TabArg::Profile => Self::Profile,
            TabArg::Browse => Self::Browse,
            TabArg::Connections => Self::Connections,
        }
    }
}

/// Parse a student id argument.
///
/// # Errors
///
/// Returns a message if the value is not a non-negative integer.
pub fn parse_student_id(value: &str) -> Result<StudentId, String> {
    value
        .trim()
        .parse::<u32>()
        .map(StudentId)
        .map_err(|e| format!("invalid student id '{value}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_arg_conversion() {
        assert_eq!(Tab::from(TabArg::Profile), Tab::Profile);
        assert_eq!(Tab::from(TabArg::Browse), Tab::Browse);
        assert_eq!(Tab::from(TabArg::Connections), Tab::Connections);
    }

    #[test]
    fn test_parse_student_id() {
        assert_eq!(parse_student_id("4"), Ok(StudentId(4)));
        assert!(parse_student_id("-1").is_err());
        assert!(parse_student_id("bob").is_err());
    }

    #[test]
    fn test_to_profile() {
        let args = ProfileSaveArgs {
            name: "Dana Cruz".to_string(),
            college_id: "CS-1042".to_string(),
            year: "3rd Year".to_string(),
            department: "Computer Science".to_string(),
            skills: "Python, React".to_string(),
            projects: String::new(),
            picture: None,
        };
        let profile = args.to_profile();
        assert_eq!(profile.name, "Dana Cruz");
        assert_eq!(profile.skills, "Python, React");
        assert!(profile.profile_pic.is_empty());
    }
}
