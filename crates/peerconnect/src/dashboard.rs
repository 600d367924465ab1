//! The dashboard: summary statistics above a tabbed panel.
//!
//! The statistics are derived from the store's cached profile and request
//! set each time they are asked for; nothing is memoized here.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::connections::{connected_students, ConnectionsView};
use crate::directory::{Directory, StudentRecord};
use crate::discovery::DiscoveryView;
use crate::profile::{split_tags, ProfileManager, UserProfile};
use crate::store::Store;

/// Dashboard header.
pub const HEADER: &str = "PeerConnect";

/// Derived dashboard figures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Number of connected students.
    pub connection_count: usize,
    /// The user's skills, lowercased, that some connection also lists.
    pub skills_matched: Vec<String>,
    /// Distinct project labels across all connections.
    pub project_tags: Vec<String>,
}

impl DashboardStats {
    /// Compute the figures for a profile and its connected students.
    #[must_use]
    pub fn compute(profile: &UserProfile, connected: &[&StudentRecord]) -> Self {
        let connection_skills: HashSet<String> = connected
            .iter()
            .flat_map(|s| s.skills.iter().map(|skill| skill.to_lowercase()))
            .collect();

        let skills_matched = dedup(
            split_tags(&profile.skills)
                .into_iter()
                .map(str::to_lowercase)
                .filter(|skill| connection_skills.contains(skill)),
        );

        let project_tags = dedup(
            connected
                .iter()
                .flat_map(|s| s.projects.iter().map(|p| p.trim().to_string())),
        );

        Self {
            connection_count: connected.len(),
            skills_matched,
            project_tags,
        }
    }
}

/// Keep the first occurrence of each item.
fn dedup(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(item.clone())).collect()
}

/// Dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// The profile manager.
    #[default]
    Profile,
    /// The discovery view.
    Browse,
    /// The connections view.
    Connections,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Tab; 3] = [Tab::Profile, Tab::Browse, Tab::Connections];

    /// Position in the tab bar.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Profile => 0,
            Self::Browse => 1,
            Self::Connections => 2,
        }
    }

    /// The tab at a position, if any.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Tab label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Profile => "My Profile",
            Self::Browse => "Browse Students",
            Self::Connections => "My Connections",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Statistics plus one selected panel.
#[derive(Debug)]
pub struct Dashboard<'a> {
    directory: &'a Directory,
    store: &'a mut Store,
    tab: Tab,
    loading_delay: Duration,
}

impl<'a> Dashboard<'a> {
    /// Open the dashboard on the profile tab.
    pub fn new(directory: &'a Directory, store: &'a mut Store, loading_delay: Duration) -> Self {
        Self {
            directory,
            store,
            tab: Tab::default(),
            loading_delay,
        }
    }

    /// Current figures.
    #[must_use]
    pub fn stats(&self) -> DashboardStats {
        let connected = connected_students(self.directory, self.store);
        DashboardStats::compute(self.store.profile(), &connected)
    }

    /// Selected tab.
    #[must_use]
    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Select a tab.
    pub fn select(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Select a tab by position. Returns `false` if out of range.
    pub fn select_index(&mut self, index: usize) -> bool {
        match Tab::from_index(index) {
            Some(tab) => {
                self.tab = tab;
                true
            }
            None => false,
        }
    }

    /// The profile panel.
    pub fn profile_view(&mut self) -> ProfileManager<'_> {
        ProfileManager::new(self.store)
    }

    /// The browse panel. Each call starts a fresh loading delay.
    pub fn discovery_view(&mut self) -> DiscoveryView<'_> {
        DiscoveryView::new(self.directory, self.store, self.loading_delay)
    }

    /// The connections panel.
    pub fn connections_view(&mut self) -> ConnectionsView<'_> {
        ConnectionsView::new(self.directory, self.store)
    }
}
