//! The navigation shell: brand title and top-bar links.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// Brand title shown at the left of the top bar.
pub const BRAND: &str = "StudentConnect";

/// Routed pages. The dashboard is not separately routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// `/`
    Home,
    /// `/discover`
    Discover,
    /// `/profile`
    Profile,
    /// `/login`
    Login,
    /// `/register`
    Register,
}

impl Route {
    /// Top-bar links, left to right.
    pub const NAV: [Route; 5] = [
        Route::Home,
        Route::Discover,
        Route::Profile,
        Route::Login,
        Route::Register,
    ];

    /// URL path.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Discover => "/discover",
            Self::Profile => "/profile",
            Self::Login => "/login",
            Self::Register => "/register",
        }
    }

    /// Link text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Discover => "Discover",
            Self::Profile => "Profile",
            Self::Login => "Login",
            Self::Register => "Register",
        }
    }

    /// Resolve a path. A trailing slash is ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Self::NAV.into_iter().find(|r| r.path() == normalized)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_path(s).ok_or_else(|| Error::UnknownRoute(s.to_string()))
    }
}
