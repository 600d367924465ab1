//! Static pages: the home page and the login and register forms.
//!
//! The forms collect input and log the attempt. Nothing is authenticated
//! and no account is created.

use serde::Serialize;
use tracing::info;

use crate::notice::Notice;
use crate::routes::Route;

/// A feature card on the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureCard {
    /// Card title.
    pub title: &'static str,
    /// Card text.
    pub description: &'static str,
}

/// Home page heading.
pub const WELCOME: &str = "Welcome to StudentConnect";

/// Home page tagline.
pub const TAGLINE: &str =
    "Connect with fellow students, collaborate on projects, and grow your network";

/// The home page call to action and where it leads.
pub const GET_STARTED: (&str, Route) = ("Get Started", Route::Register);

/// The three home page feature cards.
pub const FEATURES: [FeatureCard; 3] = [
    FeatureCard {
        title: "Find Peers",
        description: "Connect with students who share your interests and academic goals",
    },
    FeatureCard {
        title: "Course Collaboration",
        description: "Find study partners and collaborate on course projects",
    },
    FeatureCard {
        title: "Project Teams",
        description: "Build your portfolio by working on projects with other students",
    },
];

/// Values of the login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Email address.
    pub email: String,
    /// Password. Never logged.
    pub password: String,
}

impl LoginForm {
    /// Link shown below the sign-in button.
    pub const SIGN_UP_LINK: (&'static str, Route) =
        ("Don't have an account? Sign Up", Route::Register);

    /// Create a form.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Record the attempt.
    pub fn submit(&self) -> Notice {
        info!(email = %self.email, "login attempt");
        Notice::info(format!(
            "Login attempt recorded for {}. Sign-in is not available yet.",
            self.email
        ))
    }
}

/// Values of the register form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Password. Never logged.
    pub password: String,
}

impl RegisterForm {
    /// Create a form.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Record the attempt.
    pub fn submit(&self) -> Notice {
        info!(email = %self.email, "registration attempt");
        Notice::info(format!(
            "Registration recorded for {}. Accounts are not available yet.",
            self.email
        ))
    }
}
