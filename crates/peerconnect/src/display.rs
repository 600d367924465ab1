//! Plain-text rendering of pages, cards and the dashboard.
//!
//! Every function returns the full text without a trailing newline; the
//! binary decides where it goes.

use crate::connections::EMPTY_MESSAGE;
use crate::dashboard::{DashboardStats, Tab, HEADER};
use crate::directory::StudentRecord;
use crate::discovery::DiscoveryCard;
use crate::notice::{Notice, Severity};
use crate::pages::{LoginForm, FEATURES, GET_STARTED, TAGLINE, WELCOME};
use crate::profile::{ProfileMode, UserProfile};
use crate::routes::{Route, BRAND};

const RULE_CHAR: char = '=';

fn heading(title: &str) -> String {
    let rule = RULE_CHAR.to_string().repeat(title.chars().count());
    format!("{title}\n{rule}")
}

fn tags(items: &[&str]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items
            .iter()
            .map(|t| format!("[{t}]"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn owned_tags(items: &[String]) -> String {
    let borrowed: Vec<&str> = items.iter().map(String::as_str).collect();
    tags(&borrowed)
}

/// Tags for a dashboard figure; an empty figure reads `0`.
fn stat_tags(items: &[String]) -> String {
    if items.is_empty() {
        "0".to_string()
    } else {
        owned_tags(items)
    }
}

/// The avatar: "picture" when one is set, otherwise the initial.
fn avatar(name: &str, picture: &str) -> String {
    if picture.is_empty() {
        name.chars()
            .next()
            .map_or_else(|| "( )".to_string(), |c| format!("({c})"))
    } else {
        "(picture)".to_string()
    }
}

/// The top bar.
#[must_use]
pub fn navbar() -> String {
    let links: Vec<String> = Route::NAV
        .iter()
        .map(|r| format!("{} {}", r.label(), r.path()))
        .collect();
    format!("{BRAND} | {}", links.join(" | "))
}

/// The home page.
#[must_use]
pub fn home_page() -> String {
    let mut lines = vec![heading(WELCOME), TAGLINE.to_string()];
    lines.push(format!("  > {} ({})", GET_STARTED.0, GET_STARTED.1.path()));
    for feature in FEATURES {
        lines.push(String::new());
        lines.push(format!("* {}", feature.title));
        lines.push(format!("  {}", feature.description));
    }
    lines.join("\n")
}

/// The login form, with usage for the command that submits it.
#[must_use]
pub fn login_page() -> String {
    let (link, route) = LoginForm::SIGN_UP_LINK;
    [
        heading("Login"),
        "  Email Address".to_string(),
        "  Password".to_string(),
        "Sign in with: peerconnect login --email <EMAIL> --password <PASSWORD>".to_string(),
        format!("{link} ({})", route.path()),
    ]
    .join("\n")
}

/// The register form, with usage for the command that submits it.
#[must_use]
pub fn register_page() -> String {
    [
        heading("Register"),
        "  Full Name".to_string(),
        "  Email Address".to_string(),
        "  Password".to_string(),
        "Sign up with: peerconnect register --name <NAME> --email <EMAIL> --password <PASSWORD>"
            .to_string(),
    ]
    .join("\n")
}

/// A directory record as a card, without an action button.
#[must_use]
pub fn student_card(student: &StudentRecord) -> String {
    [
        format!(
            "{} {}  #{}",
            avatar(&student.name, &student.profile_pic),
            student.name,
            student.id
        ),
        format!("    {} | {}", student.year, student.department),
        format!("    Skills:    {}", owned_tags(&student.skills)),
        format!("    Interests: {}", owned_tags(&student.interests)),
        format!("    Projects:  {}", owned_tags(&student.projects)),
    ]
    .join("\n")
}

/// A discovery card with its Connect or Requested button.
#[must_use]
pub fn discovery_card(card: &DiscoveryCard<'_>) -> String {
    let button = if card.requested { "Requested" } else { "Connect" };
    format!("{}\n    <{button}>", student_card(card.student))
}

/// The discovery list, or a line saying nothing matched.
#[must_use]
pub fn discovery_list(cards: &[DiscoveryCard<'_>]) -> String {
    if cards.is_empty() {
        return "No students match your search.".to_string();
    }
    cards
        .iter()
        .map(discovery_card)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The connections list, or the empty-state message.
#[must_use]
pub fn connections_list(connections: &[&StudentRecord]) -> String {
    if connections.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }
    connections
        .iter()
        .map(|s| format!("{}\n    <Remove>", student_card(s)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The profile view in either mode.
#[must_use]
pub fn profile(profile: &UserProfile, mode: ProfileMode) -> String {
    match mode {
        ProfileMode::Editing => [
            heading("Edit Profile"),
            format!("  Name:       {}", profile.name),
            format!("  College ID: {}", profile.college_id),
            format!("  Year:       {}", profile.year),
            format!("  Department: {}", profile.department),
            format!("  Skills:     {}", profile.skills),
            format!("  Projects:   {}", profile.projects),
            "Save with: peerconnect profile save --name <NAME> ...".to_string(),
        ]
        .join("\n"),
        ProfileMode::Display => [
            heading("My Profile"),
            format!("{} {}", avatar(&profile.name, &profile.profile_pic), profile.name),
            format!("  College ID: {}", profile.college_id),
            format!("  Year:       {}", profile.year),
            format!("  Department: {}", profile.department),
            format!("  Skills:     {}", tags(&profile.skill_tags())),
            format!("  Projects:   {}", tags(&profile.project_tags())),
        ]
        .join("\n"),
    }
}

/// The dashboard figures.
#[must_use]
pub fn stats(stats: &DashboardStats) -> String {
    [
        format!("  Connections:    {}", stats.connection_count),
        format!("  Skills matched: {}", stat_tags(&stats.skills_matched)),
        format!("  Project tags:   {}", stat_tags(&stats.project_tags)),
    ]
    .join("\n")
}

/// The dashboard tab bar with the selected tab marked.
#[must_use]
pub fn tab_bar(selected: Tab) -> String {
    Tab::ALL
        .iter()
        .map(|&tab| {
            if tab == selected {
                format!("[{tab}]")
            } else {
                format!(" {tab} ")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Dashboard header, figures and tab bar, above the selected panel.
#[must_use]
pub fn dashboard(figures: &DashboardStats, selected: Tab, panel: &str) -> String {
    [
        heading(HEADER),
        stats(figures),
        String::new(),
        tab_bar(selected),
        String::new(),
        panel.to_string(),
    ]
    .join("\n")
}

/// A notice with its severity marker.
#[must_use]
pub fn notice(notice: &Notice) -> String {
    let marker = match notice.severity {
        Severity::Success => "ok",
        Severity::Info => "info",
        Severity::Error => "error",
    };
    format!("[{marker}] {}", notice.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{Directory, StudentId};

    #[test]
    fn test_navbar() {
        assert_eq!(
            navbar(),
            "StudentConnect | Home / | Discover /discover | Profile /profile | \
             Login /login | Register /register"
        );
    }

    #[test]
    fn test_home_page() {
        let page = home_page();
        assert!(page.starts_with("Welcome to StudentConnect\n========================="));
        assert!(page.contains(TAGLINE));
        assert!(page.contains("* Course Collaboration"));
    }

    #[test]
    fn test_student_card() {
        let directory = Directory::canonical();
        let card = student_card(directory.get(StudentId(3)).unwrap());

        assert!(card.starts_with("(C) Carol White  #3"));
        assert!(card.contains("1st Year | Mechanical"));
        assert!(card.contains("Skills:    [CAD] [Matlab]"));
    }

    #[test]
    fn test_discovery_card_button() {
        let directory = Directory::canonical();
        let student = directory.get(StudentId(1)).unwrap();

        let sent = discovery_card(&DiscoveryCard {
            student,
            requested: true,
        });
        assert!(sent.ends_with("<Requested>"));
        let fresh = discovery_card(&DiscoveryCard {
            student,
            requested: false,
        });
        assert!(fresh.ends_with("<Connect>"));
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(connections_list(&[]), EMPTY_MESSAGE);
        assert_eq!(discovery_list(&[]), "No students match your search.");
    }

    #[test]
    fn test_profile_modes() {
        let saved = UserProfile {
            name: "Dana Cruz".to_string(),
            skills: "Python, ,React".to_string(),
            ..UserProfile::default()
        };
        let shown = profile(&saved, ProfileMode::Display);
        assert!(shown.contains("(D) Dana Cruz"));
        assert!(shown.contains("[Python] [React]"));
        assert!(shown.contains("Projects:   -"));

        let form = profile(&UserProfile::default(), ProfileMode::Editing);
        assert!(form.starts_with("Edit Profile"));
    }

    #[test]
    fn test_picture_replaces_initial() {
        assert_eq!(avatar("Dana", ""), "(D)");
        assert_eq!(avatar("Dana", "data:image/png;base64,AA=="), "(picture)");
        assert_eq!(avatar("", ""), "( )");
    }

    #[test]
    fn test_tab_bar() {
        assert_eq!(
            tab_bar(Tab::Browse),
            " My Profile  [Browse Students]  My Connections "
        );
    }

    #[test]
    fn test_dashboard() {
        let figures = DashboardStats {
            connection_count: 2,
            skills_matched: vec!["java".to_string()],
            project_tags: vec![],
        };
        let text = dashboard(&figures, Tab::Connections, "panel");
        assert!(text.starts_with("PeerConnect\n==========="));
        assert!(text.contains("Connections:    2"));
        assert!(text.contains("Skills matched: [java]"));
        assert!(text.contains("Project tags:   0"));
        assert!(text.ends_with("\n\npanel"));
    }

    #[test]
    fn test_empty_stats_read_zero() {
        let text = stats(&DashboardStats::default());
        assert!(text.contains("Connections:    0"));
        assert!(text.contains("Skills matched: 0"));
        assert!(text.contains("Project tags:   0"));
    }

    #[test]
    fn test_notice_marker() {
        assert_eq!(
            notice(&Notice::error("Could not send the request")),
            "[error] Could not send the request"
        );
    }
}
