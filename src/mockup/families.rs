//! Screen family vocabulary
//!
//! Each family is a named cluster of anchor, field, button, text and radio
//! vocabulary. Adding a screen kind is a new table entry, not a new code path.

/// Fixed vocabulary of one radio group
#[derive(Debug, Clone, Copy)]
pub struct RadioVocabulary {
    pub title: &'static str,
    pub options: &'static [&'static str],
}

/// One conceptual screen kind recognized in mockups
#[derive(Debug, Clone, Copy)]
pub struct ScreenFamily {
    /// Stable identifier used in logs and cross-family heuristics
    pub name: &'static str,
    /// Title of the synthesized section
    pub title: &'static str,
    /// Any of these (case-insensitive) marks the family as present
    pub anchors: &'static [&'static str],
    pub fields: &'static [&'static str],
    pub buttons: &'static [&'static str],
    pub texts: &'static [&'static str],
    pub radio: Option<RadioVocabulary>,
}

pub const DASHBOARD: &str = "dashboard";
pub const CREATE_PROJECT: &str = "create_project";

pub const FAMILIES: &[ScreenFamily] = &[
    ScreenFamily {
        name: DASHBOARD,
        title: "DashboardScreen",
        anchors: &["Dashboard"],
        fields: &["Search"],
        buttons: &["Create project", "View all"],
        texts: &[
            "Dashboard",
            "Your work",
            "Recent projects",
            "Projects",
            "Repositories",
            "Recent activity",
        ],
        radio: None,
    },
    ScreenFamily {
        name: CREATE_PROJECT,
        title: "CreateProjectScreen",
        anchors: &["Create a project"],
        fields: &["Waremelon", "Stash", "Project name", "Key", "Description"],
        buttons: &["Publish", "Cancel"],
        texts: &[
            "Create a project",
            "Project avatar",
            "Access level",
            "Default repository permission",
        ],
        radio: Some(RadioVocabulary {
            title: "Default repository permission",
            options: &["Read and write", "Read only", "None"],
        }),
    },
    ScreenFamily {
        name: "login",
        title: "LoginScreen",
        anchors: &["Log in", "Login", "Sign in"],
        fields: &["Email", "Username", "Password"],
        buttons: &["Log in", "Login", "Sign in", "Sign up", "Forgot password?"],
        texts: &["Welcome back", "Remember me"],
        radio: None,
    },
    ScreenFamily {
        name: "settings",
        title: "SettingsScreen",
        anchors: &["Settings"],
        fields: &["Display name", "Language", "Time zone"],
        buttons: &["Save", "Reset"],
        texts: &["Settings", "Notifications", "Appearance"],
        radio: Some(RadioVocabulary {
            title: "Theme",
            options: &["Light", "Dark", "System"],
        }),
    },
    ScreenFamily {
        name: "profile",
        title: "ProfileScreen",
        anchors: &["Profile", "My profile"],
        fields: &["Full name", "Phone", "Address", "Bio"],
        buttons: &["Edit profile", "Log out"],
        texts: &["Profile", "My profile"],
        radio: None,
    },
];

/// Looks a family up by its identifier
pub fn family(name: &str) -> Option<&'static ScreenFamily> {
    FAMILIES.iter().find(|f| f.name == name)
}

/// Words that mark a free-form label as a button in generic screens
pub const BUTTON_KEYWORDS: &[&str] = &[
    "submit", "save", "cancel", "ok", "login", "log in", "sign in", "sign up", "register",
    "next", "back", "continue", "send", "publish", "create", "delete", "add", "edit",
    "done", "confirm", "apply", "close", "update", "logout", "log out",
];

/// Words that mark a free-form label as an input field in generic screens
pub const FIELD_KEYWORDS: &[&str] = &[
    "name", "email", "e-mail", "password", "username", "phone", "address", "description",
    "title", "key", "search", "date", "amount", "message", "comment", "url", "city",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_titles_are_unique_screens() {
        let mut titles: Vec<_> = FAMILIES.iter().map(|f| f.title).collect();
        assert!(titles.iter().all(|t| t.ends_with("Screen")));
        titles.sort();
        titles.dedup();
        assert_eq!(titles.len(), FAMILIES.len());
    }

    #[test]
    fn test_every_family_has_anchors() {
        assert!(FAMILIES.iter().all(|f| !f.anchors.is_empty()));
    }

    #[test]
    fn test_family_lookup() {
        assert_eq!(family(DASHBOARD).map(|f| f.title), Some("DashboardScreen"));
        assert!(family("unknown").is_none());
    }
}
