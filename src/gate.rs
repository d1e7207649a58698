// SPDX-License-Identifier: MIT

//! Navigation gate: pure predicate dispatch over the current identity and
//! the session flags.
//!
//! The flags are an explicit state object with a fixed lifecycle: set at
//! onboarding/signup/setup, read at every gate, cleared at logout. They
//! travel as plain string cookies and are treated as booleans by
//! presence-check. Every gate decision is re-derived from them, never
//! cached.

use axum_extra::extract::cookie::{Cookie, CookieJar};

/// Flag cookie names.
pub const ONBOARDED: &str = "isOnBoarded";
pub const ACCOUNT_CREATED: &str = "isAccountCreated";
pub const ACCOUNT_SETUP: &str = "isAccountSetup";
pub const LOGGED_IN: &str = "isLoggedIn";

/// Session flags parsed from cookies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionFlags {
    pub onboarded: bool,
    pub account_created: bool,
    pub account_setup: bool,
    pub logged_in: bool,
}

impl SessionFlags {
    pub fn from_jar(jar: &CookieJar) -> Self {
        Self {
            onboarded: jar.get(ONBOARDED).is_some(),
            account_created: jar.get(ACCOUNT_CREATED).is_some(),
            account_setup: jar.get(ACCOUNT_SETUP).is_some(),
            logged_in: jar.get(LOGGED_IN).is_some(),
        }
    }
}

/// Set one flag cookie.
pub fn set_flag(jar: CookieJar, name: &'static str) -> CookieJar {
    let mut cookie = Cookie::new(name, "true");
    cookie.set_path("/");
    jar.add(cookie)
}

/// Clear every flag except onboarding, which survives logout.
pub fn clear_flags_at_logout(jar: CookieJar) -> CookieJar {
    let mut jar = jar;
    for name in [LOGGED_IN, ACCOUNT_CREATED, ACCOUNT_SETUP] {
        let mut cookie = Cookie::new(name, "");
        cookie.set_path("/");
        jar = jar.remove(cookie);
    }
    jar
}

/// Application screens addressable by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    Welcome,
    CreateAccount,
    Login,
    SetupStudent,
    Dashboard,
}

impl Screen {
    pub fn path(self) -> &'static str {
        match self {
            Screen::Welcome => "/",
            Screen::CreateAccount => "/create-account",
            Screen::Login => "/login",
            Screen::SetupStudent => "/setup-student",
            Screen::Dashboard => "/dashboard",
        }
    }

    /// Map a request path onto the screen that gates it. Everything under
    /// the dashboard shares the dashboard's gate.
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Screen::Welcome),
            "/create-account" => Some(Screen::CreateAccount),
            "/login" => Some(Screen::Login),
            "/setup-student" => Some(Screen::SetupStudent),
            p if p == "/dashboard" || p.starts_with("/dashboard/") => Some(Screen::Dashboard),
            _ => None,
        }
    }
}

/// Decide where a visitor of `requested` should land.
pub fn next_screen(signed_in: bool, flags: SessionFlags, requested: Screen) -> Screen {
    match requested {
        Screen::Welcome => {
            if flags.onboarded {
                Screen::CreateAccount
            } else {
                Screen::Welcome
            }
        }
        Screen::CreateAccount => {
            if flags.account_created {
                Screen::Dashboard
            } else {
                Screen::CreateAccount
            }
        }
        Screen::Login => {
            if flags.logged_in && signed_in {
                Screen::Dashboard
            } else {
                Screen::Login
            }
        }
        Screen::SetupStudent => {
            if !signed_in {
                Screen::Login
            } else if flags.account_setup {
                Screen::Dashboard
            } else {
                Screen::SetupStudent
            }
        }
        Screen::Dashboard => {
            if signed_in {
                Screen::Dashboard
            } else {
                Screen::Login
            }
        }
    }
}

/// Side-panel active-route highlight predicate.
pub fn is_active(current_path: &str, item_path: &str) -> bool {
    current_path == item_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_skips_ahead_once_onboarded() {
        let flags = SessionFlags {
            onboarded: true,
            ..Default::default()
        };
        assert_eq!(next_screen(false, flags, Screen::Welcome), Screen::CreateAccount);
        assert_eq!(
            next_screen(false, SessionFlags::default(), Screen::Welcome),
            Screen::Welcome
        );
    }

    #[test]
    fn test_create_account_is_single_use() {
        let flags = SessionFlags {
            account_created: true,
            ..Default::default()
        };
        assert_eq!(
            next_screen(true, flags, Screen::CreateAccount),
            Screen::Dashboard
        );
    }

    #[test]
    fn test_setup_requires_identity_then_runs_once() {
        assert_eq!(
            next_screen(false, SessionFlags::default(), Screen::SetupStudent),
            Screen::Login
        );

        let done = SessionFlags {
            account_setup: true,
            ..Default::default()
        };
        assert_eq!(next_screen(true, done, Screen::SetupStudent), Screen::Dashboard);
        assert_eq!(
            next_screen(true, SessionFlags::default(), Screen::SetupStudent),
            Screen::SetupStudent
        );
    }

    #[test]
    fn test_dashboard_requires_identity() {
        assert_eq!(
            next_screen(false, SessionFlags::default(), Screen::Dashboard),
            Screen::Login
        );
        assert_eq!(
            next_screen(true, SessionFlags::default(), Screen::Dashboard),
            Screen::Dashboard
        );
    }

    #[test]
    fn test_screen_from_path_covers_dashboard_children() {
        assert_eq!(Screen::from_path("/dashboard"), Some(Screen::Dashboard));
        assert_eq!(
            Screen::from_path("/dashboard/pomodoro"),
            Some(Screen::Dashboard)
        );
        assert_eq!(Screen::from_path("/nope"), None);
    }

    #[test]
    fn test_active_route_highlight() {
        assert!(is_active("/dashboard/tasks", "/dashboard/tasks"));
        assert!(!is_active("/dashboard/tasks", "/dashboard"));
    }
}
