use serde::{Deserialize, Serialize};
use std::fmt;

/// Base path under which the Account App pages are mounted (e.g. `/oauth`).
///
/// Always starts with `/` and never ends with one. Mounting at the site root
/// is represented by the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RootPath(String);

impl RootPath {
    pub fn new(raw: &str) -> Self {
        let segments: Vec<&str> = raw.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return Self(String::new());
        }
        Self(format!("/{}", segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join a route (`/login`, `code`, ...) onto the root path.
    pub fn join(&self, route: &str) -> String {
        format!("{}/{}", self.0, route.trim_start_matches('/'))
    }

    /// The account root page, i.e. where "Back to Account" leads.
    pub fn home(&self) -> String {
        self.join("/")
    }

    pub fn login(&self) -> String {
        self.join("/login")
    }

    pub fn logout(&self) -> String {
        self.join("/logout")
    }

    pub fn code(&self) -> String {
        self.join("/code")
    }

    /// Every request path that should resolve to the account root page.
    pub fn home_patterns(&self) -> Vec<String> {
        if self.0.is_empty() {
            vec!["/".to_string()]
        } else {
            vec![self.0.clone(), self.home()]
        }
    }
}

impl Default for RootPath {
    fn default() -> Self {
        Self::new("/oauth")
    }
}

impl From<String> for RootPath {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<RootPath> for String {
    fn from(root: RootPath) -> Self {
        root.0
    }
}

impl fmt::Display for RootPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_slashes() {
        assert_eq!(RootPath::new("").as_str(), "");
        assert_eq!(RootPath::new("/").as_str(), "");
        assert_eq!(RootPath::new("oauth/").as_str(), "/oauth");
        assert_eq!(RootPath::new("//account//oauth").as_str(), "/account/oauth");
    }

    #[test]
    fn builds_routes_below_root() {
        let root = RootPath::new("/oauth");
        assert_eq!(root.code(), "/oauth/code");
        assert_eq!(root.login(), "/oauth/login");
        assert_eq!(root.home(), "/oauth/");
        assert_eq!(root.home_patterns(), vec!["/oauth", "/oauth/"]);

        let bare = RootPath::new("/");
        assert_eq!(bare.login(), "/login");
        assert_eq!(bare.home(), "/");
        assert_eq!(bare.home_patterns(), vec!["/"]);
    }
}
