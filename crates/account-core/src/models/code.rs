use serde::Serialize;

/// An authorization code as shown to the user for manual copy.
///
/// The code is opaque: it is echoed exactly as received and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationCodeView {
    code: String,
}

impl AuthorizationCodeView {
    /// Build the view from the raw `code` query value.
    ///
    /// Returns `None` when the parameter is absent or empty; callers redirect
    /// back to the account root in that case.
    pub fn from_query(code: Option<&str>) -> Option<Self> {
        match code {
            Some(code) if !code.is_empty() => Some(Self {
                code: code.to_string(),
            }),
            _ => None,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}
