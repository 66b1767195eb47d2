use std::sync::Arc;

use account_core::AccountError;
use tera::{Context, Tera};

/// Page templates, compiled into the binary so rendering never depends on the
/// working directory.
#[derive(Clone)]
pub struct Templates {
    tera: Arc<Tera>,
}

impl Templates {
    pub fn new() -> Result<Self, AccountError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", include_str!("../templates/base.html")),
            ("code.html", include_str!("../templates/code.html")),
            ("login.html", include_str!("../templates/login.html")),
            ("account.html", include_str!("../templates/account.html")),
        ])
        .map_err(|e| AccountError::server_error(&format!("failed to load templates: {e}")))?;

        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<String, AccountError> {
        self.tera.render(name, context).map_err(|e| {
            tracing::error!(template = name, error = ?e, "template render failed");
            AccountError::server_error("failed to render page")
        })
    }
}
