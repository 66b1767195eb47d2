use actix::{Actor, Addr};
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::web;

use account_core::{AccountError, RootPath};
use account_observability::Metrics;
use account_ports::DynStorage;

use crate::actors::UserActor;
use crate::handlers::{account, ops};
use crate::templates::Templates;

pub const SESSION_COOKIE_NAME: &str = "account_session";

/// Everything the HTTP layer needs, shared by the server and the test suites.
///
/// Must be constructed inside a running actix system (it starts the `UserActor`).
#[derive(Clone)]
pub struct AppState {
    root: RootPath,
    storage: DynStorage,
    users: Addr<UserActor>,
    templates: Templates,
    metrics: Metrics,
    session_key: Key,
    secure_cookie: bool,
}

impl AppState {
    pub fn new(
        root: RootPath,
        storage: DynStorage,
        metrics: Metrics,
        session_key: Key,
        secure_cookie: bool,
    ) -> Result<Self, AccountError> {
        let templates = Templates::new()?;
        let users = UserActor::new(storage.clone()).start();

        Ok(Self {
            root,
            storage,
            users,
            templates,
            metrics,
            session_key,
            secure_cookie,
        })
    }

    pub fn root(&self) -> &RootPath {
        &self.root
    }

    pub fn storage(&self) -> &DynStorage {
        &self.storage
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn session_middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.session_key.clone())
            .cookie_name(SESSION_COOKIE_NAME.to_string())
            .cookie_secure(self.secure_cookie)
            .cookie_http_only(true)
            .cookie_same_site(SameSite::Lax)
            .build()
    }

    /// Register shared data and every route. Wrap the app with
    /// [`AppState::session_middleware`] for the account pages to work.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.root.clone()))
            .app_data(web::Data::new(self.storage.clone()))
            .app_data(web::Data::new(self.users.clone()))
            .app_data(web::Data::new(self.templates.clone()))
            .app_data(web::Data::new(self.metrics.clone()))
            .route("/health", web::get().to(ops::health))
            .route("/ready", web::get().to(ops::readiness))
            .route("/metrics", web::get().to(ops::system_metrics))
            .service(web::resource(self.root.code()).route(web::get().to(account::code)))
            .service(
                web::resource(self.root.home_patterns()).route(web::get().to(account::home)),
            )
            .service(
                web::resource(self.root.login())
                    .route(web::get().to(account::login_form))
                    .route(web::post().to(account::login)),
            )
            .service(web::resource(self.root.logout()).route(web::post().to(account::logout)));
    }
}
