#![allow(dead_code, unused_macros)]

use actix_web::cookie::Key;
use regex::Regex;

use account_app::core::{random, RootPath, SeedData, User};
use account_app::http::AppState;
use account_app::observability::Metrics;
use account_app::ports::Storage;
use account_app::server::create_storage;

/// Root path the Account App pages are mounted under in the test suites.
pub const OAUTH_ROOT_PATH: &str = "/oauth";

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// Fresh in-memory database, dropped and seeded with the bundled fixture.
pub async fn seeded_state(root: &str) -> AppState {
    let storage = create_storage("sqlite::memory:")
        .await
        .expect("create storage");
    storage.init().await.expect("init storage");
    storage
        .drop_and_seed(&SeedData::default_fixture().expect("seed fixture"))
        .await
        .expect("drop and seed");

    AppState::new(
        RootPath::new(root),
        storage,
        Metrics::new().expect("metrics"),
        Key::from(random::bytes(64).as_slice()),
        false,
    )
    .expect("app state")
}

/// Build the in-process test service for an `AppState`.
macro_rules! init_app {
    ($state:expr) => {{
        let state = $state.clone();
        let app = actix_web::App::new()
            .wrap(state.session_middleware())
            .configure(|cfg| state.configure(cfg));
        actix_web::test::init_service(app).await
    }};
}

/// GET `uri`, following same-server redirects. Yields `(final_uri, response)`.
macro_rules! follow_redirects {
    ($app:expr, $uri:expr) => {{
        let mut uri = $uri.to_string();
        let mut hops = 0;
        loop {
            let req = actix_web::test::TestRequest::get().uri(&uri).to_request();
            let resp = actix_web::test::call_service(&$app, req).await;
            if !resp.status().is_redirection() {
                break (uri, resp);
            }
            hops += 1;
            assert!(hops < 10, "too many redirects starting at {}", $uri);
            uri = resp
                .headers()
                .get(actix_web::http::header::LOCATION)
                .expect("redirect without Location")
                .to_str()
                .expect("Location is not ASCII")
                .to_string();
        }
    }};
}

/// Path component of a request URI (drops the query string).
pub fn path_of(uri: &str) -> &str {
    uri.split('?').next().unwrap_or(uri)
}

fn unescape_html(s: &str) -> String {
    s.replace("&#x2F;", "/")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Whether some element's entire text content equals `text`.
pub fn has_element_text(body: &str, text: &str) -> bool {
    let element = Regex::new(r">\s*([^<]*?)\s*<").expect("regex");
    let found = element
        .captures_iter(body)
        .any(|c| unescape_html(&c[1]) == text);
    found
}

/// `href` of the first link whose label contains `label`.
pub fn find_link(body: &str, label: &str) -> Option<String> {
    let link = Regex::new(r#"<a\s[^>]*href="([^"]*)"[^>]*>([^<]*)</a>"#).expect("regex");
    let href = link
        .captures_iter(body)
        .find(|c| unescape_html(&c[2]).contains(label))
        .map(|c| unescape_html(&c[1]));
    href
}

/// A minimal contract test suite that every `Storage` backend must satisfy.
pub async fn run_storage_contract(storage: &dyn Storage) -> Result<(), Box<dyn std::error::Error>> {
    storage.init().await?;

    // Drop-and-seed loads the fixture.
    let seed = SeedData::default_fixture()?;
    storage.drop_and_seed(&seed).await?;

    let admin = storage
        .get_user_by_username(ADMIN_USERNAME)
        .await?
        .ok_or_else(|| std::io::Error::other("seeded admin should exist"))?;
    assert!(admin.admin);
    assert!(account_app::core::password::verify_password(
        ADMIN_PASSWORD,
        &admin.password_hash
    ));

    let by_id = storage
        .get_user_by_id(&admin.id)
        .await?
        .ok_or_else(|| std::io::Error::other("admin should be found by id"))?;
    assert_eq!(by_id.username, admin.username);

    // User roundtrip
    let user = User::new(
        "user_1".to_string(),
        "password_hash".to_string(),
        "user_1@example.com".to_string(),
        "User One".to_string(),
        false,
    );
    storage.save_user(&user).await?;

    let fetched = storage
        .get_user_by_username("user_1")
        .await?
        .ok_or_else(|| std::io::Error::other("user should exist"))?;
    assert_eq!(fetched.id, user.id);
    assert_eq!(fetched.name, "User One");

    // Uniqueness parity: saving the same username twice should fail.
    let dup = User::new(
        "user_1".to_string(),
        "other".to_string(),
        "dup@example.com".to_string(),
        String::new(),
        false,
    );
    let err = storage.save_user(&dup).await.unwrap_err();
    assert_eq!(err.error, "invalid_request");

    // Reseeding is idempotent and drops everything that was not in the fixture.
    storage.drop_and_seed(&seed).await?;
    storage.drop_and_seed(&seed).await?;
    assert!(storage.get_user_by_username("user_1").await?.is_none());
    for seeded in &seed.users {
        assert!(
            storage.get_user_by_username(&seeded.username).await?.is_some(),
            "{} should be seeded",
            seeded.username
        );
    }

    // The old admin id is gone after reseeding.
    assert!(storage.get_user_by_id(&admin.id).await?.is_none());

    storage.healthcheck().await?;

    Ok(())
}
