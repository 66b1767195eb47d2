// Account App code view.
//
// The database is dropped and seeded before every test, mirroring a fresh
// end-to-end run.

#[macro_use]
mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test;

use account_app::core::SeedData;
use common::{find_link, has_element_text, path_of, seeded_state, OAUTH_ROOT_PATH};

#[actix_web::test]
async fn displays_ui_elements_in_place() {
    let state = seeded_state(OAUTH_ROOT_PATH).await;
    let app = init_app!(state);
    let code = "12345code";

    let req = test::TestRequest::get()
        .uri(&format!("{OAUTH_ROOT_PATH}/code?code={code}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(has_element_text(&body, "Authorization code"));
    assert!(has_element_text(&body, "Your authorization code is:"));
    assert!(has_element_text(&body, code));
    assert_eq!(
        find_link(&body, "Back to Account").as_deref(),
        Some("/oauth/")
    );
}

#[actix_web::test]
async fn redirects_back_if_no_code_is_supplied() {
    let state = seeded_state(OAUTH_ROOT_PATH).await;
    let app = init_app!(state);

    let (final_uri, resp) = follow_redirects!(app, format!("{OAUTH_ROOT_PATH}/code"));

    assert_eq!(path_of(&final_uri), format!("{OAUTH_ROOT_PATH}/login"));
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn missing_code_goes_to_account_root_first() {
    let state = seeded_state(OAUTH_ROOT_PATH).await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/oauth/code").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/oauth/");
    assert_eq!(state.metrics().account_code_redirects_total.get(), 1);
    assert_eq!(state.metrics().account_code_views_total.get(), 0);
}

#[actix_web::test]
async fn empty_code_is_treated_as_missing() {
    let state = seeded_state(OAUTH_ROOT_PATH).await;
    let app = init_app!(state);

    let (final_uri, _) = follow_redirects!(app, "/oauth/code?code=");

    assert_eq!(path_of(&final_uri), "/oauth/login");
}

#[actix_web::test]
async fn code_is_echoed_verbatim_and_escaped() {
    let state = seeded_state(OAUTH_ROOT_PATH).await;
    let app = init_app!(state);

    // "<script>x&y</script>", percent-encoded.
    let req = test::TestRequest::get()
        .uri("/oauth/code?code=%3Cscript%3Ex%26y%3C%2Fscript%3E")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(!body.contains("<script>"));
    assert!(body.contains("&lt;script&gt;x&amp;y&lt;&#x2F;script&gt;"));
}

#[actix_web::test]
async fn code_page_is_not_cacheable_or_frameable() {
    let state = seeded_state(OAUTH_ROOT_PATH).await;
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/oauth/code?code=12345code")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let headers = resp.headers();

    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-store");
    assert_eq!(headers.get(header::PRAGMA).unwrap(), "no-cache");
    assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
    assert_eq!(
        headers.get(header::CONTENT_SECURITY_POLICY).unwrap(),
        "frame-ancestors 'none'"
    );
    assert_eq!(headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
    assert_eq!(headers.get(header::REFERRER_POLICY).unwrap(), "no-referrer");
    assert!(headers
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));
}

#[actix_web::test]
async fn duplicate_code_parameters_are_rejected() {
    let state = seeded_state(OAUTH_ROOT_PATH).await;
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/oauth/code?code=a&code=b")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn honours_a_site_root_mount() {
    let state = seeded_state("/").await;
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/code?code=12345code")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert_eq!(find_link(&body, "Back to Account").as_deref(), Some("/"));

    let (final_uri, _) = follow_redirects!(app, "/code");
    assert_eq!(path_of(&final_uri), "/login");
}

#[actix_web::test]
async fn scenarios_are_repeatable_after_reseeding() {
    let state = seeded_state(OAUTH_ROOT_PATH).await;
    let app = init_app!(state);
    let seed = SeedData::default_fixture().unwrap();

    for _ in 0..2 {
        state.storage().drop_and_seed(&seed).await.unwrap();

        let req = test::TestRequest::get()
            .uri("/oauth/code?code=12345code")
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(has_element_text(&body, "12345code"));

        let (final_uri, _) = follow_redirects!(app, "/oauth/code");
        assert_eq!(path_of(&final_uri), "/oauth/login");
    }

    assert_eq!(state.metrics().account_code_views_total.get(), 2);
    assert_eq!(state.metrics().account_code_redirects_total.get(), 2);
}
