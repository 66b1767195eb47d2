use actix::Addr;
use actix_session::Session;
use actix_web::http::{header::ContentType, StatusCode};
use actix_web::{web, HttpRequest, HttpResponse, Result};
use tera::Context;

use account_core::{AccountError, AuthorizationCodeView, RootPath};
use account_observability::Metrics;

use crate::actors::{Authenticate, GetUser, UserActor};
use crate::headers::{auth_response_security_headers, no_store_headers, redirect};
use crate::params::{form_params_no_dupes, query_params_no_dupes};
use crate::session;
use crate::templates::Templates;

fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body)
}

fn mailbox_error(e: actix::MailboxError) -> AccountError {
    AccountError::server_error(&e.to_string())
}

fn render_login(
    templates: &Templates,
    root: &RootPath,
    status: StatusCode,
    username: &str,
    error: Option<&str>,
) -> Result<HttpResponse, AccountError> {
    let mut ctx = Context::new();
    ctx.insert("login_url", &root.login());
    ctx.insert("username", username);
    ctx.insert("error", &error);

    let body = templates.render("login.html", &ctx)?;
    Ok(no_store_headers(html(status, body)))
}

/// Authorization code page.
///
/// Shows the `code` query parameter for manual copy. Without a (non-empty)
/// code there is nothing to show, so the visitor goes back to the account root.
pub async fn code(
    req: HttpRequest,
    root: web::Data<RootPath>,
    templates: web::Data<Templates>,
    metrics: web::Data<Metrics>,
) -> Result<HttpResponse, AccountError> {
    let params = query_params_no_dupes(&req)?;

    let Some(view) = AuthorizationCodeView::from_query(params.get("code").map(String::as_str))
    else {
        metrics.account_code_redirects_total.inc();
        tracing::debug!("no authorization code supplied, redirecting to account root");
        return Ok(redirect(&root.home()));
    };

    metrics.account_code_views_total.inc();

    let mut ctx = Context::new();
    ctx.insert("code", view.code());
    ctx.insert("home_url", &root.home());
    let body = templates.render("code.html", &ctx)?;

    Ok(auth_response_security_headers(no_store_headers(html(
        StatusCode::OK,
        body,
    ))))
}

/// Account root. Signed-out visitors are sent to the login page.
pub async fn home(
    session: Session,
    root: web::Data<RootPath>,
    templates: web::Data<Templates>,
    users: web::Data<Addr<UserActor>>,
) -> Result<HttpResponse, AccountError> {
    let Some(current) = session::current_user(&session) else {
        return Ok(redirect(&root.login()));
    };

    let user = users
        .send(GetUser {
            user_id: current.user_id.clone(),
            span: tracing::Span::current(),
        })
        .await
        .map_err(mailbox_error)??;

    // The account may be gone (e.g. the database was reseeded).
    let Some(user) = user else {
        tracing::info!(user_id = %current.user_id, "session refers to unknown user, signing out");
        session::sign_out(&session);
        return Ok(redirect(&root.login()));
    };

    let mut ctx = Context::new();
    ctx.insert("name", user.display_name());
    ctx.insert("username", &user.username);
    ctx.insert("logout_url", &root.logout());
    let body = templates.render("account.html", &ctx)?;

    Ok(no_store_headers(html(StatusCode::OK, body)))
}

pub async fn login_form(
    session: Session,
    root: web::Data<RootPath>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, AccountError> {
    if session::current_user(&session).is_some() {
        return Ok(redirect(&root.home()));
    }

    render_login(&templates, &root, StatusCode::OK, "", None)
}

pub async fn login(
    body: web::Bytes,
    session: Session,
    root: web::Data<RootPath>,
    templates: web::Data<Templates>,
    users: web::Data<Addr<UserActor>>,
    metrics: web::Data<Metrics>,
) -> Result<HttpResponse, AccountError> {
    let form = form_params_no_dupes(&body)?;
    let username = form.get("username").map(|s| s.trim()).unwrap_or_default();
    let password = form.get("password").map(String::as_str).unwrap_or_default();

    if username.is_empty() || password.is_empty() {
        metrics
            .account_logins_total
            .with_label_values(&["invalid_request"])
            .inc();
        return render_login(
            &templates,
            &root,
            StatusCode::BAD_REQUEST,
            username,
            Some("Username and password are required"),
        );
    }

    let user = users
        .send(Authenticate {
            username: username.to_string(),
            password: password.to_string(),
            span: tracing::Span::current(),
        })
        .await
        .map_err(mailbox_error)??;

    match user {
        Some(user) => {
            session::sign_in(&session, &user)?;
            metrics
                .account_logins_total
                .with_label_values(&["success"])
                .inc();
            Ok(redirect(&root.home()))
        }
        None => {
            metrics
                .account_logins_total
                .with_label_values(&["invalid_credentials"])
                .inc();
            render_login(
                &templates,
                &root,
                StatusCode::UNAUTHORIZED,
                username,
                Some("Invalid username or password"),
            )
        }
    }
}

pub async fn logout(session: Session, root: web::Data<RootPath>) -> HttpResponse {
    session::sign_out(&session);
    redirect(&root.login())
}
