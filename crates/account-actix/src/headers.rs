use actix_web::http::header::{self, HeaderValue};
use actix_web::HttpResponse;

pub fn no_store_headers(mut resp: HttpResponse) -> HttpResponse {
    resp.headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    resp.headers_mut()
        .insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    resp
}

/// Clickjacking and referrer-leak protection for pages that display credentials.
pub fn auth_response_security_headers(mut resp: HttpResponse) -> HttpResponse {
    resp.headers_mut().insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );
    resp.headers_mut()
        .insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    resp.headers_mut().insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("frame-ancestors 'none'"),
    );
    resp.headers_mut().insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    resp
}

/// `302 Found` to a path on this server.
pub fn redirect(location: &str) -> HttpResponse {
    no_store_headers(
        HttpResponse::Found()
            .insert_header((header::LOCATION, location))
            .finish(),
    )
}
