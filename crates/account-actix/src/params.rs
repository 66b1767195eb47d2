use std::collections::HashMap;

use account_core::AccountError;
use actix_web::{web, HttpRequest};
use url::form_urlencoded;

/// Decode query parameters, rejecting repeated keys.
pub fn query_params_no_dupes(req: &HttpRequest) -> Result<HashMap<String, String>, AccountError> {
    parse_no_dupes(req.query_string().as_bytes(), "query")
}

/// Decode an `application/x-www-form-urlencoded` body, rejecting repeated keys.
pub fn form_params_no_dupes(body: &web::Bytes) -> Result<HashMap<String, String>, AccountError> {
    parse_no_dupes(body, "form")
}

fn parse_no_dupes(raw: &[u8], kind: &str) -> Result<HashMap<String, String>, AccountError> {
    let mut map: HashMap<String, String> = HashMap::new();
    for (k, v) in form_urlencoded::parse(raw) {
        let key = k.into_owned();
        if map.contains_key(&key) {
            return Err(AccountError::invalid_request(&format!(
                "Duplicate {kind} parameters are not allowed"
            )));
        }
        map.insert(key, v.into_owned());
    }
    Ok(map)
}
