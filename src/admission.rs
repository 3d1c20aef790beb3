//! Route admission: the required-header/required-query-param gate a route
//! can impose before its targets are dispatched to.

use crate::config::Route;
use crate::error::GatewayError;
use axum::http::HeaderMap;
use std::collections::HashMap;

/// Check every `(key, expected_value)` pair configured on `route.headers`
/// and `route.query_params` against the actual request. Every configured
/// pair must be present and match exactly; unconfigured headers/params on
/// the request are ignored.
pub fn check_admission(
    route: &Route,
    headers: &HeaderMap,
    query: &HashMap<String, String>,
) -> Result<(), GatewayError> {
    for (key, expected) in &route.headers {
        let actual = headers.get(key).and_then(|v| v.to_str().ok());
        if actual != Some(expected.as_str()) {
            return Err(GatewayError::Admission(format!(
                "missing or mismatched required header: {key}"
            )));
        }
    }

    for (key, expected) in &route.query_params {
        match query.get(key) {
            Some(actual) if actual == expected => {}
            _ => {
                return Err(GatewayError::Admission(format!(
                    "missing or mismatched required query parameter: {key}"
                )))
            }
        }
    }

    Ok(())
}
