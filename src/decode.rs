//! Content-type-directed parsing of an inbound request body into a generic
//! JSON tree.

use axum::body::Bytes;
use serde_json::{Map, Value};
use tracing::debug;

/// Decode `body` according to `content_type`, never failing: anything that
/// doesn't parse degrades to `{"text": <body as UTF-8, lossy>}`.
pub async fn decode_body(content_type: &str, body: &Bytes) -> Value {
    let ct = content_type.to_ascii_lowercase();

    if ct.contains("application/json") {
        return match serde_json::from_slice(body) {
            Ok(v) => v,
            Err(e) => {
                debug!(error = %e, "declared application/json but body didn't parse, falling back to text");
                text_fallback(body)
            }
        };
    }

    if ct.contains("application/x-www-form-urlencoded") {
        return form_map(body);
    }

    if ct.contains("multipart/form-data") {
        return multipart_map(&ct, body.clone()).await;
    }

    if ct.contains("text/plain") {
        return Value::Object(text_body(body));
    }

    // Unknown content type: try JSON first, then fall back to text.
    match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(_) => text_fallback(body),
    }
}

fn text_fallback(body: &[u8]) -> Value {
    Value::Object(text_body(body))
}

fn text_body(body: &[u8]) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(
        "text".to_string(),
        Value::String(String::from_utf8_lossy(body).into_owned()),
    );
    map
}

fn form_map(body: &[u8]) -> Value {
    let raw = String::from_utf8_lossy(body);
    let mut map = Map::new();
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        map.insert(key.into_owned(), Value::String(value.into_owned()));
    }
    Value::Object(map)
}

/// multipart/form-data is decoded as a flat string map of its text fields,
/// matching the source's use of `request.form()` for both urlencoded and
/// multipart bodies. Binary file parts are dropped with a debug log — no
/// field in this engine's data model ever carries binary content. Parsing
/// itself is delegated to `multer`, the same crate axum's own `multipart`
/// feature wraps.
async fn multipart_map(content_type: &str, body: Bytes) -> Value {
    let Some(boundary) = multer::parse_boundary(content_type).ok() else {
        debug!("multipart/form-data without a boundary, falling back to text");
        return text_fallback(&body);
    };

    let stream = futures::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut map = Map::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "multipart parsing failed, stopping early");
                break;
            }
        };
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match field.text().await {
            Ok(text) => {
                map.insert(name, Value::String(text));
            }
            Err(e) => debug!(field = %name, error = %e, "dropping non-UTF-8 multipart field"),
        }
    }
    Value::Object(map)
}
