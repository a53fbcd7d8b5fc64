//! Guards and helpers for raw SOAP responses.

use serde_json::Value;

use crate::error::{ResolverError, Result};

/// Phrases that only occur when the API answered with an HTML error page.
///
/// The Matrikkel API returns status 200 with an HTML body for unauthenticated
/// or unauthorized requests, which would otherwise fail later as an XML error.
const NOT_OK_CONTENT: [&str; 2] = ["<!DOCTYPE HTML", "401 Unauthorized"];

/// Reject bodies that are an HTML error page instead of a SOAP envelope.
pub fn check_service_response(body: &str) -> Result<()> {
    if NOT_OK_CONTENT.iter().any(|phrase| body.contains(phrase)) {
        tracing::warn!(len = body.len(), "Matrikkel API returned an HTML page");
        return Err(ResolverError::InvalidResponse(body.to_string()));
    }
    Ok(())
}

/// Unwrap `Envelope.Body` if the tree is a full SOAP envelope.
pub fn envelope_body(tree: Value) -> Value {
    match tree {
        Value::Object(mut root) => {
            let body = root
                .get_mut("Envelope")
                .and_then(Value::as_object_mut)
                .and_then(|envelope| envelope.remove("Body"));
            match body {
                Some(body) => body,
                None => Value::Object(root),
            }
        }
        other => other,
    }
}

/// Treat a body as a list of response items.
pub fn into_items(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_html_page_is_rejected() {
        let body = "<!DOCTYPE HTML PUBLIC \"-//IETF//DTD HTML 2.0//EN\"><html><title>401 Unauthorized</title></html>";
        let err = check_service_response(body).unwrap_err();
        assert!(matches!(err, ResolverError::InvalidResponse(_)));
    }

    #[test]
    fn test_soap_envelope_is_accepted() {
        let body = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body/></soap:Envelope>"#;
        assert!(check_service_response(body).is_ok());
    }

    #[test]
    fn test_envelope_body_unwraps() {
        let tree = json!({ "Envelope": { "$": {}, "Body": { "svar": "1" } } });
        assert_eq!(envelope_body(tree), json!({ "svar": "1" }));
    }

    #[test]
    fn test_envelope_body_without_envelope_is_unchanged() {
        let tree = json!({ "svar": "1" });
        assert_eq!(envelope_body(tree.clone()), tree);
    }

    #[test]
    fn test_into_items() {
        assert_eq!(into_items(json!({ "a": 1 })), vec![json!({ "a": 1 })]);
        assert_eq!(into_items(json!([1, 2])), vec![json!(1), json!(2)]);
    }
}
