//! Best-effort conversion of collaborator error payloads into one readable
//! line for the producer.

use serde_json::Value;

pub const UNKNOWN_ERROR: &str = "Erro desconhecido";
pub const COMMUNICATION_ERROR: &str =
    "Erro técnico de comunicação. Verifique os nomes das colunas no seu Supabase.";

/// Describes an arbitrary error payload.
///
/// Strings pass through. Objects (or their nested `error` object) are
/// read for `message`, `error_description` or `error`, decorated with
/// `details`, `hint` and `code` when present. Objects without a message
/// are dumped as JSON, and an empty object yields [`COMMUNICATION_ERROR`].
pub fn describe_error(err: &Value) -> String {
    if !is_truthy(err) {
        return UNKNOWN_ERROR.into();
    }
    match err {
        Value::String(text) => text.clone(),
        Value::Object(map) => {
            let body = map.get("error").filter(|value| value.is_object()).unwrap_or(err);
            let field = |name: &str| body.get(name).filter(|value| is_truthy(value));
            let message = field("message")
                .or_else(|| field("error_description"))
                .or_else(|| field("error"));
            if let Some(message) = message {
                let details = field("details").map(as_text).filter(|text| text != "null");
                let hint = field("hint").map(as_text).filter(|text| text != "null");
                let code = field("code").map(as_text);
                return compose_message(
                    &as_text(message),
                    details.as_deref(),
                    hint.as_deref(),
                    code.as_deref(),
                );
            }
            let json = err.to_string();
            if json != "{}" {
                format!("Detalhe do Erro: {json}")
            } else {
                COMMUNICATION_ERROR.into()
            }
        }
        Value::Array(_) => format!("Detalhe do Erro: {err}"),
        other => as_text(other),
    }
}

/// Describes a raw HTTP error body. JSON bodies go through
/// [`describe_error`]; anything else is treated as plain text.
pub fn describe_body(body: &str) -> String {
    let body = body.trim();
    match serde_json::from_str::<Value>(body) {
        Ok(value) => describe_error(&value),
        Err(_) => describe_error(&Value::String(body.to_string())),
    }
}

/// Joins the parts of a store error the way they are shown to users. Empty
/// slots keep their separating spaces; only the ends are trimmed.
pub fn compose_message(
    message: &str,
    details: Option<&str>,
    hint: Option<&str>,
    code: Option<&str>,
) -> String {
    let details = details
        .filter(|text| !text.is_empty())
        .map(|text| format!(" - {text}"))
        .unwrap_or_default();
    let hint = hint
        .filter(|text| !text.is_empty())
        .map(|text| format!(" [Dica: {text}]"))
        .unwrap_or_default();
    let code = code
        .filter(|text| !text.is_empty())
        .map(|text| format!("(Código: {text})"))
        .unwrap_or_default();
    format!("{message} {details} {hint} {code}").trim().to_string()
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_pass_through() {
        assert_eq!(describe_error(&json!("falhou")), "falhou");
    }

    #[test]
    fn falsy_values_are_unknown() {
        assert_eq!(describe_error(&Value::Null), UNKNOWN_ERROR);
        assert_eq!(describe_error(&json!("")), UNKNOWN_ERROR);
    }

    #[test]
    fn message_with_hint_and_code() {
        let err = json!({ "message": "x", "hint": "h", "code": "42" });
        assert_eq!(describe_error(&err), "x   [Dica: h] (Código: 42)");
    }

    #[test]
    fn null_details_are_skipped() {
        let err = json!({ "message": "coluna inexistente", "details": "null", "hint": null });
        assert_eq!(describe_error(&err), "coluna inexistente");
    }

    #[test]
    fn nested_error_member_is_used() {
        let err = json!({ "error": { "error_description": "token expirado" } });
        assert_eq!(describe_error(&err), "token expirado");
    }

    #[test]
    fn objects_without_message_are_dumped() {
        let err = json!({ "status": 500 });
        assert_eq!(describe_error(&err), "Detalhe do Erro: {\"status\":500}");
    }

    #[test]
    fn empty_object_falls_back_to_communication_error() {
        assert_eq!(describe_error(&json!({})), COMMUNICATION_ERROR);
    }

    #[test]
    fn oauth_style_bodies_read_their_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid Refresh Token"}"#;
        assert_eq!(describe_body(body), "Invalid Refresh Token");
    }

    #[test]
    fn google_style_bodies_read_nested_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(describe_body(body), "API key not valid.   (Código: 400)");
    }

    #[test]
    fn non_json_bodies_pass_through_and_blank_is_unknown() {
        assert_eq!(describe_body("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(describe_body("   "), UNKNOWN_ERROR);
    }

    #[test]
    fn numeric_code_is_rendered() {
        let err = json!({ "message": "falha", "details": "linha 3", "code": 23505 });
        assert_eq!(describe_error(&err), "falha  - linha 3  (Código: 23505)");
    }
}
