use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
}

/// Map each failing field to `{"errors": [messages]}`
pub fn field_errors_json(validation_errors: &ValidationErrors) -> serde_json::Value {
    let mut fields = serde_json::Map::new();

    for (field, errors) in validation_errors.field_errors() {
        let messages: Vec<String> = errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Validation error in field: {}", field))
            })
            .collect();
        fields.insert(field.to_string(), serde_json::json!({ "errors": messages }));
    }

    serde_json::Value::Object(fields)
}

fn bad_request(error: &str, fields: serde_json::Value) -> actix_web::Error {
    let error_response = ErrorResponse {
        error: error.to_string(),
        fields,
    };
    actix_web::error::InternalError::from_response("", HttpResponse::BadRequest().json(error_response))
        .into()
}

/// Creates a configured JsonConfig with standardized error handling for the entire project
pub fn json_config(limit: usize) -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| match err {
            actix_web_validator::Error::Validate(validation_errors) => {
                bad_request("Validation failed", field_errors_json(&validation_errors))
            }
            actix_web_validator::Error::Deserialize(de_err) => {
                let err_string = de_err.to_string();

                let message = if err_string.contains("EOF while parsing") {
                    "Request body is empty. Expected JSON payload"
                } else if err_string.contains("invalid type") {
                    "Invalid field type. Check the expected type for each field"
                } else {
                    "Invalid JSON format"
                };

                bad_request(
                    "Request validation failed",
                    serde_json::json!({ "message": message }),
                )
            }
            _ => bad_request(
                "Validation failed",
                serde_json::json!({ "message": "Validation error" }),
            ),
        })
}
