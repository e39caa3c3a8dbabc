use fare_core::distance::{DistanceLookup, LookupError, TripQuery};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

/// Request body as sent by the app. Missing places deserialize as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct DistanceRequest {
    pickup: String,
    drop: String,
    stops: Vec<String>,
}

fn cors_headers() -> Value {
    json!({
        "Access-Control-Allow-Origin": CORS_ALLOW_ORIGIN,
        "Access-Control-Allow-Headers": CORS_ALLOW_HEADERS,
    })
}

fn json_headers() -> Value {
    let mut headers = cors_headers();
    headers["Content-Type"] = Value::from("application/json");
    headers
}

/// Answer one distance request.
///
/// `lookup` is `None` when no backend could be configured (missing API key),
/// which is reported as a server error after the CORS preflight check.
pub fn handle_distance_event(event: Value, lookup: Option<&dyn DistanceLookup>) -> ApiGatewayResponse {
    if request_method(&event).is_some_and(|method| method.eq_ignore_ascii_case("OPTIONS")) {
        return ApiGatewayResponse {
            status_code: 200,
            headers: cors_headers(),
            body: String::new(),
        };
    }

    let Some(lookup) = lookup else {
        error!("distance lookup is not configured");
        return error_response(500, json!({ "error": "API key not configured" }));
    };

    let payload = match normalize_apigw_event(event) {
        Ok(value) => value,
        Err(message) => return error_response(400, json!({ "error": message })),
    };

    let request = match serde_json::from_value::<DistanceRequest>(payload) {
        Ok(value) => value,
        Err(error) => {
            return error_response(400, json!({ "error": format!("Malformed request: {error}") }))
        }
    };

    let query = TripQuery {
        pickup: request.pickup,
        drop: request.drop,
        stops: request.stops,
    };
    if let Err(invalid) = query.validate() {
        return lookup_error_response(&invalid);
    }
    info!(pickup = %query.pickup, drop = %query.drop, stops = query.stops.len(), "calculating distance");

    match lookup.lookup(&query) {
        Ok(trip) => {
            info!(distance_km = trip.distance_km, "calculated distance");
            success_response(200, trip)
        }
        Err(lookup_error) => lookup_error_response(&lookup_error),
    }
}

fn lookup_error_response(lookup_error: &LookupError) -> ApiGatewayResponse {
    error!(error = %lookup_error, "distance lookup failed");
    match lookup_error {
        LookupError::InvalidQuery(message) => error_response(400, json!({ "error": message })),
        LookupError::Api { details, .. } => error_response(
            400,
            json!({
                "error": "Failed to calculate distance",
                "details": details,
            }),
        ),
        LookupError::NoRoute { .. } => error_response(
            400,
            json!({ "error": "No valid route found between these locations" }),
        ),
        LookupError::MissingEndpoint => {
            error_response(500, json!({ "error": "API key not configured" }))
        }
        LookupError::Http(message) | LookupError::MalformedResponse(message) => {
            error_response(500, json!({ "error": message }))
        }
    }
}

fn request_method(event: &Value) -> Option<&str> {
    event
        .get("httpMethod")
        .or_else(|| event.pointer("/requestContext/http/method"))
        .and_then(Value::as_str)
}

fn normalize_apigw_event(event: Value) -> Result<Value, String> {
    let Some(object) = event.as_object() else {
        return Err("Request payload must be a JSON object".to_string());
    };

    let Some(body) = object.get("body") else {
        return Ok(event);
    };

    match body {
        Value::Null => Ok(json!({})),
        Value::Object(_) => Ok(body.clone()),
        Value::String(text) => {
            serde_json::from_str(text).map_err(|error| format!("Malformed JSON body: {error}"))
        }
        _ => Err("Request body must be a JSON object".to_string()),
    }
}

fn success_response(status_code: u16, payload: impl Serialize) -> ApiGatewayResponse {
    match serde_json::to_string(&payload) {
        Ok(body) => ApiGatewayResponse {
            status_code,
            headers: json_headers(),
            body,
        },
        Err(error) => error_response(500, json!({ "error": error.to_string() })),
    }
}

fn error_response(status_code: u16, payload: Value) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json_headers(),
        body: payload.to_string(),
    }
}
