use fare_core::distance::matrix::DistanceMatrixClient;
use fare_core::distance::{DistanceLookup, DEFAULT_MATRIX_ENDPOINT};
use fare_distance_lambda::handler::{handle_distance_event, ApiGatewayResponse};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Environment read once per invocation.
struct LookupSettings {
    api_key: Option<String>,
    endpoint: String,
}

impl LookupSettings {
    fn from_env() -> Self {
        Self {
            api_key: std::env::var("GOOGLE_MAPS_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            endpoint: std::env::var("DISTANCE_MATRIX_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_MATRIX_ENDPOINT.to_string()),
        }
    }
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    let settings = LookupSettings::from_env();

    // The blocking HTTP client must be built, used and dropped off the async
    // executor threads.
    let response = tokio::task::block_in_place(move || {
        let client = match settings.api_key.as_deref() {
            Some(api_key) => match DistanceMatrixClient::with_endpoint(&settings.endpoint, api_key)
            {
                Ok(client) => Some(client),
                Err(build_error) => {
                    error!(error = %build_error, "failed to build distance matrix client");
                    None
                }
            },
            None => None,
        };
        handle_distance_event(
            event.payload,
            client.as_ref().map(|client| client as &dyn DistanceLookup),
        )
    });
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .without_time()
        .init();

    lambda_runtime::run(service_fn(handle_request)).await
}
