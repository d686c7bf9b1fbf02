//! # Request Boundary
//!
//! JSON request/response handling for the two table operations. Request
//! bodies are deserialized into structs whose fields are all optional, then
//! checked field by field so that a missing or zero value becomes an
//! `InvalidInput` error naming the field instead of a parse failure or a
//! `NaN` in the table.
//!
//! | Endpoint | Body | Result `mode` |
//! |----------|------|---------------|
//! | `iso`    | `guide_number`, `iso_values`, `f_stops`, `units` | `iso` |
//! | `power`  | `guide_number`, `iso`, `power_ratios`, `f_stops`, `units` | `power` |
//!
//! ## Example
//!
//! ```rust
//! use flash_core::api::handle_request;
//!
//! let response = handle_request(
//!     "iso",
//!     r#"{"guide_number": 32, "iso_values": [100], "f_stops": [4], "units": "meters"}"#,
//! );
//! assert_eq!(response.status, 200);
//! assert_eq!(response.body["data"][0][0], 8.0);
//!
//! let response = handle_request("iso", r#"{"iso_values": [100], "f_stops": [4]}"#);
//! assert_eq!(response.status, 400);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::calculations::{iso_table, power_table, CalculationResult, IsoTableInput, PowerTableInput};
use crate::errors::{FlashError, FlashResult};
use crate::units::DistanceUnit;

/// The two table operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// Distance vs. ISO
    Iso,
    /// Distance vs. power ratio
    Power,
}

impl Endpoint {
    /// Route path as served over HTTP
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Iso => "/api/iso",
            Endpoint::Power => "/api/power",
        }
    }

    /// Short name ("iso", "power")
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Iso => "iso",
            Endpoint::Power => "power",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches('/') {
            "iso" | "/api/iso" => Ok(Endpoint::Iso),
            "power" | "/api/power" => Ok(Endpoint::Power),
            other => Err(format!("Unknown endpoint: {other}")),
        }
    }
}

/// Body of an `iso` request as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IsoTableRequest {
    pub guide_number: Option<f64>,
    pub iso_values: Option<Vec<f64>>,
    pub f_stops: Option<Vec<f64>>,
    pub units: Option<DistanceUnit>,
}

impl IsoTableRequest {
    /// Check field presence and the f-stop ordering, then convert to a
    /// validated calculation input.
    pub fn validate(self) -> FlashResult<IsoTableInput> {
        let guide_number = require_field("guide_number", self.guide_number)?;
        let iso_values = require_field("iso_values", self.iso_values)?;
        let f_stops = require_field("f_stops", self.f_stops)?;
        require_increasing("f_stops", &f_stops)?;

        let input = IsoTableInput {
            guide_number,
            iso_values,
            f_stops,
            units: self.units.unwrap_or_default(),
        };
        input.validate()?;
        Ok(input)
    }
}

/// Body of a `power` request as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerTableRequest {
    pub guide_number: Option<f64>,
    pub iso: Option<f64>,
    pub power_ratios: Option<Vec<f64>>,
    pub f_stops: Option<Vec<f64>>,
    pub units: Option<DistanceUnit>,
}

impl PowerTableRequest {
    /// Check field presence and the f-stop ordering, then convert to a
    /// validated calculation input.
    pub fn validate(self) -> FlashResult<PowerTableInput> {
        let guide_number = require_field("guide_number", self.guide_number)?;
        let iso = require_field("iso", self.iso)?;
        let power_ratios = require_field("power_ratios", self.power_ratios)?;
        let f_stops = require_field("f_stops", self.f_stops)?;
        require_increasing("f_stops", &f_stops)?;

        let input = PowerTableInput {
            guide_number,
            iso,
            power_ratios,
            f_stops,
            units: self.units.unwrap_or_default(),
        };
        input.validate()?;
        Ok(input)
    }
}

/// Response handed back across the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP-style status (200, 400, 404, 500)
    pub status: u16,
    /// Either a `CalculationResult` or an error object
    pub body: Value,
}

impl ApiResponse {
    /// Whether the request succeeded
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    fn ok(result: &CalculationResult) -> Self {
        match serde_json::to_value(result) {
            Ok(body) => ApiResponse { status: 200, body },
            Err(e) => ApiResponse::from_error(&FlashError::from(e)),
        }
    }

    fn not_found(endpoint: &str) -> Self {
        ApiResponse {
            status: 404,
            body: json!({ "error": format!("Unknown endpoint: {endpoint}"), "code": "NOT_FOUND" }),
        }
    }

    /// Build the error response for a failed request.
    ///
    /// Client errors echo the message and field. Internal errors are logged
    /// and answered with a generic message.
    pub fn from_error(error: &FlashError) -> Self {
        let body = if error.is_client_error() {
            let mut body = json!({ "error": error.to_string(), "code": error.error_code() });
            if let Some(field) = error.field() {
                body["field"] = json!(field);
            }
            body
        } else {
            log::error!("Request failed: {error}");
            json!({ "error": "Internal server error", "code": error.error_code() })
        };
        ApiResponse {
            status: error.status_code(),
            body,
        }
    }
}

/// One line of the line-delimited RPC stream: an endpoint name and its body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub endpoint: String,
    #[serde(default)]
    pub body: Value,
}

/// Run one operation against a JSON value body.
pub fn dispatch(endpoint: Endpoint, body: Value) -> FlashResult<CalculationResult> {
    match endpoint {
        Endpoint::Iso => {
            let request: IsoTableRequest = serde_json::from_value(body)?;
            iso_table::calculate(&request.validate()?)
        }
        Endpoint::Power => {
            let request: PowerTableRequest = serde_json::from_value(body)?;
            power_table::calculate(&request.validate()?)
        }
    }
}

/// Handle a request given the endpoint name and a raw JSON body.
pub fn handle_request(endpoint: &str, body: &str) -> ApiResponse {
    let Ok(route) = endpoint.parse::<Endpoint>() else {
        log::warn!("Rejected request for unknown endpoint '{endpoint}'");
        return ApiResponse::not_found(endpoint);
    };

    let outcome = serde_json::from_str::<Value>(body)
        .map_err(FlashError::from)
        .and_then(|value| dispatch(route, value));
    respond(route, outcome)
}

/// Handle one line of the RPC stream (`{"endpoint": "...", "body": {...}}`).
pub fn handle_rpc_line(line: &str) -> ApiResponse {
    match serde_json::from_str::<RpcRequest>(line) {
        Ok(rpc) => match rpc.endpoint.parse::<Endpoint>() {
            Ok(route) => respond(route, dispatch(route, rpc.body)),
            Err(_) => {
                log::warn!("Rejected request for unknown endpoint '{}'", rpc.endpoint);
                ApiResponse::not_found(&rpc.endpoint)
            }
        },
        Err(e) => ApiResponse::from_error(&FlashError::from(e)),
    }
}

fn respond(route: Endpoint, outcome: FlashResult<CalculationResult>) -> ApiResponse {
    match outcome {
        Ok(result) => ApiResponse::ok(&result),
        Err(e) => {
            if e.is_client_error() {
                log::warn!("Rejected {} request: {e}", route.path());
            }
            ApiResponse::from_error(&e)
        }
    }
}

fn require_field<T>(field: &str, value: Option<T>) -> FlashResult<T> {
    value.ok_or_else(|| FlashError::missing_field(field))
}

fn require_increasing(field: &str, values: &[f64]) -> FlashResult<()> {
    match values.windows(2).position(|w| w[0] >= w[1]) {
        Some(i) => Err(FlashError::invalid_input(
            format!("{field}[{}]", i + 1),
            values[i + 1].to_string(),
            "F-stops must be strictly increasing",
        )),
        None => Ok(()),
    }
}
