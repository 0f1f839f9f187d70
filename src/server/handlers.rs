use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::optimizer::{DeliveryPoint, OptimizeError, OptimizedRoute};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── POST /api/routes/calculate ──────────────────────────────────

#[derive(Deserialize)]
pub struct CalculateRequest {
    pub points: Vec<DeliveryPoint>,
}

pub async fn calculate_route(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CalculateRequest>,
) -> Result<Json<OptimizedRoute>, Response> {
    let start = Instant::now();

    if req.points.len() < 2 {
        return Err(
            api_error(StatusCode::BAD_REQUEST, "At least 2 points are required").into_response()
        );
    }

    let result = {
        let mut optimizer = state.optimizer.lock().unwrap();
        optimizer.optimize(&req.points)
    };

    let route = match result {
        Ok(route) => route,
        Err(e @ OptimizeError::InvalidPoint { .. }) => {
            return Err(api_error(StatusCode::BAD_REQUEST, format!("{}", e)).into_response());
        }
        Err(e) => {
            return Err(
                api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("{}", e)).into_response()
            );
        }
    };

    let elapsed = start.elapsed();
    eprintln!(
        "[{}] POST /api/routes/calculate {} points -> {} km ({:.1}ms)",
        Utc::now().format("%H:%M:%S"),
        req.points.len(),
        route.total_distance,
        elapsed.as_secs_f64() * 1000.0,
    );

    Ok(Json(route))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_request_parses() {
        let body = r#"{
            "points": [
                {"name": "Depot", "address": "Av. Beira Mar, 4260"},
                {"name": "Client", "address": "Rua Major Facundo, 500",
                 "latitude": -3.73, "longitude": -38.52}
            ]
        }"#;
        let req: CalculateRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.points.len(), 2);
        assert_eq!(req.points[0].latitude, None);
        assert_eq!(req.points[1].latitude, Some(-3.73));
    }

    #[test]
    fn test_error_body_shape() {
        let body = ApiErrorBody {
            error: "At least 2 points are required".into(),
            code: 400,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], 400);
        assert_eq!(json["error"], "At least 2 points are required");
    }
}
