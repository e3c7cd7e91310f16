use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};

use beerstock_core::BeerId;

use crate::app::dto::{self, BeerResponse};
use crate::app::errors;
use crate::app::services::AppServices;

/// Routes under `/api/v1/beers`.
///
/// `GET /:key` looks a beer up by name while `DELETE /:key` removes it by id;
/// both share the single path segment.
pub fn router() -> Router {
    Router::new()
        .route("/", get(list_beers).post(create_beer))
        .route("/:key", get(find_by_name).delete(delete_by_id))
        .route("/:key/increment", patch(increment))
        .route("/:key/decrement", patch(decrement))
}

fn parse_id(raw: &str) -> Result<BeerId, axum::response::Response> {
    raw.parse::<BeerId>()
        .map_err(errors::domain_error_to_response)
}

pub async fn create_beer(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateBeerRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let input = match dto::to_new_beer(body) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.stock().create_beer(input).await {
        Ok(beer) => (StatusCode::CREATED, Json(BeerResponse::from(&beer))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn find_by_name(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match services.stock().find_by_name(&name).await {
        Ok(beer) => (StatusCode::OK, Json(BeerResponse::from(&beer))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_beers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.stock().list_all().await {
        Ok(beers) => {
            let body: Vec<BeerResponse> = beers.iter().map(BeerResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_by_id(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.stock().delete_by_id(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn increment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::QuantityRequest>, JsonRejection>,
) -> axum::response::Response {
    let (id, amount) = match adjustment_input(&id, body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.stock().increment(id, amount).await {
        Ok(beer) => (StatusCode::OK, Json(BeerResponse::from(&beer))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn decrement(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::QuantityRequest>, JsonRejection>,
) -> axum::response::Response {
    let (id, amount) = match adjustment_input(&id, body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.stock().decrement(id, amount).await {
        Ok(beer) => (StatusCode::OK, Json(BeerResponse::from(&beer))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

fn adjustment_input(
    raw_id: &str,
    body: Result<Json<dto::QuantityRequest>, JsonRejection>,
) -> Result<(BeerId, i64), axum::response::Response> {
    let id = parse_id(raw_id)?;
    let Json(body) = body.map_err(errors::json_rejection_to_response)?;
    let amount = dto::to_amount(body).map_err(errors::domain_error_to_response)?;
    Ok((id, amount))
}
