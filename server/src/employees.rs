//! Handlers for the `/employee` and `/employees` routes.
//!
//! Each handler takes the store lock first and keeps it until the response
//! body has been encoded.

use axum::{
    body::Bytes,
    extract::{Path, Query, State, rejection::PathRejection},
    http::header,
    response::{IntoResponse, Response},
};
use products_hr::{
    EmployeeId, HrError, HrResult, PageRequest, decode_employee, parse_employee_id,
};
use serde_json::to_vec;
use tracing::info;

use crate::http::{AppState, HttpError, HttpResult};

pub(crate) async fn list_employees(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> HttpResult<Response> {
    let records = state.store.read().await;
    let request = PageRequest::from_query(
        query_value(&params, "page"),
        query_value(&params, "limit"),
    );
    let employees = records.page(request);
    json_response(&employees)
}

pub(crate) async fn get_employee(
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
) -> HttpResult<Response> {
    let records = state.store.read().await;
    let id = path_id(raw_id)?;
    json_response(records.get(id)?)
}

pub(crate) async fn create_employee(
    State(state): State<AppState>,
    body: Bytes,
) -> HttpResult<Response> {
    let mut records = state.store.write().await;
    let employee = decode_employee(&body)?;
    let created = records.create(employee);
    info!(id = created.id, total = records.len(), "employee created");
    json_response(&created)
}

pub(crate) async fn update_employee(
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> HttpResult<Response> {
    let mut records = state.store.write().await;
    // The body is decoded before the path id is checked.
    let employee = decode_employee(&body)?;
    let id = path_id(raw_id)?;
    let updated = records.replace(id, employee)?;
    info!(id, stored_id = updated.id, "employee replaced");
    json_response(&updated)
}

pub(crate) async fn delete_employee(
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
) -> HttpResult<Response> {
    let mut records = state.store.write().await;
    let id = path_id(raw_id)?;
    records.remove(id)?;
    info!(id, total = records.len(), "employee deleted");
    Ok(format!("Employee with ID {id} deleted").into_response())
}

/// Parse the `{id}` segment. A segment that does not even percent-decode is
/// reported the same way as a non-numeric one.
fn path_id(raw_id: Result<Path<String>, PathRejection>) -> HrResult<EmployeeId> {
    match raw_id {
        Ok(Path(raw)) => parse_employee_id(&raw),
        Err(rejection) => Err(HrError::InvalidId(rejection.body_text())),
    }
}

/// First value supplied for `key`; later repeats are ignored.
fn query_value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

fn json_response<T: serde::Serialize + ?Sized>(value: &T) -> HttpResult<Response> {
    let body = to_vec(value).map_err(|err| HttpError::internal(err.into()))?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
