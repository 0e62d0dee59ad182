use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::model::vacation::Vacation;
use crate::service::vacation::{VacationError, VacationService};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({ "error": "Approval error: Vacation(1) already approved" }))]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let error = if message.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            message
        };
        Self { error }
    }
}

// Every service failure is a 400 with {"error": ...}
impl ResponseError for VacationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        let body = ErrorBody::new(self.to_string());
        warn!(error = %body.error, "Vacation request failed");
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Malformed JSON bodies answer like business errors do.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorBody::new(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorBody::new(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

/// Collects every `username` value of a query string, in order.
fn usernames_from_query(query: &str) -> Vec<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == "username")
        .map(|(_, value)| value.into_owned())
        .collect()
}

/* =========================
Request vacation
========================= */
#[utoipa::path(
    post,
    path = "/vacations",
    request_body(
        content = Vacation,
        description = "Vacation request, status must be CREATED",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Vacation requested", body = Vacation),
        (status = 400, description = "Status other than CREATED or malformed body", body = ErrorBody,
         example = json!({ "error": "Request error: not allowed status" }))
    ),
    tag = "Vacation"
)]
pub async fn create_vacation(
    service: web::Data<VacationService>,
    payload: web::Json<Vacation>,
) -> Result<HttpResponse, VacationError> {
    let created = service.create_request(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

/* =========================
Search vacations
========================= */
#[utoipa::path(
    get,
    path = "/vacations",
    params(
        ("username" = Option<Vec<String>>, Query,
         description = "Case-insensitive username fragment, repeatable. Omit to list all")
    ),
    responses(
        (status = 200, description = "Matching vacations, per filter in id order", body = [Vacation])
    ),
    tag = "Vacation"
)]
pub async fn search_vacations(
    service: web::Data<VacationService>,
    req: HttpRequest,
) -> Result<HttpResponse, VacationError> {
    let usernames = usernames_from_query(req.query_string());
    let found = service.search(usernames.as_slice()).await?;
    Ok(HttpResponse::Ok().json(found))
}

#[utoipa::path(
    get,
    path = "/vacations/{id}",
    params(
        ("id" = u64, Path, description = "Vacation id")
    ),
    responses(
        (status = 200, description = "Vacation found", body = Vacation),
        (status = 404, description = "No vacation with this id")
    ),
    tag = "Vacation"
)]
pub async fn get_vacation(
    service: web::Data<VacationService>,
    path: web::Path<u64>,
) -> Result<HttpResponse, VacationError> {
    match service.get_by_id(path.into_inner()).await? {
        Some(vacation) => Ok(HttpResponse::Ok().json(vacation)),
        None => Ok(HttpResponse::NotFound().finish()),
    }
}

/* =========================
Approve vacation
========================= */
#[utoipa::path(
    put,
    path = "/vacations/{id}",
    params(
        ("id" = u64, Path, description = "ID of the vacation to approve")
    ),
    responses(
        (status = 202, description = "Vacation approved", body = Vacation),
        (status = 400, description = "Vacation not found or already approved", body = ErrorBody,
         example = json!({ "error": "Approval error: Vacation(1) already approved" }))
    ),
    tag = "Vacation"
)]
pub async fn approve_vacation(
    service: web::Data<VacationService>,
    path: web::Path<u64>,
) -> Result<HttpResponse, VacationError> {
    let approved = service.approve(path.into_inner()).await?;
    Ok(HttpResponse::Accepted().json(approved))
}

/* =========================
Decline vacation
========================= */
#[utoipa::path(
    delete,
    path = "/vacations/{id}",
    params(
        ("id" = u64, Path, description = "ID of the vacation to decline")
    ),
    responses(
        (status = 202, description = "Vacation declined", body = Vacation),
        (status = 400, description = "Vacation not found or already declined", body = ErrorBody,
         example = json!({ "error": "Decline error: Vacation(1) already declined" }))
    ),
    tag = "Vacation"
)]
pub async fn decline_vacation(
    service: web::Data<VacationService>,
    path: web::Path<u64>,
) -> Result<HttpResponse, VacationError> {
    let declined = service.decline(path.into_inner()).await?;
    Ok(HttpResponse::Accepted().json(declined))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn repeated_username_params_are_kept_in_order() {
        assert_eq!(
            usernames_from_query("username=ololo&page=2&username=Tro%20lolo&username="),
            ["ololo", "Tro lolo", ""]
        );
        assert!(usernames_from_query("").is_empty());
    }

    #[test]
    fn blank_messages_become_unknown_error() {
        assert_eq!(ErrorBody::new("").error, "Unknown error");
        assert_eq!(ErrorBody::new("boom").error, "boom");
    }

    #[test]
    fn store_failures_are_bad_requests() {
        let err = VacationError::from(StoreError::Unavailable(String::new()));

        let response = err.error_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
