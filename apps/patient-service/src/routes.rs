use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;
use uuid::Uuid;

use crate::error::AppError;
use crate::repos::patients::{Patient, PatientCreate, PatientUpdate};
use crate::state::app_state::AppState;

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub date_of_birth: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub address: String,
    pub date_of_birth: String,
}

impl From<Patient> for PatientResponse {
    fn from(p: Patient) -> Self {
        let date_of_birth = p
            .date_of_birth
            .format(DATE_FORMAT)
            .unwrap_or_else(|_| p.date_of_birth.to_string());
        Self {
            id: p.id.to_string(),
            name: p.name,
            email: p.email,
            address: p.address,
            date_of_birth,
        }
    }
}

impl PatientRequest {
    fn validated_fields(&self) -> Result<(String, String, String, Date), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::bad_request(
                "INVALID_NAME",
                "Name cannot be empty".to_string(),
            ));
        }
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err(AppError::bad_request(
                "INVALID_EMAIL",
                "A valid email is required".to_string(),
            ));
        }
        if self.address.trim().is_empty() {
            return Err(AppError::bad_request(
                "INVALID_ADDRESS",
                "Address cannot be empty".to_string(),
            ));
        }
        let date_of_birth = Date::parse(&self.date_of_birth, DATE_FORMAT).map_err(|_| {
            AppError::bad_request(
                "INVALID_DATE_OF_BIRTH",
                "Date of birth must be formatted as YYYY-MM-DD".to_string(),
            )
        })?;
        Ok((
            self.name.trim().to_string(),
            self.email.trim().to_string(),
            self.address.trim().to_string(),
            date_of_birth,
        ))
    }

    fn into_create(self) -> Result<PatientCreate, AppError> {
        let (name, email, address, date_of_birth) = self.validated_fields()?;
        Ok(PatientCreate {
            name,
            email,
            address,
            date_of_birth,
        })
    }

    fn into_update(self) -> Result<PatientUpdate, AppError> {
        let (name, email, address, date_of_birth) = self.validated_fields()?;
        Ok(PatientUpdate {
            name,
            email,
            address,
            date_of_birth,
        })
    }
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| {
        AppError::bad_request("INVALID_ID", format!("Not a valid patient id: {raw}"))
    })
}

async fn list_patients(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let patients = app_state.patients.list().await?;
    let body: Vec<PatientResponse> = patients.into_iter().map(PatientResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn get_patient(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    let patient = app_state.patients.get(id).await?;
    Ok(HttpResponse::Ok().json(PatientResponse::from(patient)))
}

async fn create_patient(
    req: web::Json<PatientRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let data = req.into_inner().into_create()?;
    let patient = app_state.patients.create(data).await?;
    Ok(HttpResponse::Ok().json(PatientResponse::from(patient)))
}

async fn update_patient(
    path: web::Path<String>,
    req: web::Json<PatientRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    let changes = req.into_inner().into_update()?;
    let patient = app_state.patients.update(id, changes).await?;
    Ok(HttpResponse::Ok().json(PatientResponse::from(patient)))
}

async fn delete_patient(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    app_state.patients.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/patients")
            .route("", web::get().to(list_patients))
            .route("", web::post().to(create_patient))
            .route("/{id}", web::get().to(get_patient))
            .route("/{id}", web::put().to(update_patient))
            .route("/{id}", web::delete().to(delete_patient)),
    )
    .configure(crate::health::configure_routes);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use serde_json::json;

    use super::configure;
    use crate::services::patients::PatientService;
    use crate::state::app_state::AppState;
    use crate::test_support::{
        sample_patient, InMemoryPatientRepo, RecordingBilling, RecordingPublisher,
    };

    fn state_with_repo(repo: Arc<InMemoryPatientRepo>) -> AppState {
        let svc = PatientService::new(
            repo,
            Arc::new(RecordingBilling::succeeding()),
            Arc::new(RecordingPublisher::succeeding()),
        );
        AppState::without_db(Arc::new(svc))
    }

    fn valid_payload(email: &str) -> serde_json::Value {
        json!({
            "name": "Jane Roe",
            "email": email,
            "address": "1 Test Lane",
            "dateOfBirth": "1990-01-15"
        })
    }

    macro_rules! init_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .wrap(mesh_web::middleware::request_trace::RequestTrace)
                    .app_data(web::Data::new($state))
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn create_returns_record_with_camel_case_fields() {
        let app = init_app!(state_with_repo(Arc::new(InMemoryPatientRepo::new())));

        let req = test::TestRequest::post()
            .uri("/patients")
            .set_json(valid_payload("jane@example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["email"], "jane@example.com");
        assert_eq!(body["dateOfBirth"], "1990-01-15");
        assert!(body["id"].as_str().is_some());
    }

    #[actix_web::test]
    async fn create_duplicate_email_returns_409_problem() {
        let repo = Arc::new(InMemoryPatientRepo::with_rows(vec![sample_patient(
            "First",
            "jane@example.com",
        )]));
        let app = init_app!(state_with_repo(repo));

        let req = test::TestRequest::post()
            .uri("/patients")
            .set_json(valid_payload("jane@example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        test_support::problem_details::assert_problem_details_from_service_response(
            resp,
            "EMAIL_ALREADY_EXISTS",
            StatusCode::CONFLICT,
            Some("jane@example.com"),
        )
        .await;
    }

    #[actix_web::test]
    async fn create_rejects_blank_name() {
        let app = init_app!(state_with_repo(Arc::new(InMemoryPatientRepo::new())));

        let req = test::TestRequest::post()
            .uri("/patients")
            .set_json(json!({
                "name": "  ",
                "email": "jane@example.com",
                "address": "1 Test Lane",
                "dateOfBirth": "1990-01-15"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn create_rejects_unparseable_date() {
        let app = init_app!(state_with_repo(Arc::new(InMemoryPatientRepo::new())));

        let req = test::TestRequest::post()
            .uri("/patients")
            .set_json(json!({
                "name": "Jane Roe",
                "email": "jane@example.com",
                "address": "1 Test Lane",
                "dateOfBirth": "15/01/1990"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn get_unknown_id_returns_404() {
        let app = init_app!(state_with_repo(Arc::new(InMemoryPatientRepo::new())));

        let req = test::TestRequest::get()
            .uri("/patients/5a3e0a59-9c5a-4c4e-9e22-6a4a5ad0a000")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn get_malformed_id_returns_400() {
        let app = init_app!(state_with_repo(Arc::new(InMemoryPatientRepo::new())));

        let req = test::TestRequest::get()
            .uri("/patients/not-a-uuid")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn list_returns_every_row() {
        let repo = Arc::new(InMemoryPatientRepo::with_rows(vec![
            sample_patient("A", "a@example.com"),
            sample_patient("B", "b@example.com"),
        ]));
        let app = init_app!(state_with_repo(repo));

        let req = test::TestRequest::get().uri("/patients").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn update_returns_updated_record() {
        let existing = sample_patient("Jane Roe", "jane@example.com");
        let id = existing.id;
        let repo = Arc::new(InMemoryPatientRepo::with_rows(vec![existing]));
        let app = init_app!(state_with_repo(repo));

        let req = test::TestRequest::put()
            .uri(&format!("/patients/{id}"))
            .set_json(valid_payload("jane.new@example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["email"], "jane.new@example.com");
        assert_eq!(body["id"], id.to_string());
    }

    #[actix_web::test]
    async fn delete_returns_204_even_when_absent() {
        let app = init_app!(state_with_repo(Arc::new(InMemoryPatientRepo::new())));

        let req = test::TestRequest::delete()
            .uri("/patients/5a3e0a59-9c5a-4c4e-9e22-6a4a5ad0a000")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }
}
