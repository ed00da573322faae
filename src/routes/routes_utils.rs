use super::*;
use config::config::ConfyConfig;
use manifest::error::{ManifestError, ServiceError};
use ODM::store::{ManifestStore, StoreError};

use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::response::status::Custom;
use rocket::serde::Serialize;

// Utils struct for rocket::manage
pub struct StoreState {
    pub store: Box<dyn ManifestStore>,
}

pub struct Config {
    pub config: ConfyConfig,
}

/// The JSON body of every error response
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct ErrorBody {
    pub error: String,
    /// The offending input field, for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// An error response: a status and a JSON body
#[derive(Debug)]
pub struct ApiError {
    pub status: Status,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new<T: Into<String>>(status: Status, error: T) -> ApiError {
        ApiError {
            status,
            body: ErrorBody { error: error.into(), field: None },
        }
    }
}

impl From<ManifestError> for ApiError {
    fn from(value: ManifestError) -> Self {
        let status = match &value {
            ManifestError::InvalidMonth { .. } => Status::BadRequest,
            ManifestError::Derivation(_) => Status::InternalServerError,
            _ => Status::UnprocessableEntity,
        };

        ApiError {
            status,
            body: ErrorBody {
                error: value.to_string(),
                field: value.field().map(|field| field.to_string()),
            },
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Manifest(inner) => inner.into(),
            ServiceError::Store(inner) => {
                let status = match &inner {
                    StoreError::NotFound(_) => Status::NotFound,
                    StoreError::InvalidId(_) => Status::BadRequest,
                    StoreError::Database(_) => Status::InternalServerError,
                };
                ApiError::new(status, inner.to_string())
            }
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        Custom(self.status, Json(self.body)).respond_to(request)
    }
}

/// Unwraps a JSON body, answering 400 when it could not be read
pub fn json_body<T>(body: Result<Json<T>, JsonError<'_>>) -> Result<T, ApiError> {
    match body {
        Ok(value) => Ok(value.into_inner()),
        Err(JsonError::Io(value)) => Err(ApiError::new(Status::BadRequest, format!("could not read body: {}", value))),
        Err(JsonError::Parse(_, value)) => Err(ApiError::new(Status::BadRequest, format!("malformed manifest: {}", value))),
    }
}
