use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        FromRequest, FromRequestParts, OptionalFromRequestParts, Query, Request,
    },
    http::request::Parts,
    response::{IntoResponse, Response},
    Form,
};
use serde::de::DeserializeOwned;
use std::convert::Infallible;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedAdmin;

/// Query-string extractor that answers with the API error envelope
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppQueryRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppQueryRejection(rejection)),
        }
    }
}

pub struct AppQueryRejection(QueryRejection);

impl IntoResponse for AppQueryRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            QueryRejection::FailedToDeserializeQueryString(err) => {
                format!("Invalid query parameters: {}", err.body_text())
            }
            _ => "Failed to parse query parameters".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

/// URL-encoded form extractor that answers with the API error envelope
pub struct AppForm<T>(pub T);

impl<T, S> FromRequest<S> for AppForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppFormRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppFormRejection(rejection)),
        }
    }
}

pub struct AppFormRejection(FormRejection);

impl IntoResponse for AppFormRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            FormRejection::FailedToDeserializeForm(err) => {
                format!("Invalid form data: {}", err.body_text())
            }
            FormRejection::FailedToDeserializeFormBody(err) => {
                format!("Invalid form data: {}", err.body_text())
            }
            FormRejection::InvalidFormContentType(err) => {
                format!("Invalid form content type: {}", err.body_text())
            }
            _ => "Failed to parse form data".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

/// Set by the admin middleware; routes mounted without it see `None`
impl<S> OptionalFromRequestParts<S> for AuthenticatedAdmin
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthenticatedAdmin>().cloned())
    }
}
