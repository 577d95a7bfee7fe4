use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use uuid::Uuid;

use crate::auth::claims::AuthenticatedUser;
use crate::error::AppError;

/// The caller's resolved identity for this request.
///
/// Reads the typed value the session guard wrote into request extensions;
/// no store access happens here. Only available on routes wrapped with the
/// guard — elsewhere extraction fails with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let identity = req.extensions().get::<AuthenticatedUser>().cloned();

        ready(match identity {
            Some(user) => Ok(CurrentUser {
                id: user.id,
                email: user.email,
            }),
            None => Err(AppError::missing_token()),
        })
    }
}
