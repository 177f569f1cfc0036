//! Bearer token middleware for protected scopes.
//!
//! Verifies the `Authorization` header with the shared [`TokenVerifier`] and
//! stores the resulting [`IdentityClaims`] in request extensions. Requests
//! without a valid token never reach the handler; they are answered here with
//! the 401 error body.
//!
//! [`TokenVerifier`]: crate::auth::TokenVerifier

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::claims::IdentityClaims;
use crate::error::AppError;
use crate::logging::security;
use crate::state::app_state::AppState;

pub struct JwtExtract;

impl<S, B> Transform<S, ServiceRequest> for JwtExtract
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtExtractMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtExtractMiddleware { service }))
    }
}

pub struct JwtExtractMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for JwtExtractMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(app_state) = req.app_data::<web::Data<AppState>>().cloned() else {
            return Box::pin(async move {
                let err = AppError::internal("AppState not available");
                Ok(req.error_response(err).map_into_right_body())
            });
        };

        match app_state.verifier.verify_headers(req.headers()) {
            Ok(claims) => {
                req.extensions_mut().insert::<IdentityClaims>(claims);
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            // Rendered when polled, inside the request's trace scope.
            Err(e) => Box::pin(async move {
                security::auth_failed(&e, req.path());
                Ok(req.error_response(AppError::from(e)).map_into_right_body())
            }),
        }
    }
}
