/// HTTP middleware for the media upload service
///
/// `JwtAuth` guards the video routes: it validates the bearer credential
/// and stashes the caller's id as a request extension, which handlers pull
/// back out through the `UserId` extractor.
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, LocalBoxFuture, Ready};
use uuid::Uuid;

use crate::auth::TokenValidator;
use crate::error::AppError;

#[derive(Debug, Clone, Copy)]
pub struct UserId(pub Uuid);

pub struct JwtAuth {
    validator: Arc<TokenValidator>,
}

impl JwtAuth {
    pub fn new(validator: Arc<TokenValidator>) -> Self {
        Self { validator }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthService {
            service: Rc::new(service),
            validator: self.validator.clone(),
        }))
    }
}

pub struct JwtAuthService<S> {
    service: Rc<S>,
    validator: Arc<TokenValidator>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let validator = self.validator.clone();

        Box::pin(async move {
            let token = bearer_token(&req)?;
            let user_id = validator.validate(token)?;

            req.extensions_mut().insert(UserId(user_id));

            service.call(req).await
        })
    }
}

fn bearer_token(req: &ServiceRequest) -> Result<&str, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".to_string()))
}

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<UserId>()
                .copied()
                .ok_or_else(|| AppError::Unauthorized("User ID missing".to_string()).into()),
        )
    }
}

/// Logs method, path, status, and elapsed time for every request.
pub struct RequestTiming;

impl<S, B> Transform<S, ServiceRequest> for RequestTiming
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTimingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTimingService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestTimingService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestTimingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let path = req.path().to_string();
        let method = req.method().to_string();
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start.elapsed().as_millis();
            match &res {
                Ok(response) => {
                    let status = response.status().as_u16();
                    tracing::debug!(%method, %path, status, %elapsed, "request completed");
                }
                Err(_) => {
                    tracing::debug!(%method, %path, %elapsed, "request failed");
                }
            }
            res
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn bearer_token_requires_scheme() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic abc"))
            .to_srv_request();
        assert!(bearer_token(&req).is_err());
    }

    #[test]
    fn bearer_token_strips_prefix() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer tok123"))
            .to_srv_request();
        assert_eq!(bearer_token(&req).unwrap(), "tok123");
    }

    #[test]
    fn bearer_token_missing_header() {
        let req = TestRequest::default().to_srv_request();
        assert!(bearer_token(&req).is_err());
    }
}
