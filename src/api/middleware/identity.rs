//! Visitor identity middleware
//!
//! 读取身份 Cookie，无效或缺失时分配新身份；响应时刷新 Cookie。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::identity::IdentityCodec;
use crate::storage::OwnerId;

/// Identity 中间件工厂
#[derive(Clone)]
pub struct IdentityMiddleware {
    codec: Arc<IdentityCodec>,
}

impl IdentityMiddleware {
    pub fn new(codec: Arc<IdentityCodec>) -> Self {
        Self { codec }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityService {
            service: Rc::new(service),
            codec: self.codec.clone(),
        }))
    }
}

pub struct IdentityService<S> {
    service: Rc<S>,
    codec: Arc<IdentityCodec>,
}

impl<S> IdentityService<S> {
    fn resolve_owner(&self, req: &ServiceRequest) -> OwnerId {
        let Some(cookie) = req.cookie(self.codec.cookie_name()) else {
            return OwnerId::generate();
        };

        match self.codec.verify(cookie.value()) {
            Ok(owner) => owner,
            Err(e) => {
                debug!("Rejected identity cookie: {}", e);
                OwnerId::generate()
            }
        }
    }
}

impl<S, B> Service<ServiceRequest> for IdentityService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let codec = self.codec.clone();

        let owner = self.resolve_owner(&req);
        req.extensions_mut().insert(owner);

        Box::pin(async move {
            let mut response = srv.call(req).await?;

            // 每次响应都重新签发，刷新过期时间
            match codec.issue(owner) {
                Ok(token) => {
                    let cookie = codec.build_cookie(token);
                    if let Err(e) = response.response_mut().add_cookie(&cookie) {
                        warn!("Failed to attach identity cookie: {}", e);
                    }
                }
                Err(e) => warn!("Failed to issue identity token: {}", e),
            }

            Ok(response)
        })
    }
}
