use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use super::AppState;
use super::helpers::{bad_request, internal_error, short_url};
use crate::errors::SnaplinkError;
use crate::services::EncodeError;
use crate::storage::OwnerId;

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub result: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequestItem {
    pub correlation_id: String,
    pub original_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchResponseItem {
    pub correlation_id: String,
    pub short_url: String,
}

/// Encode 的结果：新建或已存在
enum Shortened {
    Created(String),
    Existing(String),
}

pub struct ShortenService;

impl ShortenService {
    /// `POST /`，请求体为原始 URL 文本
    pub async fn shorten_text(
        req: HttpRequest,
        owner: OwnerId,
        body: web::Bytes,
        state: web::Data<AppState>,
    ) -> impl Responder {
        let Some(long_url) = parse_text_body(&body) else {
            debug!("Rejected non UTF-8 body");
            return bad_request();
        };

        match Self::shorten(&state, owner, long_url).await {
            Ok(Shortened::Created(code)) => HttpResponse::Created()
                .content_type(ContentType::plaintext())
                .body(short_url(&req, &state.base_url, &code)),
            Ok(Shortened::Existing(code)) => HttpResponse::Conflict()
                .content_type(ContentType::plaintext())
                .body(short_url(&req, &state.base_url, &code)),
            Err(response) => response,
        }
    }

    /// `POST /api/shorten`，请求体 `{"url": "..."}`
    pub async fn shorten_json(
        req: HttpRequest,
        owner: OwnerId,
        body: web::Bytes,
        state: web::Data<AppState>,
    ) -> impl Responder {
        let request: ShortenRequest = match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(e) => {
                debug!("Rejected shorten request: {}", e);
                return bad_request();
            }
        };
        match Self::shorten(&state, owner, &request.url).await {
            Ok(Shortened::Created(code)) => HttpResponse::Created().json(ShortenResponse {
                result: short_url(&req, &state.base_url, &code),
            }),
            Ok(Shortened::Existing(code)) => HttpResponse::Conflict().json(ShortenResponse {
                result: short_url(&req, &state.base_url, &code),
            }),
            Err(response) => response,
        }
    }

    /// `POST /api/shorten/batch`
    ///
    /// 已存在的 URL 直接返回原短码；任意一项存储失败则整体返回 500。
    pub async fn shorten_batch(
        req: HttpRequest,
        owner: OwnerId,
        body: web::Bytes,
        state: web::Data<AppState>,
    ) -> impl Responder {
        let items: Vec<BatchRequestItem> = match serde_json::from_slice(&body) {
            Ok(items) => items,
            Err(e) => {
                debug!("Rejected batch request: {}", e);
                return bad_request();
            }
        };
        if items.iter().any(|item| is_blank(&item.original_url)) {
            return bad_request();
        }

        let mut output = Vec::with_capacity(items.len());
        for item in items {
            let code = match Self::shorten(&state, owner, &item.original_url).await {
                Ok(Shortened::Created(code)) | Ok(Shortened::Existing(code)) => code,
                Err(response) => return response,
            };
            output.push(BatchResponseItem {
                correlation_id: item.correlation_id,
                short_url: short_url(&req, &state.base_url, &code),
            });
        }

        trace!("Batch shortened {} URLs", output.len());
        HttpResponse::Created().json(output)
    }

    async fn shorten(
        state: &AppState,
        owner: OwnerId,
        long_url: &str,
    ) -> Result<Shortened, HttpResponse> {
        match state.encoder.encode(owner, long_url).await {
            Ok(code) => Ok(Shortened::Created(code)),
            Err(EncodeError::Conflict(existing)) => {
                debug!("URL already shortened as {}", existing.short);
                Ok(Shortened::Existing(existing.short))
            }
            Err(EncodeError::Failed(SnaplinkError::Validation(msg))) => {
                debug!("Rejected URL: {}", msg);
                Err(bad_request())
            }
            Err(EncodeError::Failed(e)) => {
                error!("Failed to shorten URL: {}", e);
                Err(internal_error())
            }
        }
    }
}

/// URL 原样存储，空白内容由 Encoder 拒绝
fn parse_text_body(body: &[u8]) -> Option<&str> {
    std::str::from_utf8(body).ok()
}

fn is_blank(url: &str) -> bool {
    url.trim().is_empty()
}

pub fn shorten_routes() -> actix_web::Scope {
    web::scope("/shorten")
        .service(web::resource("").route(web::post().to(ShortenService::shorten_json)))
        .service(web::resource("/batch").route(web::post().to(ShortenService::shorten_batch)))
}
