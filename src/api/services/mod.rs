pub mod health;
pub mod helpers;
pub mod history;
pub mod redirect;
pub mod shorten;

use actix_web::web;

use crate::services::Encoder;

pub use health::HealthService;
pub use history::{HistoryService, history_routes};
pub use redirect::{RedirectService, redirect_routes};
pub use shorten::{ShortenService, shorten_routes};

/// 所有 handler 共享的状态
#[derive(Clone)]
pub struct AppState {
    pub encoder: Encoder,
    /// 短链接前缀；为空时使用请求的 Host
    pub base_url: String,
}

impl AppState {
    pub fn new(encoder: Encoder, base_url: impl Into<String>) -> Self {
        Self {
            encoder,
            base_url: base_url.into(),
        }
    }
}

/// 注册全部路由；`/{code}` 必须最后注册
///
/// 每个路径注册为独立 resource，方法不匹配时返回 405 而不是 404。
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::post().to(ShortenService::shorten_text)))
        .service(web::resource("/ping").route(web::get().to(HealthService::ping)))
        .service(
            web::scope("/api")
                .service(shorten_routes())
                .service(history_routes()),
        )
        .service(redirect_routes());
}
