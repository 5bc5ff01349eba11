use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use tracing::error;

use super::AppState;
use super::helpers::{internal_error, short_url};
use crate::storage::OwnerId;

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryItem {
    pub short_url: String,
    pub original_url: String,
}

pub struct HistoryService;

impl HistoryService {
    /// `GET /api/user/urls`，按短码排序
    pub async fn user_urls(
        req: HttpRequest,
        owner: OwnerId,
        state: web::Data<AppState>,
    ) -> impl Responder {
        let history = match state.encoder.history(owner).await {
            Ok(history) => history,
            Err(e) => {
                error!("Failed to load history for {}: {}", owner, e);
                return internal_error();
            }
        };

        if history.is_empty() {
            return HttpResponse::NoContent().finish();
        }

        let mut entries: Vec<(String, String)> = history.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let items: Vec<HistoryItem> = entries
            .into_iter()
            .map(|(short, long)| HistoryItem {
                short_url: short_url(&req, &state.base_url, &short),
                original_url: long,
            })
            .collect();

        HttpResponse::Ok().json(items)
    }
}

pub fn history_routes() -> actix_web::Scope {
    web::scope("/user")
        .service(web::resource("/urls").route(web::get().to(HistoryService::user_urls)))
}
