use actix_web::{HttpResponse, Responder, web};
use tracing::{error, trace};

use super::AppState;
use super::helpers::internal_error;

pub struct HealthService;

impl HealthService {
    /// `GET /ping`：检查存储后端是否可用
    pub async fn ping(state: web::Data<AppState>) -> impl Responder {
        let storage = state.encoder.storage();

        match storage.ping().await {
            Ok(()) => {
                trace!("Ping ok ({})", storage.backend_name());
                HttpResponse::Ok().finish()
            }
            Err(e) => {
                error!("Storage ping failed ({}): {}", storage.backend_name(), e);
                internal_error()
            }
        }
    }
}
