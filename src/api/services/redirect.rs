use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, trace};

use super::AppState;
use super::helpers::bad_request;

pub struct RedirectService;

impl RedirectService {
    /// `GET /{code}`：已知短码 307 跳转，未知短码 400
    pub async fn handle_redirect(
        path: web::Path<String>,
        state: web::Data<AppState>,
    ) -> impl Responder {
        let code = path.into_inner();

        match state.encoder.decode(&code).await {
            Some(long_url) => {
                trace!("Redirecting {} -> {}", code, long_url);
                HttpResponse::TemporaryRedirect()
                    .content_type(ContentType::plaintext())
                    .insert_header((header::LOCATION, long_url))
                    .finish()
            }
            None => {
                debug!("Unknown short code: {}", code);
                bad_request()
            }
        }
    }
}

pub fn redirect_routes() -> actix_web::Resource {
    web::resource("/{code}")
        .route(web::get().to(RedirectService::handle_redirect))
        .route(web::head().to(RedirectService::handle_redirect))
}
