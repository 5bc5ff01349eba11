use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::http::header::ContentType;

/// 拼接完整短链接；base_url 为空时使用请求的 Host
pub fn short_url(req: &HttpRequest, base_url: &str, code: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.is_empty() {
        format!("http://{}/{}", req.connection_info().host(), code)
    } else {
        format!("{}/{}", base, code)
    }
}

pub fn bad_request() -> HttpResponse {
    HttpResponse::BadRequest()
        .content_type(ContentType::plaintext())
        .body("400 bad request")
}

pub fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError()
        .content_type(ContentType::plaintext())
        .body("500 internal server error")
}
