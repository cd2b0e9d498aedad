//! Static HTML console served at `/`.

use actix_web::{HttpRequest, HttpResponse, get, http::header::ContentType, web};

use crate::domain::rate_limit::Operation;
use crate::inbound::http::ApiResult;

use super::rate_limit::admit;
use super::state::HttpState;

const CONSOLE_PAGE: &str = include_str!("../../../assets/console.html");

/// Serve the browser test console.
#[get("/")]
pub async fn console(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    admit(&state, &req, Operation::Console).await?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(CONSOLE_PAGE))
}
