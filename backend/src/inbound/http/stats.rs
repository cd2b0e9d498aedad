//! Storage statistics endpoint.

use actix_web::{HttpRequest, get, web};

use crate::domain::StatsReport;
use crate::domain::rate_limit::Operation;
use crate::inbound::http::ApiResult;
use crate::inbound::http::rate_limit::admit;
use crate::inbound::http::state::HttpState;

/// Report the user count and database size.
///
/// Filesystem locations are included only when the state's
/// [`StatsOptions`](crate::domain::StatsOptions) enable development mode.
#[get("/stats")]
pub async fn stats(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<web::Json<StatsReport>> {
    admit(&state, &req, Operation::Stats).await?;
    let report = state.users.stats(state.stats).await?;
    Ok(web::Json(report))
}
