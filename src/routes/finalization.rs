use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::finalization::requests::ToggleFinalizationRequest;
use crate::models::users::entities::UserRole;
use crate::services::FinalizationService;

static FINALIZATION_SERVICE: Lazy<FinalizationService> =
    Lazy::new(FinalizationService::new_lazy);

pub async fn get_roster(req: HttpRequest) -> ActixResult<HttpResponse> {
    FINALIZATION_SERVICE.get_roster(&req).await
}

pub async fn toggle(
    req: HttpRequest,
    body: web::Json<ToggleFinalizationRequest>,
) -> ActixResult<HttpResponse> {
    FINALIZATION_SERVICE.toggle(&req, body.into_inner()).await
}

// 配置路由
pub fn configure_finalization_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/finalization")
            .wrap(middlewares::RequireSession)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::lecturer_roles()))
                    .route("", web::get().to(get_roster))
                    .route("/toggle", web::post().to(toggle)),
            ),
    );
}
