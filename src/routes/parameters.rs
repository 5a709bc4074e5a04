use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::parameters::requests::AddParameterRequest;
use crate::models::users::entities::UserRole;
use crate::services::ParameterService;

static PARAMETER_SERVICE: Lazy<ParameterService> = Lazy::new(ParameterService::new_lazy);

pub async fn get_overview(req: HttpRequest) -> ActixResult<HttpResponse> {
    PARAMETER_SERVICE.get_overview(&req).await
}

pub async fn add_parameter(
    req: HttpRequest,
    body: web::Json<AddParameterRequest>,
) -> ActixResult<HttpResponse> {
    PARAMETER_SERVICE.add_parameter(&req, body.into_inner()).await
}

// 配置路由
pub fn configure_parameter_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/parameters")
            .wrap(middlewares::RequireSession)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::lecturer_roles()))
                    .route("", web::get().to(get_overview))
                    .route("", web::post().to(add_parameter)),
            ),
    );
}
