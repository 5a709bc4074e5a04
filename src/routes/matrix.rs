use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::matrix::requests::{MatrixExportQuery, MatrixQuery};
use crate::models::users::entities::UserRole;
use crate::services::MatrixService;

// 懒加载的全局 MatrixService 实例，合并并发请求的状态也保存在其中
static MATRIX_SERVICE: Lazy<MatrixService> = Lazy::new(MatrixService::new_lazy);

pub async fn get_matrix(
    req: HttpRequest,
    query: web::Query<MatrixQuery>,
) -> ActixResult<HttpResponse> {
    MATRIX_SERVICE.get_matrix(&req, query.into_inner()).await
}

pub async fn export_matrix(
    req: HttpRequest,
    query: web::Query<MatrixExportQuery>,
) -> ActixResult<HttpResponse> {
    MATRIX_SERVICE.export_matrix(&req, query.into_inner()).await
}

// 配置路由
pub fn configure_matrix_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/matrix")
            .wrap(middlewares::RequireSession)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::grader_roles()))
                    .route("", web::get().to(get_matrix))
                    .route("/export", web::get().to(export_matrix)),
            ),
    );
}
