use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::StudentService;

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn download_template(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.download_template(&req).await
}

pub async fn import_students(
    req: HttpRequest,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.import_students(payload, &req).await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireSession)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::lecturer_roles()))
                    .route("/template", web::get().to(download_template))
                    .route("/import", web::post().to(import_students)),
            ),
    );
}
