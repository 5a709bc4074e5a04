use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::models::weeks::requests::{ReviewRequest, WeekGradeInput, WeekQuery};
use crate::services::WeekService;

static WEEK_SERVICE: Lazy<WeekService> = Lazy::new(WeekService::new_lazy);

pub async fn list_weeks(
    req: HttpRequest,
    query: web::Query<WeekQuery>,
) -> ActixResult<HttpResponse> {
    WEEK_SERVICE.list_weeks(&req, query.into_inner()).await
}

pub async fn grade_week(
    req: HttpRequest,
    week_id: web::Path<i64>,
    input: web::Json<WeekGradeInput>,
) -> ActixResult<HttpResponse> {
    WEEK_SERVICE
        .grade_week(&req, week_id.into_inner(), input.into_inner())
        .await
}

pub async fn review_week(
    req: HttpRequest,
    week_id: web::Path<i64>,
    review: web::Json<ReviewRequest>,
) -> ActixResult<HttpResponse> {
    WEEK_SERVICE
        .review_week(&req, week_id.into_inner(), review.into_inner())
        .await
}

// 配置路由
pub fn configure_week_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/weeks")
            .wrap(middlewares::RequireSession)
            .service(
                web::scope("/{id}/review")
                    .wrap(middlewares::RequireRole::new_any(UserRole::lecturer_roles()))
                    .route("", web::post().to(review_week)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::grader_roles()))
                    .route("", web::get().to(list_weeks))
                    .route("/{id}/grades", web::put().to(grade_week)),
            ),
    );
}
