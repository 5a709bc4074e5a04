use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::finalization::entities::MemberGrade;
use crate::models::groups::requests::{AddMembersRequest, GroupQuery};
use crate::models::users::entities::UserRole;
use crate::services::GroupService;

static GROUP_SERVICE: Lazy<GroupService> = Lazy::new(GroupService::new_lazy);

pub async fn list_groups(
    req: HttpRequest,
    query: web::Query<GroupQuery>,
) -> ActixResult<HttpResponse> {
    GROUP_SERVICE.list_groups(&req, query.into_inner()).await
}

pub async fn list_members(req: HttpRequest, group_id: web::Path<i64>) -> ActixResult<HttpResponse> {
    GROUP_SERVICE.list_members(&req, group_id.into_inner()).await
}

pub async fn list_candidates(req: HttpRequest) -> ActixResult<HttpResponse> {
    GROUP_SERVICE.list_candidates(&req).await
}

pub async fn add_members(
    req: HttpRequest,
    group_id: web::Path<i64>,
    body: web::Json<AddMembersRequest>,
) -> ActixResult<HttpResponse> {
    GROUP_SERVICE
        .add_members(&req, group_id.into_inner(), body.into_inner())
        .await
}

pub async fn get_qualification(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (group_id, member_id) = path.into_inner();
    GROUP_SERVICE
        .get_qualification(&req, group_id, member_id)
        .await
}

pub async fn submit_qualification(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    grade: web::Json<MemberGrade>,
) -> ActixResult<HttpResponse> {
    let (group_id, member_id) = path.into_inner();
    GROUP_SERVICE
        .submit_qualification(&req, group_id, member_id, grade.into_inner())
        .await
}

// 配置路由
//
// 成员管理仅限讲师，同伴互评由小组成员 (学生) 提交
pub fn configure_group_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/groups")
            .wrap(middlewares::RequireSession)
            .route("", web::get().to(list_groups))
            .route("/{id}/members", web::get().to(list_members))
            .route(
                "/{id}/members/{member_id}/qualification",
                web::get().to(get_qualification),
            )
            .route(
                "/{id}/members/{member_id}/qualification",
                web::post().to(submit_qualification),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::lecturer_roles()))
                    .route("/candidates", web::get().to(list_candidates))
                    .route("/{id}/members", web::post().to(add_members)),
            ),
    );
}
