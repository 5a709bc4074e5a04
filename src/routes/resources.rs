use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::ResourceService;

static RESOURCE_SERVICE: Lazy<ResourceService> = Lazy::new(ResourceService::new_lazy);

pub async fn list(req: HttpRequest, resource: web::Path<String>) -> ActixResult<HttpResponse> {
    RESOURCE_SERVICE.list(&req, resource.into_inner()).await
}

pub async fn get(req: HttpRequest, path: web::Path<(String, i64)>) -> ActixResult<HttpResponse> {
    let (resource, id) = path.into_inner();
    RESOURCE_SERVICE.get(&req, resource, id).await
}

pub async fn create(
    req: HttpRequest,
    resource: web::Path<String>,
    body: web::Json<Value>,
) -> ActixResult<HttpResponse> {
    RESOURCE_SERVICE
        .create(&req, resource.into_inner(), body.into_inner())
        .await
}

pub async fn update(
    req: HttpRequest,
    path: web::Path<(String, i64)>,
    body: web::Json<Value>,
) -> ActixResult<HttpResponse> {
    let (resource, id) = path.into_inner();
    RESOURCE_SERVICE
        .update(&req, resource, id, body.into_inner())
        .await
}

pub async fn delete(req: HttpRequest, path: web::Path<(String, i64)>) -> ActixResult<HttpResponse> {
    let (resource, id) = path.into_inner();
    RESOURCE_SERVICE.delete(&req, resource, id).await
}

// 配置路由
//
// 读取对所有登录用户开放，写入仅限讲师
pub fn configure_resource_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/resources")
            .wrap(middlewares::RequireSession)
            .route("/{resource}", web::get().to(list))
            .route("/{resource}/{id}", web::get().to(get))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::lecturer_roles()))
                    .route("/{resource}", web::post().to(create))
                    .route("/{resource}/{id}", web::put().to(update))
                    .route("/{resource}/{id}", web::delete().to(delete)),
            ),
    );
}
