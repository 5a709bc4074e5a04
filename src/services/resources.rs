//! 普通 CRUD 页面的资源透传
//!
//! 只负责请求与信封处理，不做任何转换。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde_json::Value;

use crate::client::{ApiClient, Resource};
use crate::errors::{MonpadError, Result};
use crate::models::ApiResponse;
use crate::services::{request_client, respond};

pub struct ResourceService {
    client: Option<ApiClient>,
}

impl ResourceService {
    pub fn new_lazy() -> Self {
        Self { client: None }
    }

    pub(crate) fn get_client(&self, request: &HttpRequest) -> Result<ApiClient> {
        match &self.client {
            Some(client) => Ok(client.clone()),
            None => request_client(request),
        }
    }

    fn parse(name: &str) -> Result<Resource> {
        name.parse()
    }

    pub async fn list(&self, request: &HttpRequest, resource: String) -> ActixResult<HttpResponse> {
        let result = async {
            let resource = Self::parse(&resource)?;
            self.get_client(request)?.list::<Value>(resource).await
        }
        .await;
        respond(result, "Records retrieved successfully")
    }

    pub async fn get(
        &self,
        request: &HttpRequest,
        resource: String,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        let result = async {
            let resource = Self::parse(&resource)?;
            self.get_client(request)?.fetch::<Value>(resource, id).await
        }
        .await;
        respond(result, "Record retrieved successfully")
    }

    pub async fn create(
        &self,
        request: &HttpRequest,
        resource: String,
        body: Value,
    ) -> ActixResult<HttpResponse> {
        let result = async {
            let resource = Self::parse(&resource)?;
            ensure_object(&body)?;
            self.get_client(request)?
                .create::<_, Value>(resource, &body)
                .await
        }
        .await;
        match result {
            Ok(created) => Ok(HttpResponse::Created()
                .json(ApiResponse::success(created, "Record created successfully"))),
            Err(e) => Ok(ApiResponse::from_error(&e)),
        }
    }

    pub async fn update(
        &self,
        request: &HttpRequest,
        resource: String,
        id: i64,
        body: Value,
    ) -> ActixResult<HttpResponse> {
        let result = async {
            let resource = Self::parse(&resource)?;
            ensure_object(&body)?;
            self.get_client(request)?
                .update::<_, Value>(resource, id, &body)
                .await
        }
        .await;
        respond(result, "Record updated successfully")
    }

    pub async fn delete(
        &self,
        request: &HttpRequest,
        resource: String,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        let result = async {
            let resource = Self::parse(&resource)?;
            self.get_client(request)?.remove(resource, id).await
        }
        .await;
        match result {
            Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Record deleted successfully",
            ))),
            Err(e) => Ok(ApiResponse::from_error(&e)),
        }
    }
}

fn ensure_object(body: &Value) -> Result<()> {
    if body.is_object() {
        Ok(())
    } else {
        Err(MonpadError::bad_request("Request body must be a JSON object"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTransport;
    use crate::client::{Method, Transport};
    use crate::middlewares::RequireSession;
    use crate::cache::UserCache;
    use crate::config::AppConfig;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    static SERVICE: once_cell::sync::Lazy<ResourceService> =
        once_cell::sync::Lazy::new(ResourceService::new_lazy);

    async fn list(req: HttpRequest, path: web::Path<String>) -> ActixResult<HttpResponse> {
        SERVICE.list(&req, path.into_inner()).await
    }

    async fn delete(req: HttpRequest, path: web::Path<(String, i64)>) -> ActixResult<HttpResponse> {
        let (resource, id) = path.into_inner();
        SERVICE.delete(&req, resource, id).await
    }

    macro_rules! app {
        ($mock:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($mock.clone() as Arc<dyn Transport>))
                    .app_data(web::Data::new(UserCache::new(10, Duration::from_secs(60))))
                    .service(
                        web::scope("/api/v1/resources")
                            .wrap(RequireSession)
                            .route("/{resource}", web::get().to(list))
                            .route("/{resource}/{id}", web::delete().to(delete)),
                    ),
            )
            .await
        };
    }

    fn cookie() -> Cookie<'static> {
        Cookie::new(AppConfig::get().session.cookie_name.clone(), "t")
    }

    #[actix_web::test]
    async fn test_list_passthrough() {
        let mock = Arc::new(MockTransport::new());
        mock.on(Method::Get, "/dosen", 200, json!({"data": [{"id": 1, "nidn": "0011"}]}));
        let app = app!(mock);

        let req = test::TestRequest::get()
            .uri("/api/v1/resources/dosen")
            .cookie(cookie())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"][0]["nidn"], "0011");
    }

    #[actix_web::test]
    async fn test_unknown_resource_is_404_without_upstream_call() {
        let mock = Arc::new(MockTransport::new());
        let app = app!(mock);

        let req = test::TestRequest::get()
            .uri("/api/v1/resources/grades")
            .cookie(cookie())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(mock.requests().is_empty());
    }

    #[actix_web::test]
    async fn test_delete_conflict_maps_to_405() {
        let mock = Arc::new(MockTransport::new());
        mock.on(Method::Delete, "/project/3", 405, json!({"message": "Project has groups"}));
        let app = app!(mock);

        let req = test::TestRequest::delete()
            .uri("/api/v1/resources/project/3")
            .cookie(cookie())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
