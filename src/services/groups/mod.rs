pub mod members;
pub mod qualification;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::client::{ApiClient, Resource};
use crate::errors::Result;
use crate::models::finalization::entities::MemberGrade;
use crate::models::groups::entities::Group;
use crate::models::groups::requests::{AddMembersRequest, GroupQuery};
use crate::services::{request_client, respond};

pub async fn list_groups(client: &ApiClient, project_id: Option<i64>) -> Result<Vec<Group>> {
    let groups: Vec<Group> = client.list(Resource::Group).await?;
    Ok(groups
        .into_iter()
        .filter(|g| project_id.is_none_or(|id| g.project_id == id))
        .collect())
}

pub struct GroupService {
    client: Option<ApiClient>,
}

impl GroupService {
    pub fn new_lazy() -> Self {
        Self { client: None }
    }

    pub(crate) fn get_client(&self, request: &HttpRequest) -> Result<ApiClient> {
        match &self.client {
            Some(client) => Ok(client.clone()),
            None => request_client(request),
        }
    }

    pub async fn list_groups(&self, request: &HttpRequest, query: GroupQuery) -> ActixResult<HttpResponse> {
        let result = match self.get_client(request) {
            Ok(client) => list_groups(&client, query.project_id).await,
            Err(e) => Err(e),
        };
        respond(result, "Groups retrieved successfully")
    }

    pub async fn list_members(&self, request: &HttpRequest, group_id: i64) -> ActixResult<HttpResponse> {
        let result = match self.get_client(request) {
            Ok(client) => members::list_members(&client, group_id).await,
            Err(e) => Err(e),
        };
        respond(result, "Group members retrieved successfully")
    }

    // 可加入小组的学生
    pub async fn list_candidates(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let result = match self.get_client(request) {
            Ok(client) => members::load_candidates(&client).await,
            Err(e) => Err(e),
        };
        respond(result, "Available students retrieved successfully")
    }

    pub async fn add_members(
        &self,
        request: &HttpRequest,
        group_id: i64,
        body: AddMembersRequest,
    ) -> ActixResult<HttpResponse> {
        let result = match self.get_client(request) {
            Ok(client) => members::add_members(&client, group_id, body).await,
            Err(e) => Err(e),
        };
        respond(result, "Members added successfully")
    }

    pub async fn get_qualification(
        &self,
        request: &HttpRequest,
        group_id: i64,
        member_id: i64,
    ) -> ActixResult<HttpResponse> {
        let result = match self.get_client(request) {
            Ok(client) => qualification::get_qualification(&client, group_id, member_id).await,
            Err(e) => Err(e),
        };
        respond(result, "Qualification retrieved successfully")
    }

    pub async fn submit_qualification(
        &self,
        request: &HttpRequest,
        group_id: i64,
        member_id: i64,
        grade: MemberGrade,
    ) -> ActixResult<HttpResponse> {
        let result = match self.get_client(request) {
            Ok(client) => {
                qualification::submit_qualification(&client, group_id, member_id, grade).await
            }
            Err(e) => Err(e),
        };
        respond(result, "Qualification saved successfully")
    }
}
