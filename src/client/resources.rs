use serde::Serialize;
use serde::de::DeserializeOwned;

use super::ApiClient;
use crate::errors::{MonpadError, Result};

/// 上游固定的 REST 资源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Project,
    Group,
    Week,
    WeekType,
    GradeType,
    Mahasiswa,
    Dosen,
    Asisten,
    Finalization,
}

impl Resource {
    pub const ALL: [Resource; 9] = [
        Resource::Project,
        Resource::Group,
        Resource::Week,
        Resource::WeekType,
        Resource::GradeType,
        Resource::Mahasiswa,
        Resource::Dosen,
        Resource::Asisten,
        Resource::Finalization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Project => "project",
            Resource::Group => "group",
            Resource::Week => "week",
            Resource::WeekType => "week-type",
            Resource::GradeType => "grade-type",
            Resource::Mahasiswa => "mahasiswa",
            Resource::Dosen => "dosen",
            Resource::Asisten => "asisten",
            Resource::Finalization => "finalization",
        }
    }

    pub fn path(&self) -> String {
        format!("/{}", self.as_str())
    }

    pub fn item_path(&self, id: i64) -> String {
        format!("/{}/{id}", self.as_str())
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Resource {
    type Err = MonpadError;

    fn from_str(s: &str) -> Result<Self> {
        Resource::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| MonpadError::not_found(format!("Unknown resource: {s}")))
    }
}

// 远程集合获取：只负责请求与反序列化，不做任何转换
impl ApiClient {
    pub async fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>> {
        let items: Option<Vec<T>> = self.get(&resource.path()).await?;
        Ok(items.unwrap_or_default())
    }

    pub async fn fetch<T: DeserializeOwned>(&self, resource: Resource, id: i64) -> Result<T> {
        self.get(&resource.item_path(id)).await
    }

    pub async fn create<B, T>(&self, resource: Resource, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.post(&resource.path(), body).await
    }

    pub async fn update<B, T>(&self, resource: Resource, id: i64, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.put(&resource.item_path(id), body).await
    }

    pub async fn remove(&self, resource: Resource, id: i64) -> Result<()> {
        self.delete(&resource.item_path(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_paths() {
        assert_eq!(Resource::WeekType.path(), "/week-type");
        assert_eq!(Resource::Finalization.item_path(12), "/finalization/12");
    }

    #[test]
    fn test_resource_parse_round_trips_names() {
        for resource in Resource::ALL {
            assert_eq!(resource.as_str().parse::<Resource>().unwrap(), resource);
        }
        assert!("grades".parse::<Resource>().is_err());
    }
}
