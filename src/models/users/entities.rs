use serde::{Deserialize, Serialize};

// 用户角色
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Dosen,     // 讲师，课程负责人
    Asisten,   // 助教，录入周成绩
    Mahasiswa, // 学生
}

impl UserRole {
    pub const DOSEN: &'static str = "dosen";
    pub const ASISTEN: &'static str = "asisten";
    pub const MAHASISWA: &'static str = "mahasiswa";

    pub fn lecturer_roles() -> &'static [&'static UserRole] {
        &[&Self::Dosen]
    }
    pub fn grader_roles() -> &'static [&'static UserRole] {
        &[&Self::Dosen, &Self::Asisten]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Dosen, &Self::Asisten, &Self::Mahasiswa]
    }

    /// 登录后按角色跳转的页面
    pub fn landing_path(&self) -> &'static str {
        match self {
            UserRole::Dosen => "/dosen",
            UserRole::Asisten => "/asisten",
            UserRole::Mahasiswa => "/mahasiswa",
        }
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Dosen => write!(f, "{}", UserRole::DOSEN),
            UserRole::Asisten => write!(f, "{}", UserRole::ASISTEN),
            UserRole::Mahasiswa => write!(f, "{}", UserRole::MAHASISWA),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            UserRole::DOSEN => Ok(UserRole::Dosen),
            UserRole::ASISTEN => Ok(UserRole::Asisten),
            UserRole::MAHASISWA => Ok(UserRole::Mahasiswa),
            _ => Err(format!(
                "Invalid user role: '{s}'. Supported roles: dosen, asisten, mahasiswa"
            )),
        }
    }
}

// 用户实体
//
// 角色相关字段均为可选：
// - dosen: nidn, jabatan
// - asisten: nim, tahun_ajaran
// - mahasiswa: nim, angkatan, prodi
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nidn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tahun_ajaran: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angkatan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prodi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jabatan: Option<String>,
}

impl User {
    pub fn has_role(&self, role: &UserRole) -> bool {
        self.role.as_ref() == Some(role)
    }

    /// 展示用的学号/工号
    pub fn identifier(&self) -> Option<&str> {
        self.nim.as_deref().or(self.nidn.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("Dosen".parse::<UserRole>().unwrap(), UserRole::Dosen);
        assert_eq!("mahasiswa".parse::<UserRole>().unwrap(), UserRole::Mahasiswa);
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_user_with_role_specific_fields() {
        let user: User = serde_json::from_str(
            r#"{"id": 4, "name": "Sinta", "role": "mahasiswa", "nim": "2201001", "angkatan": "2022"}"#,
        )
        .unwrap();
        assert!(user.has_role(&UserRole::Mahasiswa));
        assert_eq!(user.identifier(), Some("2201001"));
        assert!(user.nidn.is_none());
    }

    #[test]
    fn test_landing_paths() {
        assert_eq!(UserRole::Dosen.landing_path(), "/dosen");
        assert_eq!(UserRole::Asisten.landing_path(), "/asisten");
        assert_eq!(UserRole::Mahasiswa.landing_path(), "/mahasiswa");
    }
}
