use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct LoginObject {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeacherInfo {
    pub name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub teacher: TeacherInfo,
}
