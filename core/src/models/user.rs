use serde::{Deserialize, Serialize};

use super::lenient;

/// A workspace user as it appears in assignees, creators, members and owners.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub color: Option<String>,
    pub initials: Option<String>,
    #[serde(rename = "profilePicture", alias = "profile_picture")]
    pub profile_picture: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub role: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub last_active: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date_joined: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date_invited: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub user: Option<User>,
    pub invited_by: Option<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    pub avatar: Option<String>,
    #[serde(default)]
    pub members: Vec<Member>,
}
