use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;
use super::user::User;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub team_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date_created: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub due_date: Option<String>,
    pub description: Option<String>,
    pub private: Option<bool>,
    pub archived: Option<bool>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub creator: Option<String>,
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub pretty_id: Option<String>,
    pub multiple_owners: Option<bool>,
    pub folder_id: Option<String>,
    #[serde(default)]
    pub members: Vec<User>,
    #[serde(default)]
    pub owners: Vec<User>,
    #[serde(default)]
    pub key_results: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub percent_completed: Option<i64>,
    pub pretty_url: Option<String>,
}
