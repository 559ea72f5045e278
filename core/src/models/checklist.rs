use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;
use super::user::User;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub orderindex: Option<i64>,
    pub assignee: Option<User>,
    pub resolved: Option<bool>,
    pub parent: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date_created: Option<String>,
    #[serde(default)]
    pub children: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    pub task_id: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub orderindex: Option<i64>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub resolved: Option<i64>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub unresolved: Option<i64>,
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn checklist_with_items() {
        let checklist: Checklist = serde_json::from_value(json!({
            "id": "b955c4dc",
            "task_id": "9hz",
            "name": "Checklist",
            "orderindex": 0,
            "resolved": 0,
            "unresolved": 1,
            "items": [{"id": "21e08dc8", "name": "Checklist Item", "orderindex": 0, "assignee": null, "resolved": false}]
        }))
        .unwrap();
        assert_eq!(checklist.unresolved, Some(1));
        assert_eq!(checklist.items[0].name.as_deref(), Some("Checklist Item"));
        assert_eq!(checklist.items[0].resolved, Some(false));
    }
}
