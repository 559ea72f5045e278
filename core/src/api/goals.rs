use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{millis, to_body, Query};
use crate::client::ClickUpClient;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::models::Goal;

#[derive(Deserialize)]
struct Envelope {
    goal: Goal,
}

#[derive(Deserialize)]
struct Goals {
    #[serde(default)]
    goals: Vec<Goal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateGoal {
    pub name: String,
    #[serde(with = "millis", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub multiple_owners: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub owners: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CreateGoal {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            due_date: None,
            description: None,
            multiple_owners: true,
            owners: Vec::new(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateGoal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(with = "millis", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rem_owners: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_owners: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ClickUpClient {
    /// Owners are only sent when `multiple_owners` is set.
    pub fn create_goal(&self, team_id: &str, goal: &CreateGoal) -> Result<Goal> {
        let mut body = to_body(goal)?;
        if !goal.multiple_owners {
            if let Some(fields) = body.as_object_mut() {
                fields.remove("owners");
            }
        }
        let envelope: Envelope = self.fetch(ApiRequest::post(format!("team/{team_id}/goal")).json(body))?;
        Ok(envelope.goal)
    }

    pub fn update_goal(&self, goal_id: &str, update: &UpdateGoal) -> Result<Goal> {
        let envelope: Envelope = self.fetch(ApiRequest::put(format!("goal/{goal_id}")).json(to_body(update)?))?;
        Ok(envelope.goal)
    }

    pub fn delete_goal(&self, goal_id: &str) -> Result<()> {
        self.send(ApiRequest::delete(format!("goal/{goal_id}")))
    }

    pub fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        let envelope: Envelope = self.fetch(ApiRequest::get(format!("goal/{goal_id}")))?;
        Ok(envelope.goal)
    }

    pub fn get_goals(&self, team_id: &str, include_completed: bool) -> Result<Vec<Goal>> {
        let uri = Query::new()
            .push("include_completed", include_completed)
            .apply(format!("team/{team_id}/goal"));
        let goals: Goals = self.fetch(ApiRequest::get(uri))?;
        Ok(goals.goals)
    }
}
