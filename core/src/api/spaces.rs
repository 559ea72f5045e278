//! Workspaces (teams), spaces, space tags and the shared hierarchy.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{path_segment, to_body, Query};
use crate::client::ClickUpClient;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::models::{SharedHierarchy, Space, SpaceFeatures, Tag, Team};

#[derive(Deserialize)]
struct Teams {
    #[serde(default)]
    teams: Vec<Team>,
}

#[derive(Deserialize)]
struct Spaces {
    #[serde(default)]
    spaces: Vec<Space>,
}

#[derive(Deserialize)]
struct Tags {
    #[serde(default)]
    tags: Vec<Tag>,
}

#[derive(Deserialize)]
struct Shared {
    #[serde(default)]
    shared: SharedHierarchy,
}

impl ClickUpClient {
    /// Workspaces the token can access.
    pub fn get_teams(&self) -> Result<Vec<Team>> {
        let teams: Teams = self.fetch(ApiRequest::get("team"))?;
        Ok(teams.teams)
    }

    pub fn create_space(
        &self,
        team_id: &str,
        name: &str,
        multiple_assignees: bool,
        features: &SpaceFeatures,
    ) -> Result<Space> {
        let body = json!({
            "name": name,
            "multiple_assignees": multiple_assignees,
            "features": to_body(features)?,
        });
        self.fetch(ApiRequest::post(format!("team/{team_id}/space")).json(body))
    }

    pub fn delete_space(&self, space_id: &str) -> Result<()> {
        self.send(ApiRequest::delete(format!("space/{space_id}")))
    }

    pub fn get_space(&self, space_id: &str) -> Result<Space> {
        self.fetch(ApiRequest::get(format!("space/{space_id}")))
    }

    pub fn get_spaces(&self, team_id: &str, archived: bool) -> Result<Vec<Space>> {
        let uri = Query::new()
            .push("archived", archived)
            .apply(format!("team/{team_id}/space"));
        let spaces: Spaces = self.fetch(ApiRequest::get(uri))?;
        Ok(spaces.spaces)
    }

    pub fn get_space_tags(&self, space_id: &str) -> Result<Vec<Tag>> {
        let tags: Tags = self.fetch(ApiRequest::get(format!("space/{space_id}/tag")))?;
        Ok(tags.tags)
    }

    /// Create a tag; colours are hex strings such as `#000000`.
    pub fn create_space_tag(
        &self,
        space_id: &str,
        name: &str,
        tag_fg: Option<&str>,
        tag_bg: Option<&str>,
    ) -> Result<()> {
        let mut tag = Map::new();
        tag.insert("name".to_string(), json!(name));
        if let Some(fg) = tag_fg {
            tag.insert("tag_fg".to_string(), json!(fg));
        }
        if let Some(bg) = tag_bg {
            tag.insert("tag_bg".to_string(), json!(bg));
        }
        let body = json!({ "tag": Value::Object(tag) });
        self.send(ApiRequest::post(format!("space/{space_id}/tag")).json(body))
    }

    pub fn tag_task(&self, task_id: &str, tag_name: &str) -> Result<()> {
        self.send(ApiRequest::post(format!("task/{task_id}/tag/{}", path_segment(tag_name))))
    }

    pub fn untag_task(&self, task_id: &str, tag_name: &str) -> Result<()> {
        self.send(ApiRequest::delete(format!("task/{task_id}/tag/{}", path_segment(tag_name))))
    }

    /// Tasks, lists and folders shared with the authenticated user.
    pub fn get_shared_hierarchy(&self, team_id: &str) -> Result<SharedHierarchy> {
        let shared: Shared = self.fetch(ApiRequest::get(format!("team/{team_id}/shared")))?;
        Ok(shared.shared)
    }
}
