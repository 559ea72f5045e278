use serde::Deserialize;
use serde_json::json;

use crate::client::ClickUpClient;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::models::Folder;

#[derive(Deserialize)]
struct Folders {
    #[serde(default)]
    folders: Vec<Folder>,
}

impl ClickUpClient {
    pub fn get_folder(&self, folder_id: &str) -> Result<Folder> {
        self.fetch(ApiRequest::get(format!("folder/{folder_id}")))
    }

    pub fn get_folders(&self, space_id: &str) -> Result<Vec<Folder>> {
        let folders: Folders = self.fetch(ApiRequest::get(format!("space/{space_id}/folder")))?;
        Ok(folders.folders)
    }

    pub fn create_folder(&self, space_id: &str, name: &str) -> Result<Folder> {
        self.fetch(ApiRequest::post(format!("space/{space_id}/folder")).json(json!({ "name": name })))
    }

    pub fn update_folder(&self, folder_id: &str, name: &str) -> Result<Folder> {
        self.fetch(ApiRequest::put(format!("folder/{folder_id}")).json(json!({ "name": name })))
    }

    pub fn delete_folder(&self, folder_id: &str) -> Result<()> {
        self.send(ApiRequest::delete(format!("folder/{folder_id}")))
    }
}
