use serde::Deserialize;

use crate::client::ClickUpClient;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::models::View;

#[derive(Deserialize)]
struct Views {
    #[serde(default)]
    views: Vec<View>,
}

impl ClickUpClient {
    /// Views of a list; chat views come back as `View::Conversation`.
    pub fn get_list_views(&self, list_id: &str) -> Result<Vec<View>> {
        let views: Views = self.fetch(ApiRequest::get(format!("list/{list_id}/view")))?;
        Ok(views.views)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::{json_response, ManualClock, ScriptedTransport, NOW};

    #[test]
    fn list_views_mix_variants() {
        let transport = ScriptedTransport::new(vec![json_response(
            200,
            json!({"views": [
                {"id": "3c-105", "name": "Chat", "type": "conversation"},
                {"id": "3c-106", "name": "List", "type": "list"}
            ]}),
        )]);
        let client = ClickUpClient::builder("pk_test")
            .transport(transport.clone())
            .clock(ManualClock::new(NOW))
            .build();
        let views = client.get_list_views("124").unwrap();
        assert!(matches!(views[0], View::Conversation(_)));
        assert!(matches!(views[1], View::Standard(_)));
        assert!(transport.requests()[0].url.ends_with("/list/124/view"));
    }
}
