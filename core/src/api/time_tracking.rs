use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::Query;
use crate::client::ClickUpClient;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::models::TimeEntry;

#[derive(Deserialize)]
struct Entries {
    #[serde(default)]
    data: Vec<TimeEntry>,
}

#[derive(Deserialize)]
struct Entry {
    data: TimeEntry,
}

/// Range filter for `get_time_entries_in_range`. ClickUp defaults to the
/// last 30 days of the authenticated user's entries.
#[derive(Debug, Clone, Default)]
pub struct TimeEntryQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// User ids; only workspace owners may ask for other users.
    pub assignees: Vec<String>,
}

impl ClickUpClient {
    pub fn get_time_entries_in_range(&self, team_id: &str, query: &TimeEntryQuery) -> Result<Vec<TimeEntry>> {
        let assignees = (!query.assignees.is_empty()).then(|| query.assignees.join(","));
        let uri = Query::new()
            .time("start_date", query.start_date)
            .time("end_date", query.end_date)
            .opt("assignee", assignees)
            .apply(format!("team/{team_id}/time_entries"));
        let entries: Entries = self.fetch(ApiRequest::get(uri))?;
        Ok(entries.data)
    }

    pub fn get_single_time_entry(&self, team_id: &str, timer_id: &str) -> Result<TimeEntry> {
        self.time_entry(ApiRequest::get(format!("team/{team_id}/time_entries/{timer_id}")))
    }

    pub fn start_timer(&self, team_id: &str, timer_id: &str) -> Result<TimeEntry> {
        self.time_entry(ApiRequest::post(format!("team/{team_id}/time_entries/start/{timer_id}")))
    }

    /// Stop the authenticated user's running timer.
    pub fn stop_timer(&self, team_id: &str) -> Result<TimeEntry> {
        self.time_entry(ApiRequest::post(format!("team/{team_id}/time_entries/stop")))
    }

    fn time_entry(&self, request: ApiRequest) -> Result<TimeEntry> {
        let entry: Entry = self.fetch(request)?;
        Ok(entry.data)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::http::HttpMethod;
    use crate::testing::{json_response, ManualClock, ScriptedTransport, NOW};

    fn client(transport: &ScriptedTransport) -> ClickUpClient {
        ClickUpClient::builder("pk_test")
            .transport(transport.clone())
            .clock(ManualClock::new(NOW))
            .build()
    }

    #[test]
    fn range_query_joins_assignees() {
        let transport = ScriptedTransport::new(vec![json_response(
            200,
            json!({"data": [{"id": "1963465985517105840", "duration": "3600000"}]}),
        )]);
        let query = TimeEntryQuery {
            start_date: Some(Utc.timestamp_millis_opt(1_592_841_559_129).unwrap()),
            end_date: None,
            assignees: vec!["1".to_string(), "2".to_string()],
        };
        let entries = client(&transport).get_time_entries_in_range("300702", &query).unwrap();
        assert_eq!(entries[0].duration, Some(3_600_000));
        assert!(transport.requests()[0]
            .url
            .ends_with("/team/300702/time_entries?start_date=1592841559129&assignee=1%2C2"));
    }

    #[test]
    fn timer_start_and_stop() {
        let transport = ScriptedTransport::new(vec![
            json_response(200, json!({"data": {"id": "t1", "duration": "-1592841647"}})),
            json_response(200, json!({"data": {"id": "t1", "end": "1592845159129", "duration": "3600000"}})),
        ]);
        let client = client(&transport);
        let started = client.start_timer("300702", "t1").unwrap();
        assert!(started.is_running());
        let stopped = client.stop_timer("300702").unwrap();
        assert!(!stopped.is_running());

        let sent = transport.requests();
        assert_eq!(sent[0].method, HttpMethod::Post);
        assert!(sent[0].url.ends_with("/team/300702/time_entries/start/t1"));
        assert!(sent[1].url.ends_with("/team/300702/time_entries/stop"));
    }
}
