use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct TeamRef {
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DivisionRef {
    pub division_name: Option<String>,
}

/// Row of `event_entries` with the team and division names embedded.
#[derive(Debug, Clone, Deserialize)]
pub struct EventEntryRow {
    pub entry_id: serde_json::Value,
    pub entry_status: Option<String>,
    pub payment_status: Option<String>,
    pub applied_at: Option<String>,
    pub teams: Option<TeamRef>,
    pub event_divisions: Option<DivisionRef>,
}

impl EventEntryRow {
    pub fn team_name(&self) -> Option<&str> {
        self.teams
            .as_ref()
            .and_then(|t| t.team_name.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    pub fn division_name(&self) -> Option<&str> {
        self.event_divisions
            .as_ref()
            .and_then(|d| d.division_name.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}
