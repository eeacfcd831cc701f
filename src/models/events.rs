use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Open,
    Closed,
}

/// Row shape of `events`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRow {
    pub event_id: String,
    pub event_name: Option<String>,
    pub event_date: Option<String>,
    pub status: Option<String>,
    pub team_member_limit: Option<i64>,
    pub entry_fee_team: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_id: String,
    pub name: String,
    pub date: String,
    pub status: EventStatus,
    /// `None` means unbounded.
    pub team_member_limit: Option<usize>,
    pub entry_fee_team: Option<i64>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        let status = match row.status.as_deref().map(str::trim) {
            Some("OPEN") => EventStatus::Open,
            _ => EventStatus::Closed,
        };
        Event {
            event_id: row.event_id,
            name: row.event_name.unwrap_or_default(),
            date: row.event_date.unwrap_or_default(),
            status,
            // Zero or negative limits mean "no limit".
            team_member_limit: row
                .team_member_limit
                .filter(|n| *n > 0)
                .and_then(|n| usize::try_from(n).ok()),
            entry_fee_team: row.entry_fee_team.filter(|fee| *fee > 0),
        }
    }
}

/// Row shape of `event_divisions`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EventDivisionRow {
    pub division_id: String,
    pub division_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(limit: Option<i64>) -> EventRow {
        EventRow {
            event_id: "E1".to_string(),
            event_name: Some("봄 대회".to_string()),
            event_date: Some("2026-04-12".to_string()),
            status: Some("OPEN".to_string()),
            team_member_limit: limit,
            entry_fee_team: Some(0),
        }
    }

    #[test]
    fn non_positive_limit_is_unbounded() {
        assert_eq!(Event::from(row(None)).team_member_limit, None);
        assert_eq!(Event::from(row(Some(0))).team_member_limit, None);
        assert_eq!(Event::from(row(Some(-3))).team_member_limit, None);
        assert_eq!(Event::from(row(Some(8))).team_member_limit, Some(8));
    }

    #[test]
    fn zero_fee_is_hidden() {
        assert_eq!(Event::from(row(None)).entry_fee_team, None);
    }

    #[test]
    fn status_other_than_open_is_closed() {
        let mut r = row(None);
        r.status = Some("CLOSED".to_string());
        assert_eq!(Event::from(r).status, EventStatus::Closed);
        assert_eq!(Event::from(row(None)).status, EventStatus::Open);
    }
}
