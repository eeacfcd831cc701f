use serde::Deserialize;
use tracing::warn;

use crate::database::backend::Backend;
use crate::database::{entries_repo, events_repo};
use crate::models::{Event, EventEntryRow, EventStatus};
use crate::services::notice_service::format_date;

const OTHER_DIVISION: &str = "기타";

#[derive(Debug, Deserialize, Default)]
pub struct ApplyQuery {
    pub event: Option<String>,
}

pub struct EventChoiceView {
    pub event_id: String,
    pub label: String,
    pub selected: bool,
}

pub struct EventSummaryView {
    pub name: String,
    pub date: String,
    pub fee_label: Option<String>,
    pub open: bool,
}

pub struct DivisionCountView {
    pub division: String,
    pub count: usize,
}

pub struct EntryLineView {
    pub position: usize,
    pub team_name: String,
    pub division: String,
    pub applied_label: String,
    pub payment_status: String,
    pub payment_class: &'static str,
}

pub struct ApplyPageView {
    pub events: Vec<EventChoiceView>,
    pub summary: Option<EventSummaryView>,
    pub division_counts: Vec<DivisionCountView>,
    pub entries: Vec<EntryLineView>,
}

/// Thousands-grouped won amount, e.g. `30,000`.
pub fn format_won(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Entry status per event. Without an explicit choice the newest event is
/// shown.
pub async fn load_apply_page(backend: &dyn Backend, query: &ApplyQuery) -> ApplyPageView {
    let events = match events_repo::list_all_events(backend).await {
        Ok(events) => events,
        Err(e) => {
            warn!(error = %e, "event list load failed");
            Vec::new()
        }
    };

    let selected: Option<&Event> = query
        .event
        .as_deref()
        .and_then(|id| events.iter().find(|e| e.event_id == id))
        .or_else(|| events.first());

    let rows = match selected {
        Some(event) => match entries_repo::list_event_entries(backend, &event.event_id).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(event_id = %event.event_id, error = %e, "entry list load failed");
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    ApplyPageView {
        events: events
            .iter()
            .map(|e| EventChoiceView {
                event_id: e.event_id.clone(),
                label: format!("{} ({})", e.name, e.date),
                selected: selected.is_some_and(|s| s.event_id == e.event_id),
            })
            .collect(),
        summary: selected.map(|e| EventSummaryView {
            name: e.name.clone(),
            date: e.date.clone(),
            fee_label: e.entry_fee_team.map(|fee| format!("{}원/팀", format_won(fee))),
            open: e.status == EventStatus::Open,
        }),
        division_counts: count_by_division(&rows),
        entries: rows.iter().enumerate().map(|(i, r)| entry_line(i, r)).collect(),
    }
}

/// Divisions in order of first appearance.
fn count_by_division(rows: &[EventEntryRow]) -> Vec<DivisionCountView> {
    let mut counts: Vec<DivisionCountView> = Vec::new();
    for row in rows {
        let division = row.division_name().unwrap_or(OTHER_DIVISION);
        match counts.iter_mut().find(|c| c.division == division) {
            Some(c) => c.count += 1,
            None => counts.push(DivisionCountView {
                division: division.to_string(),
                count: 1,
            }),
        }
    }
    counts
}

fn entry_line(index: usize, row: &EventEntryRow) -> EntryLineView {
    let payment_status = row.payment_status.clone().unwrap_or_default();
    let payment_class = match payment_status.as_str() {
        "결제완료" => "paid",
        "현장납부" => "onsite",
        _ => "unpaid",
    };
    EntryLineView {
        position: index + 1,
        team_name: row.team_name().unwrap_or("-").to_string(),
        division: row.division_name().unwrap_or("-").to_string(),
        applied_label: row.applied_at.as_deref().map(format_date).unwrap_or_default(),
        payment_status,
        payment_class,
    }
}
