use chrono::{DateTime, Utc};
use maud::{Markup, html};
use shared::models::{Reminder, VehicleId};

use crate::format::{format_date, format_km};
use crate::metrics::{Urgency, active_reminders, reminder_urgency};
use crate::styles::Records as RecordClass;

use super::records::toolbar;

fn urgency_class(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Normal => "",
        Urgency::Warning => RecordClass::CARD_WARNING,
        Urgency::Critical => RecordClass::CARD_CRITICAL,
    }
}

fn urgency_marker(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Normal => "",
        Urgency::Warning => "[soon] ",
        Urgency::Critical => "[overdue] ",
    }
}

fn reminder_card(
    vehicle_id: VehicleId,
    reminder: &Reminder,
    current_odometer: u32,
    now: DateTime<Utc>,
) -> Markup {
    let urgency = reminder_urgency(reminder, current_odometer, now);
    html! {
        div.(RecordClass::CARD).(urgency_class(urgency)) {
            h4 {
                (urgency_marker(urgency)) (reminder.title)
                @if reminder.is_recurring {
                    " " span.(RecordClass::BADGE) { "Recurring" }
                }
            }
            @if let Some(kind) = &reminder.kind {
                div.(RecordClass::MUTED) { (kind) }
            }
            @if let Some(due) = reminder.due_date {
                div { "Due: " (format_date(due)) }
            }
            @if let Some(odo) = reminder.due_odometer {
                div { "Due Odo: " (format_km(odo)) }
            }
            @if !reminder.notes.is_empty() {
                p.(RecordClass::NOTES) { (reminder.notes) }
            }
            button
                hx-put=(format!("/vehicles/{vehicle_id}/reminders/{}/complete", reminder.id))
                hx-confirm="Mark this reminder as done?"
                hx-target="#tab-content"
                hx-swap="innerHTML"
            {
                "Mark Done"
            }
        }
    }
}

pub fn reminders_tab(
    vehicle_id: VehicleId,
    reminders: &[Reminder],
    current_odometer: u32,
    now: DateTime<Utc>,
    slot: Option<Markup>,
) -> Markup {
    let active = active_reminders(reminders);
    html! {
        (toolbar(vehicle_id, "reminders", "set reminder", slot))
        @if active.is_empty() {
            div.(RecordClass::EMPTY_STATE) { "No active reminders. You are all set!" }
        } @else {
            div.(RecordClass::CARD_GRID) {
                @for reminder in active {
                    (reminder_card(vehicle_id, reminder, current_odometer, now))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;

    fn reminder(id: i64, due_odometer: Option<u32>, completed: bool) -> Reminder {
        Reminder {
            id,
            vehicle_id: 1,
            title: format!("reminder-{id}"),
            due_date: None,
            due_odometer,
            is_recurring: false,
            interval_km: None,
            interval_months: None,
            notes: String::new(),
            is_completed: completed,
            kind: None,
        }
    }

    fn now() -> DateTime<Utc> {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        Utc.from_utc_datetime(&day.and_hms_opt(9, 0, 0).unwrap())
    }

    #[test]
    fn overdue_reminders_get_critical_styling() {
        let html = reminders_tab(1, &[reminder(7, Some(9_000), false)], 10_000, now(), None)
            .into_string();
        assert!(html.contains(RecordClass::CARD_CRITICAL));
        assert!(html.contains("/vehicles/1/reminders/7/complete"));
    }

    #[test]
    fn completed_reminders_are_hidden() {
        let html = reminders_tab(1, &[reminder(7, None, true)], 0, now(), None).into_string();
        assert!(html.contains("No active reminders"));
        assert!(!html.contains("reminder-7"));
    }
}
