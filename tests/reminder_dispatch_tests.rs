mod mocks;

use chrono::{DateTime, Duration, TimeZone, Utc};
use mocks::{MockMailer, MockReminderStore};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;
use vehicle_vault::dto::reminder_dto::ReminderResponse;
use vehicle_vault::models::service::{ServiceRecord, ServiceType};
use vehicle_vault::services::reminder_service::{
    ReminderCandidate, ReminderDispatcher, ReminderSummary,
};

fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn record(vehicle_id: Uuid, next: Option<DateTime<Utc>>) -> ServiceRecord {
    ServiceRecord {
        id: Uuid::new_v4(),
        vehicle_id,
        service_date: date(2024, 1, 5),
        description: "Routine check".to_string(),
        cost: Decimal::new(12_000, 2),
        mileage: None,
        next_service_date: next,
        service_type: ServiceType::GeneralMaintenance,
        service_center_name: "Corner Garage".to_string(),
        service_center_address: "4 High St".to_string(),
        created_at: date(2024, 1, 5),
        updated_at: date(2024, 1, 5),
    }
}

fn vehicle(owner_email: &str, next_dates: &[Option<DateTime<Utc>>]) -> ReminderCandidate {
    let vehicle_id = Uuid::new_v4();
    ReminderCandidate {
        vehicle_id,
        vehicle_name: "Civic".to_string(),
        registration_number: format!("REG-{}", &vehicle_id.to_string()[..8]),
        owner_email: owner_email.to_string(),
        last_reminder_sent_date: None,
        services: next_dates.iter().map(|d| record(vehicle_id, *d)).collect(),
    }
}

fn dispatcher(store: &MockReminderStore, mailer: &MockMailer) -> ReminderDispatcher {
    ReminderDispatcher::new(Arc::new(store.clone()), Arc::new(mailer.clone()), 7)
}

#[tokio::test]
async fn test_sends_reminder_for_service_due_this_week() {
    let store = MockReminderStore::new();
    let mailer = MockMailer::new();
    let candidate = vehicle("owner@example.com", &[Some(date(2024, 2, 15))]);
    let vehicle_id = candidate.vehicle_id;
    store.add_vehicle(Uuid::new_v4(), candidate);

    let summary = dispatcher(&store, &mailer)
        .dispatch(None, date(2024, 2, 10))
        .await
        .unwrap();

    assert_eq!(summary.sent, 1);
    assert_eq!(mailer.recipients(), vec!["owner@example.com".to_string()]);
    assert!(mailer.sent()[0].html.contains("Civic"));
    assert_eq!(store.last_reminder(vehicle_id), Some(date(2024, 2, 15)));
}

#[tokio::test]
async fn test_nearest_future_date_wins_over_later_records() {
    let store = MockReminderStore::new();
    let mailer = MockMailer::new();
    let candidate = vehicle(
        "owner@example.com",
        &[Some(date(2024, 1, 10)), Some(date(2024, 2, 20)), Some(date(2024, 2, 12))],
    );
    let vehicle_id = candidate.vehicle_id;
    store.add_vehicle(Uuid::new_v4(), candidate);

    dispatcher(&store, &mailer)
        .dispatch(None, date(2024, 2, 10))
        .await
        .unwrap();

    assert_eq!(store.last_reminder(vehicle_id), Some(date(2024, 2, 12)));
}

#[tokio::test]
async fn test_second_sweep_does_not_resend_same_due_date() {
    let store = MockReminderStore::new();
    let mailer = MockMailer::new();
    store.add_vehicle(
        Uuid::new_v4(),
        vehicle("owner@example.com", &[Some(date(2024, 2, 15))]),
    );
    let dispatcher = dispatcher(&store, &mailer);

    let first = dispatcher.dispatch(None, date(2024, 2, 10)).await.unwrap();
    let second = dispatcher
        .dispatch(None, date(2024, 2, 11))
        .await
        .unwrap();

    assert_eq!(first.sent, 1);
    assert_eq!(second.sent, 0);
    assert_eq!(second.skipped, 1);
    assert_eq!(mailer.sent().len(), 1);

    let response = ReminderResponse::from(second);
    assert_eq!(response.message, "No reminders needed this week.");
}

#[tokio::test]
async fn test_outside_window_and_missing_dates_are_skipped() {
    let store = MockReminderStore::new();
    let mailer = MockMailer::new();
    store.add_vehicle(Uuid::new_v4(), vehicle("far@example.com", &[Some(date(2024, 3, 30))]));
    store.add_vehicle(Uuid::new_v4(), vehicle("none@example.com", &[None]));
    store.add_vehicle(Uuid::new_v4(), vehicle("past@example.com", &[Some(date(2024, 2, 1))]));
    store.add_vehicle(Uuid::new_v4(), vehicle("empty@example.com", &[]));

    let summary = dispatcher(&store, &mailer)
        .dispatch(None, date(2024, 2, 10))
        .await
        .unwrap();

    assert_eq!(
        summary,
        ReminderSummary {
            checked: 4,
            sent: 0,
            skipped: 4,
            failed: 0
        }
    );
    assert!(mailer.sent().is_empty());
    assert_eq!(store.mark_count(), 0);
}

#[tokio::test]
async fn test_failed_send_does_not_block_other_vehicles() {
    let store = MockReminderStore::new();
    let mailer = MockMailer::new();
    mailer.fail_for("broken@example.com");

    let broken = vehicle("broken@example.com", &[Some(date(2024, 2, 14))]);
    let broken_id = broken.vehicle_id;
    store.add_vehicle(Uuid::new_v4(), broken);
    store.add_vehicle(
        Uuid::new_v4(),
        vehicle("fine@example.com", &[Some(date(2024, 2, 14))]),
    );

    let summary = dispatcher(&store, &mailer)
        .dispatch(None, date(2024, 2, 10))
        .await
        .unwrap();

    assert_eq!(summary.sent, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(mailer.recipients(), vec!["fine@example.com".to_string()]);
    // A failed send leaves the marker untouched so the next sweep retries
    assert_eq!(store.last_reminder(broken_id), None);

    let response = ReminderResponse::from(summary);
    assert_eq!(response.message, "Some reminders could not be sent.");
}

#[tokio::test]
async fn test_marker_failure_counts_as_failed() {
    let store = MockReminderStore::new();
    let mailer = MockMailer::new();
    let candidate = vehicle("owner@example.com", &[Some(date(2024, 2, 14))]);
    store.fail_marking(candidate.vehicle_id);
    store.add_vehicle(Uuid::new_v4(), candidate);

    let summary = dispatcher(&store, &mailer)
        .dispatch(None, date(2024, 2, 10))
        .await
        .unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.sent, 0);
}

#[tokio::test]
async fn test_owner_scope_only_touches_own_vehicles() {
    let store = MockReminderStore::new();
    let mailer = MockMailer::new();
    let me = Uuid::new_v4();
    store.add_vehicle(me, vehicle("me@example.com", &[Some(date(2024, 2, 13))]));
    store.add_vehicle(
        Uuid::new_v4(),
        vehicle("other@example.com", &[Some(date(2024, 2, 13))]),
    );

    let summary = dispatcher(&store, &mailer)
        .dispatch(Some(me), date(2024, 2, 10))
        .await
        .unwrap();

    assert_eq!(summary.checked, 1);
    assert_eq!(mailer.recipients(), vec!["me@example.com".to_string()]);
    assert_eq!(
        ReminderResponse::from(summary).message,
        "Reminders sent successfully."
    );
}

#[tokio::test]
async fn test_no_vehicles_message() {
    let store = MockReminderStore::new();
    let mailer = MockMailer::new();

    let summary = dispatcher(&store, &mailer)
        .dispatch(Some(Uuid::new_v4()), Utc::now())
        .await
        .unwrap();

    assert_eq!(summary, ReminderSummary::default());
    assert_eq!(ReminderResponse::from(summary).message, "No vehicles found.");
}

#[tokio::test]
async fn test_changed_due_date_triggers_new_reminder() {
    let store = MockReminderStore::new();
    let mailer = MockMailer::new();
    let mut candidate = vehicle("owner@example.com", &[Some(date(2024, 2, 13))]);
    candidate.last_reminder_sent_date = Some(date(2024, 2, 20));
    store.add_vehicle(Uuid::new_v4(), candidate);

    let now = date(2024, 2, 10) + Duration::hours(6);
    let summary = dispatcher(&store, &mailer).dispatch(None, now).await.unwrap();

    assert_eq!(summary.sent, 1);
}
