//! SQLite repository integration tests

mod support;

use chrono::{Duration, Utc};
use studyflow_core::{
    CustomEventRepository, IntegrationRepository, NotificationRepository, PreferencesRepository,
    SessionRepository,
};
use studyflow_domain::{
    CalendarProvider, CustomEvent, CustomEventSource, Notification, NotificationKind,
    SessionStatus, StudyPreferences, StudyflowError, TimeOfDay,
};
use support::{draft_fixture, integration_fixture, setup_store, utc};
use uuid::Uuid;

#[tokio::test]
async fn insert_assigns_id_and_planned_status() {
    let store = setup_store();
    let draft = draft_fixture("user-1", utc(2024, 3, 4, 8, 0));

    let session = store.sessions.insert(&draft).await.unwrap();

    assert_eq!(session.status, SessionStatus::Planned);
    assert_eq!(session.user_id, "user-1");
    assert_eq!(session.start_time, draft.start_time);
    assert!(session.external_event_id.is_none());

    let found = store.sessions.find_by_id(session.id).await.unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn list_in_range_is_start_ascending_and_bounded() {
    let store = setup_store();
    for day in [6, 4, 8] {
        let draft = draft_fixture("user-1", utc(2024, 3, day, 8, 0));
        store.sessions.insert(&draft).await.unwrap();
    }
    // out of range and other user
    store.sessions.insert(&draft_fixture("user-1", utc(2024, 4, 1, 8, 0))).await.unwrap();
    store.sessions.insert(&draft_fixture("user-2", utc(2024, 3, 5, 8, 0))).await.unwrap();

    let listed = store
        .sessions
        .list_in_range("user-1", utc(2024, 3, 1, 0, 0), utc(2024, 3, 31, 0, 0))
        .await
        .unwrap();

    let days: Vec<u32> = listed.iter().map(|s| s.start_time.format("%d").to_string().parse().unwrap()).collect();
    assert_eq!(days, vec![4, 6, 8]);
}

#[tokio::test]
async fn update_rewrites_row_and_flags_missing_sessions() {
    let store = setup_store();
    let mut session =
        store.sessions.insert(&draft_fixture("user-1", utc(2024, 3, 4, 8, 0))).await.unwrap();

    session.title = "Repaso intensivo".to_string();
    session.status = SessionStatus::Completed;
    store.sessions.update(&session).await.unwrap();

    let found = store.sessions.find_by_id(session.id).await.unwrap().unwrap();
    assert_eq!(found.title, "Repaso intensivo");
    assert_eq!(found.status, SessionStatus::Completed);

    session.id = Uuid::now_v7();
    let result = store.sessions.update(&session).await;
    assert!(matches!(result, Err(StudyflowError::NotFound(_))));
}

#[tokio::test]
async fn delete_removes_session() {
    let store = setup_store();
    let session =
        store.sessions.insert(&draft_fixture("user-1", utc(2024, 3, 4, 8, 0))).await.unwrap();

    store.sessions.delete(session.id).await.unwrap();
    assert!(store.sessions.find_by_id(session.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_auto_generated_after_spares_manual_and_past_sessions() {
    let store = setup_store();
    let now = Utc::now();

    let future_auto = store
        .sessions
        .insert(&draft_fixture("user-1", now + Duration::days(3)))
        .await
        .unwrap();
    store.sessions.insert(&draft_fixture("user-1", now - Duration::days(3))).await.unwrap();
    let mut manual = draft_fixture("user-1", now + Duration::days(5));
    manual.description = "Repaso de tema 4".to_string();
    store.sessions.insert(&manual).await.unwrap();

    let deleted = store.sessions.delete_auto_generated_after("user-1", now).await.unwrap();

    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].id, future_auto.id);
    assert!(store.sessions.find_by_id(future_auto.id).await.unwrap().is_none());

    let remaining = store
        .sessions
        .list_in_range("user-1", now - Duration::days(30), now + Duration::days(30))
        .await
        .unwrap();
    assert_eq!(remaining.len(), 2);
}

#[tokio::test]
async fn set_external_ref_records_primary_mirror() {
    let store = setup_store();
    let session =
        store.sessions.insert(&draft_fixture("user-1", utc(2024, 3, 4, 8, 0))).await.unwrap();

    store
        .sessions
        .set_external_ref(session.id, CalendarProvider::Google, "gcal-event-1")
        .await
        .unwrap();

    let found = store.sessions.find_by_id(session.id).await.unwrap().unwrap();
    assert_eq!(found.external_event_id.as_deref(), Some("gcal-event-1"));
    assert_eq!(found.calendar_provider, Some(CalendarProvider::Google));
}

#[tokio::test]
async fn set_external_ref_on_missing_session_is_not_found() {
    let store = setup_store();
    let result = store
        .sessions
        .set_external_ref(Uuid::now_v7(), CalendarProvider::Google, "gcal-event-1")
        .await;
    assert!(matches!(result, Err(StudyflowError::NotFound(_))));
}

#[tokio::test]
async fn list_active_orders_by_creation_time() {
    let store = setup_store();
    let mut microsoft = integration_fixture("user-1", CalendarProvider::Microsoft, 60);
    microsoft.created_at = utc(2024, 1, 1, 0, 0);
    let mut google = integration_fixture("user-1", CalendarProvider::Google, 60);
    google.created_at = utc(2024, 2, 1, 0, 0);

    // insertion order must not matter
    store.integrations.upsert(&google).await.unwrap();
    store.integrations.upsert(&microsoft).await.unwrap();

    let active = store.integrations.list_active("user-1").await.unwrap();
    let providers: Vec<CalendarProvider> = active.iter().map(|i| i.provider).collect();
    assert_eq!(providers, vec![CalendarProvider::Microsoft, CalendarProvider::Google]);
}

#[tokio::test]
async fn upsert_replaces_credential_per_user_provider_pair() {
    let store = setup_store();
    let first = integration_fixture("user-1", CalendarProvider::Google, 60);
    store.integrations.upsert(&first).await.unwrap();

    let mut replacement = integration_fixture("user-1", CalendarProvider::Google, 120);
    replacement.access_token = "access-new".to_string();
    store.integrations.upsert(&replacement).await.unwrap();

    let active = store.integrations.list_active("user-1").await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].access_token, "access-new");
}

#[tokio::test]
async fn update_tokens_keeps_stored_refresh_token_when_not_rotated() {
    let store = setup_store();
    let integration = integration_fixture("user-1", CalendarProvider::Google, 1);
    store.integrations.upsert(&integration).await.unwrap();
    let stored = &store.integrations.list_active("user-1").await.unwrap()[0];

    let expires_at = Utc::now() + Duration::hours(1);
    store.integrations.update_tokens(stored.id, "access-2", None, expires_at).await.unwrap();

    let after = &store.integrations.list_active("user-1").await.unwrap()[0];
    assert_eq!(after.access_token, "access-2");
    assert_eq!(after.refresh_token, integration.refresh_token);
}

#[tokio::test]
async fn update_tokens_applies_rotated_refresh_token() {
    let store = setup_store();
    let integration = integration_fixture("user-1", CalendarProvider::Microsoft, 1);
    store.integrations.upsert(&integration).await.unwrap();
    let stored = &store.integrations.list_active("user-1").await.unwrap()[0];

    let expires_at = Utc::now() + Duration::hours(1);
    store
        .integrations
        .update_tokens(stored.id, "access-2", Some("refresh-rotated"), expires_at)
        .await
        .unwrap();

    let after = &store.integrations.list_active("user-1").await.unwrap()[0];
    assert_eq!(after.refresh_token.as_deref(), Some("refresh-rotated"));
}

#[tokio::test]
async fn delete_integration_removes_only_that_provider() {
    let store = setup_store();
    store
        .integrations
        .upsert(&integration_fixture("user-1", CalendarProvider::Google, 60))
        .await
        .unwrap();
    store
        .integrations
        .upsert(&integration_fixture("user-1", CalendarProvider::Microsoft, 60))
        .await
        .unwrap();

    store.integrations.delete("user-1", CalendarProvider::Google).await.unwrap();

    let active = store.integrations.list_active("user-1").await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].provider, CalendarProvider::Microsoft);
}

#[tokio::test]
async fn preferences_round_trip_and_upsert() {
    let store = setup_store();
    let mut preferences = StudyPreferences {
        user_id: "user-1".to_string(),
        days_of_week: vec![1, 3, 5],
        time_of_day: TimeOfDay::Morning,
        session_minutes: 90,
        timezone: "Europe/Madrid".to_string(),
        updated_at: Utc::now(),
    };
    store.preferences.upsert(&preferences).await.unwrap();

    preferences.time_of_day = TimeOfDay::Evening;
    preferences.days_of_week = vec![2, 4];
    store.preferences.upsert(&preferences).await.unwrap();

    let found = store.preferences.find("user-1").await.unwrap().unwrap();
    assert_eq!(found.days_of_week, vec![2, 4]);
    assert_eq!(found.time_of_day, TimeOfDay::Evening);
    assert_eq!(found.timezone, "Europe/Madrid");

    assert!(store.preferences.find("user-2").await.unwrap().is_none());
}

#[tokio::test]
async fn custom_events_overlap_query() {
    let store = setup_store();
    let event = CustomEvent {
        id: Uuid::now_v7(),
        user_id: "user-1".to_string(),
        title: "Dentista".to_string(),
        description: None,
        start_time: utc(2024, 3, 4, 9, 0),
        end_time: utc(2024, 3, 4, 10, 0),
        all_day: false,
        external_event_id: None,
        provider: None,
        source: CustomEventSource::UserCreated,
    };
    store.custom_events.insert(&event).await.unwrap();

    // window starting inside the event still sees it
    let overlapping = store
        .custom_events
        .list_in_range("user-1", utc(2024, 3, 4, 9, 30), utc(2024, 3, 5, 0, 0))
        .await
        .unwrap();
    assert_eq!(overlapping.len(), 1);
    assert_eq!(overlapping[0].title, "Dentista");

    let disjoint = store
        .custom_events
        .list_in_range("user-1", utc(2024, 3, 4, 10, 0), utc(2024, 3, 5, 0, 0))
        .await
        .unwrap();
    assert!(disjoint.is_empty());
}

#[tokio::test]
async fn notification_existence_probe_respects_window_and_kind() {
    let store = setup_store();
    let notification = Notification {
        id: Uuid::now_v7(),
        user_id: "user-1".to_string(),
        kind: NotificationKind::SystemLoginFailed,
        title: "Intento de inicio de sesión fallido".to_string(),
        body: None,
        created_at: Utc::now(),
    };
    store.notifications.insert(&notification).await.unwrap();

    let since = Utc::now() - Duration::seconds(60);
    assert!(store
        .notifications
        .exists_since("user-1", &NotificationKind::SystemLoginFailed, since)
        .await
        .unwrap());
    assert!(!store
        .notifications
        .exists_since("user-1", &NotificationKind::SystemLoginSuccess, since)
        .await
        .unwrap());
    assert!(!store
        .notifications
        .exists_since("user-2", &NotificationKind::SystemLoginFailed, since)
        .await
        .unwrap());
    assert!(!store
        .notifications
        .exists_since("user-1", &NotificationKind::SystemLoginFailed, Utc::now() + Duration::seconds(5))
        .await
        .unwrap());
}
