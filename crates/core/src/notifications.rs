//! Notification dedup policy
//!
//! A fixed allow-list of system notification kinds carries a suppression
//! window; creating the same (user, kind) twice inside the window is
//! suppressed. All other kinds are never deduped. The existence check is
//! fail-open: a failing query must not block creation.

use chrono::Duration;
use studyflow_domain::constants::{
    EMAIL_VERIFIED_DEDUP_SECONDS, LOGIN_FAILED_DEDUP_SECONDS, LOGIN_SUCCESS_DEDUP_SECONDS,
    PASSWORD_CHANGED_DEDUP_SECONDS,
};
use studyflow_domain::NotificationKind;

/// Dedup window for a notification kind, or `None` when the kind is never
/// suppressed.
#[must_use]
pub fn suppression_window(kind: &NotificationKind) -> Option<Duration> {
    let seconds = match kind {
        NotificationKind::SystemLoginSuccess => LOGIN_SUCCESS_DEDUP_SECONDS,
        NotificationKind::SystemLoginFailed => LOGIN_FAILED_DEDUP_SECONDS,
        NotificationKind::SystemPasswordChanged => PASSWORD_CHANGED_DEDUP_SECONDS,
        NotificationKind::SystemEmailVerified => EMAIL_VERIFIED_DEDUP_SECONDS,
        NotificationKind::Other(_) => return None,
    };
    Some(Duration::seconds(seconds))
}
