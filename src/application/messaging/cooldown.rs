//! Per-command, per-user cooldown tracking

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Result of a cooldown check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownStatus {
    /// Invocation allowed; the timestamp has been recorded
    Ready,
    /// Invocation rejected; time left until the window closes
    Active { remaining: Duration },
}

impl CooldownStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, CooldownStatus::Ready)
    }
}

#[derive(Debug, Clone, Copy)]
struct CooldownEntry {
    stamped_at_ms: i64,
    expires_at_ms: i64,
}

/// Tracks the last invocation of each command by each user.
///
/// Entries carry their own expiry. Every check sweeps expired entries out of
/// all tables, so no timers are involved and idle commands do not linger.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    // command name -> user id -> entry
    entries: Mutex<HashMap<String, HashMap<String, CooldownEntry>>>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, HashMap<String, CooldownEntry>>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Check whether `user_id` may run `command` at `now`, stamping `now` if so.
    pub fn check_and_stamp(
        &self,
        command: &str,
        user_id: &str,
        cooldown: Duration,
        now: DateTime<Utc>,
    ) -> CooldownStatus {
        let now_ms = now.timestamp_millis();
        let window_ms = i64::try_from(cooldown.as_millis()).unwrap_or(i64::MAX);

        let mut entries = self.lock();
        let removed = sweep(&mut entries, now_ms);
        if removed > 0 {
            tracing::trace!("Dropped {} expired cooldown entries", removed);
        }

        let users = entries.entry(command.to_string()).or_default();
        if let Some(entry) = users.get(user_id) {
            let remaining_ms = (entry.expires_at_ms - now_ms).max(0);
            return CooldownStatus::Active {
                remaining: Duration::from_millis(remaining_ms as u64),
            };
        }

        users.insert(
            user_id.to_string(),
            CooldownEntry {
                stamped_at_ms: now_ms,
                expires_at_ms: now_ms.saturating_add(window_ms),
            },
        );
        tracing::trace!("Stamped cooldown for '{}' (user: {})", command, user_id);

        CooldownStatus::Ready
    }

    /// Timestamp of the live invocation for (command, user), if any
    pub fn last_invocation(&self, command: &str, user_id: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let now_ms = now.timestamp_millis();
        let entries = self.lock();
        let entry = entries.get(command)?.get(user_id)?;
        if entry.expires_at_ms <= now_ms {
            return None;
        }
        Utc.timestamp_millis_opt(entry.stamped_at_ms).single()
    }

    /// Number of stored entries. Expired ones are removed on the next check.
    pub fn len(&self) -> usize {
        self.lock().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sweep(entries: &mut HashMap<String, HashMap<String, CooldownEntry>>, now_ms: i64) -> usize {
    let mut removed = 0;
    for users in entries.values_mut() {
        let before = users.len();
        users.retain(|_, entry| entry.expires_at_ms > now_ms);
        removed += before - users.len();
    }
    entries.retain(|_, users| !users.is_empty());
    removed
}

/// Render a remaining duration the way users see it: seconds, one decimal,
/// halves rounded up.
pub fn format_remaining(remaining: Duration) -> String {
    let tenths = remaining.as_millis().saturating_add(50) / 100;
    format!("{}.{}", tenths / 10, tenths % 10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + ms).single().unwrap()
    }

    #[test]
    fn test_first_invocation_is_ready() {
        let tracker = CooldownTracker::new();
        let status = tracker.check_and_stamp("ping", "u1", Duration::from_secs(5), at(0));

        assert!(status.is_ready());
        assert_eq!(tracker.last_invocation("ping", "u1", at(0)), Some(at(0)));
    }

    #[test]
    fn test_second_invocation_within_window_is_rejected() {
        let tracker = CooldownTracker::new();
        tracker.check_and_stamp("ping", "u1", Duration::from_secs(5), at(0));

        let status = tracker.check_and_stamp("ping", "u1", Duration::from_secs(5), at(1_250));
        assert_eq!(
            status,
            CooldownStatus::Active { remaining: Duration::from_millis(3_750) }
        );
        // rejected calls do not move the stamp
        assert_eq!(tracker.last_invocation("ping", "u1", at(1_250)), Some(at(0)));
    }

    #[test]
    fn test_window_elapsed_allows_and_restamps() {
        let tracker = CooldownTracker::new();
        tracker.check_and_stamp("ping", "u1", Duration::from_secs(5), at(0));

        let status = tracker.check_and_stamp("ping", "u1", Duration::from_secs(5), at(5_000));
        assert!(status.is_ready());
        assert_eq!(tracker.last_invocation("ping", "u1", at(5_000)), Some(at(5_000)));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let tracker = CooldownTracker::new();
        let cd = Duration::from_secs(5);
        tracker.check_and_stamp("ping", "u1", cd, at(0));

        assert!(tracker.check_and_stamp("ping", "u2", cd, at(10)).is_ready());
        assert!(tracker.check_and_stamp("help", "u1", cd, at(10)).is_ready());
        assert!(!tracker.check_and_stamp("ping", "u1", cd, at(10)).is_ready());
    }

    #[test]
    fn test_idle_command_entries_are_swept() {
        let tracker = CooldownTracker::new();
        tracker.check_and_stamp("ping", "u1", Duration::from_secs(1), at(0));
        tracker.check_and_stamp("echo", "u2", Duration::from_secs(10), at(0));
        assert_eq!(tracker.len(), 2);

        // ping is never used again; a check on another command drops it
        let later = at(0) + ChronoDuration::seconds(2);
        assert!(!tracker.check_and_stamp("echo", "u2", Duration::from_secs(10), later).is_ready());
        assert_eq!(tracker.len(), 1);
        assert!(tracker.last_invocation("ping", "u1", later).is_none());
    }

    #[test]
    fn test_zero_cooldown_never_blocks() {
        let tracker = CooldownTracker::new();
        assert!(tracker.check_and_stamp("ping", "u1", Duration::ZERO, at(0)).is_ready());
        assert!(tracker.check_and_stamp("ping", "u1", Duration::ZERO, at(0)).is_ready());
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(Duration::from_millis(5_000)), "5.0");
        assert_eq!(format_remaining(Duration::from_millis(3_740)), "3.7");
        assert_eq!(format_remaining(Duration::from_millis(1_020)), "1.0");
        assert_eq!(format_remaining(Duration::from_millis(950)), "1.0");
    }

    #[test]
    fn test_format_remaining_rounds_halves_up() {
        assert_eq!(format_remaining(Duration::from_millis(1_250)), "1.3");
        assert_eq!(format_remaining(Duration::from_millis(250)), "0.3");
        assert_eq!(format_remaining(Duration::from_millis(1_249)), "1.2");
    }
}
