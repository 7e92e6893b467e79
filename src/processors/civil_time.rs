//! Local civil time (Europe/Zurich) to UTC.
//!
//! During the autumn fall-back an hour of local time occurs twice; such
//! timestamps resolve to their first occurrence (summer time). During the
//! spring-forward an hour does not exist; such timestamps are read at the
//! offset in force before the gap, which moves them forward by the gap
//! length (02:30 becomes 03:30 summer time).

use crate::utils::time::CIVIL_TZ;
use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

/// Longest look-back when searching for the offset preceding a gap
const MAX_GAP_SEARCH_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    pub instant: DateTime<Utc>,
    /// The local time did not exist and was moved forward
    pub shifted: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct CivilTimeReconciler {
    tz: Tz,
}

impl CivilTimeReconciler {
    pub fn new() -> Self {
        Self { tz: CIVIL_TZ }
    }

    pub fn reconcile(&self, local: NaiveDateTime) -> Reconciled {
        match self.tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => Reconciled {
                instant: dt.with_timezone(&Utc),
                shifted: false,
            },
            LocalResult::Ambiguous(first, second) => Reconciled {
                instant: first.min(second).with_timezone(&Utc),
                shifted: false,
            },
            LocalResult::None => Reconciled {
                instant: self.shift_forward(local),
                shifted: true,
            },
        }
    }

    pub fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        self.reconcile(local).instant
    }

    pub fn reconcile_all(&self, locals: &[NaiveDateTime]) -> Vec<Reconciled> {
        locals.iter().map(|ts| self.reconcile(*ts)).collect()
    }

    pub fn to_local(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.tz)
    }

    /// Interpret a nonexistent local time at the offset in force just before the gap
    fn shift_forward(&self, local: NaiveDateTime) -> DateTime<Utc> {
        let step = TimeDelta::minutes(15);
        let mut probe = local - step;
        let limit = local - TimeDelta::hours(MAX_GAP_SEARCH_HOURS);

        while probe > limit {
            if let Some(before) = self.tz.from_local_datetime(&probe).latest() {
                let offset = before.offset().fix().local_minus_utc();
                return (local - TimeDelta::seconds(i64::from(offset))).and_utc();
            }
            probe -= step;
        }

        // No zone has a gap this long; fall back to reading the time as UTC
        local.and_utc()
    }
}

impl Default for CivilTimeReconciler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_winter_and_summer_offsets() {
        let r = CivilTimeReconciler::new();
        assert_eq!(r.to_utc(local(2025, 1, 15, 12, 0)), utc(2025, 1, 15, 11, 0));
        assert_eq!(r.to_utc(local(2025, 7, 15, 12, 0)), utc(2025, 7, 15, 10, 0));
    }

    #[test]
    fn test_ambiguous_resolves_to_first_occurrence() {
        // 2025-10-26: 03:00 CEST -> 02:00 CET, 02:30 happens twice
        let r = CivilTimeReconciler::new();
        let reconciled = r.reconcile(local(2025, 10, 26, 2, 30));
        assert_eq!(reconciled.instant, utc(2025, 10, 26, 0, 30));
        assert!(!reconciled.shifted);
    }

    #[test]
    fn test_nonexistent_shifts_forward_by_gap() {
        // 2025-03-30: 02:00 CET -> 03:00 CEST, 02:30 does not exist
        let r = CivilTimeReconciler::new();
        let reconciled = r.reconcile(local(2025, 3, 30, 2, 30));
        assert!(reconciled.shifted);
        assert_eq!(reconciled.instant, utc(2025, 3, 30, 1, 30));
        assert_eq!(
            r.to_local(reconciled.instant).naive_local(),
            local(2025, 3, 30, 3, 30)
        );
    }

    #[test]
    fn test_gap_edges() {
        let r = CivilTimeReconciler::new();
        assert_eq!(r.to_utc(local(2025, 3, 30, 1, 45)), utc(2025, 3, 30, 0, 45));
        assert_eq!(r.to_utc(local(2025, 3, 30, 2, 0)), utc(2025, 3, 30, 1, 0));
        assert_eq!(r.to_utc(local(2025, 3, 30, 3, 0)), utc(2025, 3, 30, 1, 0));
        assert!(!r.reconcile(local(2025, 3, 30, 3, 0)).shifted);
    }
}
