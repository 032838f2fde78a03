//! Arbitration between several simultaneous enemies.

use super::{Awareness, EnemyCandidate};

/// Whether `challenger` should replace `current` as the target.
///
/// A threat gap larger than `margin` decides outright. Within the margin the
/// strictly closer candidate wins, and a tie keeps `current`.
#[must_use]
pub fn check_for_multiguns(
    current: &EnemyCandidate,
    challenger: &EnemyCandidate,
    margin: u32,
) -> bool {
    if current.threat.abs_diff(challenger.threat) > margin {
        return challenger.threat > current.threat;
    }
    challenger.distance_sq < current.distance_sq
}

/// Pick a target from `candidates`.
///
/// Visible candidates are always preferred to heard or remembered ones.
/// Among the preferred pool, every candidate within `margin` of the highest
/// threat stays in contention and the nearest of those wins. An exact
/// distance tie goes to the earlier candidate. Outside such ties the pick
/// does not depend on candidate order.
#[must_use]
pub fn select_target(candidates: &[EnemyCandidate], margin: u32) -> Option<&EnemyCandidate> {
    let any_visible = candidates.iter().any(|c| c.awareness == Awareness::Visible);
    let pool = || {
        candidates
            .iter()
            .filter(move |c| !any_visible || c.awareness == Awareness::Visible)
    };
    let peak = pool().map(|c| c.threat).max()?;
    pool()
        .filter(|c| c.threat.saturating_add(margin) >= peak)
        .reduce(|best, c| if c.distance_sq < best.distance_sq { c } else { best })
}
