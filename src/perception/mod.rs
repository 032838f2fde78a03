//! Geometric perception: view cone, line of sight and view-angle deltas.
//!
//! None of these functions fault on stale handles; a handle that no longer
//! resolves is simply not visible.

pub mod roster;
pub mod sound;

use glam::Vec3;

use crate::config::PerceptionConfig;
use crate::entity::EntityHandle;
use crate::vector_math::{angle_between, vec_to_angles, ViewAngles};
use crate::world::WorldQuery;

/// Slack, in degrees, granted at the view-cone boundary so that a target
/// exactly on the half-angle classifies as inside despite rounding.
const FOV_BOUNDARY_SLACK: f32 = 1e-3;

/// Where a point falls relative to the view cone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOfView {
    /// Within the central focus zone.
    Focus,
    /// Inside the cone but outside the focus zone.
    Peripheral,
    /// Beyond either half-angle.
    Outside,
}

impl FieldOfView {
    /// Whether the point is inside the cone at all.
    #[must_use]
    pub const fn contains(self) -> bool {
        !matches!(self, Self::Outside)
    }
}

/// Classify `dest` against the view cone of an eye at `eye` looking along `view`.
///
/// The test is purely geometric; occlusion is not considered. The horizontal
/// and vertical half-angles are inclusive bounds. A point coinciding with the
/// eye is in focus.
#[must_use]
pub fn in_field_of_view(
    view: ViewAngles,
    eye: Vec3,
    dest: Vec3,
    config: &PerceptionConfig,
) -> FieldOfView {
    let to_dest = dest - eye;
    if to_dest == Vec3::ZERO {
        return FieldOfView::Focus;
    }
    let delta = view.delta_to(vec_to_angles(to_dest));
    let yaw_off = delta.yaw.abs();
    let pitch_off = delta.pitch.abs();

    let h = config.fov_half_angle_h + FOV_BOUNDARY_SLACK;
    let v = config.fov_half_angle_v + FOV_BOUNDARY_SLACK;
    if yaw_off > h || pitch_off > v {
        return FieldOfView::Outside;
    }
    if yaw_off <= config.fov_half_angle_h * config.focus_fraction
        && pitch_off <= config.fov_half_angle_v * config.focus_fraction
    {
        FieldOfView::Focus
    } else {
        FieldOfView::Peripheral
    }
}

/// Whether a straight line from `eye` to `dest` is unobstructed.
///
/// The bot's own hull never blocks its sight.
#[must_use]
pub fn can_see_origin(
    world: &dyn WorldQuery,
    bot: EntityHandle,
    eye: Vec3,
    dest: Vec3,
) -> bool {
    !world.trace_line(eye, dest, Some(bot)).blocked()
}

/// First visible point of `target` (its eyes, then its origin), if any.
///
/// A trace that stops on the target itself counts as a clear sight line.
#[must_use]
pub fn visible_point_of(
    world: &dyn WorldQuery,
    bot: EntityHandle,
    eye: Vec3,
    target: EntityHandle,
) -> Option<Vec3> {
    let player = world.player(target)?;
    [player.eye_position(), player.origin]
        .into_iter()
        .find(|&point| {
            let trace = world.trace_line(eye, point, Some(bot));
            !trace.blocked() || trace.hit == Some(target)
        })
}

/// Angle in degrees between where a viewer at `eye` looks and `target`.
///
/// Zero means the viewer looks straight at the target; `180` means directly
/// away. A target at the eye itself yields `0`.
#[must_use]
pub fn view_angle_diff(eye: Vec3, view: ViewAngles, target: Vec3) -> f32 {
    angle_between(view.forward(), target - eye)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{MockWorldQuery, TraceResult};
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case::ahead(Vec3::new(100.0, 0.0, 0.0), FieldOfView::Focus)]
    #[case::edge(Vec3::new(100.0, 100.0, 0.0), FieldOfView::Peripheral)]
    #[case::side(Vec3::new(0.0, 100.0, 0.0), FieldOfView::Outside)]
    #[case::behind(Vec3::new(-100.0, 0.0, 0.0), FieldOfView::Outside)]
    #[case::overhead(Vec3::new(10.0, 0.0, 100.0), FieldOfView::Outside)]
    fn classifies_against_cone(#[case] dest: Vec3, #[case] expected: FieldOfView) {
        let config = PerceptionConfig::default();
        let fov = in_field_of_view(ViewAngles::default(), Vec3::ZERO, dest, &config);
        assert_eq!(fov, expected);
    }

    #[test]
    fn own_hull_is_ignored_by_sight_trace() {
        let bot = EntityHandle::new(1, 0);
        let mut world = MockWorldQuery::new();
        world
            .expect_trace_line()
            .withf(move |_, _, ignore| *ignore == Some(bot))
            .returning(|_, _, _| TraceResult::CLEAR);
        assert!(can_see_origin(&world, bot, Vec3::ZERO, Vec3::X * 50.0));
    }

    #[test]
    fn stale_target_is_not_visible() {
        let mut world = MockWorldQuery::new();
        world.expect_player().returning(|_| None);
        world.expect_trace_line().never();
        let seen = visible_point_of(
            &world,
            EntityHandle::new(1, 0),
            Vec3::ZERO,
            EntityHandle::new(2, 3),
        );
        assert_eq!(seen, None);
    }

    #[test]
    fn view_angle_diff_measures_turn_needed() {
        let diff = view_angle_diff(Vec3::ZERO, ViewAngles::new(0.0, 90.0), Vec3::X);
        assert_relative_eq!(diff, 90.0, epsilon = 1e-3);
    }
}
