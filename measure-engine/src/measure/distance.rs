use bevy::log::debug;
use constants::interaction::{DISTANCE_GRAPH_NAME, DISTANCE_OBJECT_NAME};

use super::ToolType;
use super::align::alignment_rotation;
use super::host::Host;
use super::input::{Flow, ToolKey};
use super::params::{INT_KINDS, log_failure};
use super::session::{Phase, ToolState, ToolVariant, Transition};

/// Two-point distance measurement.
#[derive(Debug, Default)]
pub struct DistanceTool;

impl ToolVariant for DistanceTool {
    const TOOL: ToolType = ToolType::Distance;

    fn hint(&self) -> &'static str {
        "Click start. Ctrl snap. Esc cancel."
    }

    fn phase_transition(
        &mut self,
        transition: Transition,
        state: &mut ToolState,
        host: &mut Host,
    ) -> Flow {
        match (state.phase, transition) {
            (Phase::Idle | Phase::PendingFirst, Transition::Press(location)) => {
                state.begin_session(host, DISTANCE_OBJECT_NAME, vec![location, location]);
                state.attach_graph(host, DISTANCE_GRAPH_NAME);
                Flow::Running
            }
            (Phase::Drawing, Transition::Press(_)) => {
                let placed = state.session.as_ref().map_or(0, |s| s.points.len());
                if placed >= 2 {
                    state.complete()
                } else {
                    Flow::Running
                }
            }
            (Phase::Drawing, Transition::Move(location)) => {
                if let Some(session) = state.session.as_mut() {
                    session.set_free_point(location);
                    session.sync(host);
                }
                Flow::Running
            }
            (Phase::Drawing, Transition::Key(ToolKey::E)) => {
                align_to_surface(state, host);
                Flow::Running
            }
            (_, Transition::Move(_)) => Flow::Running,
            _ => Flow::PassThrough,
        }
    }
}

/// Rotate the measurement so its label lies flat on the surface under the pointer.
/// Pressing again on the same surface flips it by a half turn.
fn align_to_surface(state: &mut ToolState, host: &mut Host) {
    let Some(hit) = state.last_hit else {
        debug!("alignment skipped: pointer is not over a surface");
        return;
    };
    let Some((start, end)) = state
        .session
        .as_ref()
        .and_then(|s| Some((*s.points.first()?, *s.points.get(1)?)))
    else {
        return;
    };
    let Some(degrees) = alignment_rotation(start, end, hit.normal) else {
        debug!("alignment skipped: segment is degenerate or parallel to the surface normal");
        return;
    };

    let result = state.edit_parameters(host, |target| {
        target.set("Rotation", degrees as f64, INT_KINDS, true)
    });
    if let Err(err) = result {
        log_failure("surface alignment", &err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::host::HostMode;
    use crate::measure::input::{InputKind, Modifiers, PointerButton, ScrollDirection, ToolEvent};
    use crate::measure::params::InputValue;
    use crate::measure::session::{FrameContext, MeasureTool, ReportLevel};
    use crate::measure::settings::MeasureSettings;
    use crate::measure::snapping::SnapSettings;
    use crate::measure::testing::{Harness, OrthoView, TriangleScene, test_area};
    use bevy::math::{Mat4, Vec2, Vec3};

    fn frame() -> FrameContext {
        FrameContext {
            mode: HostMode::Object,
            active_tool: Some(ToolType::Distance),
            area: Some(test_area()),
            snap: SnapSettings {
                enabled: false,
                ..Default::default()
            },
        }
    }

    fn start() -> MeasureTool<DistanceTool> {
        MeasureTool::invoke(DistanceTool, MeasureSettings::default(), &frame()).unwrap()
    }

    fn at(view: &OrthoView, kind: InputKind, world: Vec3) -> ToolEvent {
        ToolEvent::new(kind, view.window_point(world), Modifiers::NONE)
    }

    #[test]
    fn click_move_click_completes_with_two_points() {
        let mut harness = Harness::new(TriangleScene::empty(), OrthoView::new(50.0));
        let view = harness.view.clone();
        let mut tool = start();
        let frame = frame();
        let a = Vec3::new(-2.0, 1.0, 0.0);
        let b = Vec3::new(3.0, -1.0, 0.0);

        let mut host = harness.host();
        assert_eq!(tool.handle(&at(&view, InputKind::PointerMove, a), &frame, &mut host), Flow::Running);
        assert_eq!(tool.phase(), Phase::PendingFirst);
        assert!(tool.preview_marker().unwrap().abs_diff_eq(a, 1e-4));
        assert!(tool.geometry().is_none());

        let press = InputKind::Press(PointerButton::Primary);
        assert_eq!(tool.handle(&at(&view, press, a), &frame, &mut host), Flow::Running);
        assert_eq!(tool.phase(), Phase::Drawing);
        assert!(tool.preview_marker().is_none());

        tool.handle(&at(&view, InputKind::PointerMove, b), &frame, &mut host);
        assert_eq!(tool.handle(&at(&view, press, b), &frame, &mut host), Flow::Finished);
        assert_eq!(tool.phase(), Phase::Complete);

        let points = tool.points();
        assert_eq!(points.len(), 2);
        assert!(points[0].abs_diff_eq(a, 1e-4));
        assert!(points[1].abs_diff_eq(b, 1e-4));

        let id = tool.geometry().unwrap();
        drop(host);
        assert_eq!(harness.geometry.points[&id].len(), 2);
        assert_eq!(harness.wrappers.attached, vec![(id, DISTANCE_GRAPH_NAME.to_string())]);
        assert!(harness.geometry.destroyed.is_empty());
    }

    #[test]
    fn escape_while_drawing_removes_geometry() {
        let mut harness = Harness::new(TriangleScene::empty(), OrthoView::new(50.0));
        let view = harness.view.clone();
        let mut tool = start();
        let frame = frame();

        let mut host = harness.host();
        let press = InputKind::Press(PointerButton::Primary);
        tool.handle(&at(&view, press, Vec3::ZERO), &frame, &mut host);
        let id = tool.geometry().unwrap();

        let esc = ToolEvent::new(InputKind::Key(ToolKey::Escape), Vec2::ZERO, Modifiers::NONE);
        assert_eq!(tool.handle(&esc, &frame, &mut host), Flow::Cancelled);
        drop(host);

        assert_eq!(tool.phase(), Phase::Cancelled);
        assert_eq!(harness.geometry.destroyed, vec![id]);
        assert_eq!(harness.wrappers.detached, vec![id]);
        assert!(!harness.geometry.points.contains_key(&id));
    }

    #[test]
    fn right_click_before_first_point_cancels_without_geometry() {
        let mut harness = Harness::new(TriangleScene::empty(), OrthoView::new(50.0));
        let view = harness.view.clone();
        let mut tool = start();

        let mut host = harness.host();
        let rmb = at(&view, InputKind::Press(PointerButton::Secondary), Vec3::ZERO);
        assert_eq!(tool.handle(&rmb, &frame(), &mut host), Flow::Cancelled);
        drop(host);
        assert!(harness.geometry.created.is_empty());
    }

    #[test]
    fn ctrl_scroll_adjusts_rotation_while_drawing() {
        let mut harness = Harness::new(TriangleScene::empty(), OrthoView::new(50.0));
        let view = harness.view.clone();
        let mut tool = start();
        let frame = frame();

        let mut host = harness.host();
        tool.handle(&at(&view, InputKind::Press(PointerButton::Primary), Vec3::ZERO), &frame, &mut host);
        tool.take_reports();

        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        let scroll = ToolEvent::new(
            InputKind::Scroll(ScrollDirection::Up),
            view.window_point(Vec3::ZERO),
            ctrl,
        );
        assert_eq!(tool.handle(&scroll, &frame, &mut host), Flow::Running);
        assert_eq!(tool.handle(&scroll, &frame, &mut host), Flow::Running);
        let id = tool.geometry().unwrap();
        drop(host);

        assert_eq!(harness.wrappers.value(id, "Socket_3"), Some(InputValue::Int(30)));
        let reports = tool.take_reports();
        assert_eq!(reports.last().unwrap().message, "Rotation: 30");
        assert_eq!(reports.last().unwrap().level, ReportLevel::Info);
    }

    #[test]
    fn numpad_plus_and_minus_act_as_scroll() {
        let mut harness = Harness::new(TriangleScene::empty(), OrthoView::new(50.0));
        let view = harness.view.clone();
        let mut tool = start();
        let frame = frame();
        let cursor = view.window_point(Vec3::ZERO);
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };

        let mut host = harness.host();
        tool.handle(&at(&view, InputKind::Press(PointerButton::Primary), Vec3::ZERO), &frame, &mut host);

        let ctrl_plus = ToolEvent::new(InputKind::Key(ToolKey::NumpadPlus), cursor, ctrl);
        assert_eq!(tool.handle(&ctrl_plus, &frame, &mut host), Flow::Running);
        let id = tool.geometry().unwrap();
        drop(host);
        assert_eq!(harness.wrappers.value(id, "Socket_3"), Some(InputValue::Int(15)));

        let mut host = harness.host();
        let plain_minus = ToolEvent::new(InputKind::Key(ToolKey::NumpadMinus), cursor, Modifiers::NONE);
        assert_eq!(tool.handle(&plain_minus, &frame, &mut host), Flow::PassThrough);
        let ctrl_minus = ToolEvent::new(InputKind::Key(ToolKey::NumpadMinus), cursor, ctrl);
        assert_eq!(tool.handle(&ctrl_minus, &frame, &mut host), Flow::Running);
        assert_eq!(tool.handle(&ctrl_minus, &frame, &mut host), Flow::Running);
        drop(host);

        assert_eq!(harness.wrappers.value(id, "Socket_3"), Some(InputValue::Int(-15)));
        assert_eq!(tool.phase(), Phase::Drawing);
    }

    #[test]
    fn plain_scroll_is_passed_to_navigation() {
        let mut harness = Harness::new(TriangleScene::empty(), OrthoView::new(50.0));
        let view = harness.view.clone();
        let mut tool = start();
        let frame = frame();

        let mut host = harness.host();
        tool.handle(&at(&view, InputKind::Press(PointerButton::Primary), Vec3::ZERO), &frame, &mut host);
        let scroll = at(&view, InputKind::Scroll(ScrollDirection::Down), Vec3::ZERO);
        assert_eq!(tool.handle(&scroll, &frame, &mut host), Flow::PassThrough);
        let middle = at(&view, InputKind::Press(PointerButton::Middle), Vec3::ZERO);
        assert_eq!(tool.handle(&middle, &frame, &mut host), Flow::PassThrough);
    }

    #[test]
    fn modified_scroll_before_first_point_passes_through() {
        let mut harness = Harness::new(TriangleScene::empty(), OrthoView::new(50.0));
        let view = harness.view.clone();
        let mut tool = start();

        let mut host = harness.host();
        let alt = Modifiers {
            alt: true,
            ..Modifiers::NONE
        };
        let scroll = ToolEvent::new(
            InputKind::Scroll(ScrollDirection::Up),
            view.window_point(Vec3::ZERO),
            alt,
        );
        assert_eq!(tool.handle(&scroll, &frame(), &mut host), Flow::PassThrough);
    }

    #[test]
    fn aligning_twice_returns_to_the_original_rotation() {
        // Floor facing the camera along +Z, segment along X.
        let mut harness = Harness::new(
            TriangleScene::unit_triangle(Mat4::from_scale(Vec3::splat(10.0))),
            OrthoView::new(50.0),
        );
        let view = harness.view.clone();
        let mut tool = start();
        let frame = frame();
        let a = Vec3::new(1.0, 1.0, 0.0);
        let b = Vec3::new(4.0, 1.0, 0.0);

        let mut host = harness.host();
        tool.handle(&at(&view, InputKind::Press(PointerButton::Primary), a), &frame, &mut host);
        tool.handle(&at(&view, InputKind::PointerMove, b), &frame, &mut host);
        let e = ToolEvent::new(InputKind::Key(ToolKey::E), Vec2::ZERO, Modifiers::NONE);
        let id = tool.geometry().unwrap();

        tool.handle(&e, &frame, &mut host);
        let first = host.wrappers.read(id, "Socket_3");
        tool.handle(&e, &frame, &mut host);
        let second = host.wrappers.read(id, "Socket_3");
        tool.handle(&e, &frame, &mut host);
        let third = host.wrappers.read(id, "Socket_3");

        assert_eq!(first, Some(InputValue::Int(180)));
        assert_eq!(second, Some(InputValue::Int(0)));
        assert_eq!(third, first);
        assert_eq!(tool.phase(), Phase::Drawing);
    }

    #[test]
    fn alignment_without_surface_is_a_silent_no_op() {
        let mut harness = Harness::new(TriangleScene::empty(), OrthoView::new(50.0));
        let view = harness.view.clone();
        let mut tool = start();
        let frame = frame();

        let mut host = harness.host();
        tool.handle(&at(&view, InputKind::Press(PointerButton::Primary), Vec3::ZERO), &frame, &mut host);
        tool.handle(&at(&view, InputKind::PointerMove, Vec3::X), &frame, &mut host);
        tool.take_reports();
        let e = ToolEvent::new(InputKind::Key(ToolKey::E), Vec2::ZERO, Modifiers::NONE);
        assert_eq!(tool.handle(&e, &frame, &mut host), Flow::Running);
        drop(host);

        assert!(harness.wrappers.active_toggles.is_empty());
        assert!(tool.take_reports().is_empty());
    }

    #[test]
    fn missing_graph_asset_warns_and_keeps_drawing() {
        let mut harness = Harness::new(TriangleScene::empty(), OrthoView::new(50.0));
        harness.wrappers.assets.clear();
        let view = harness.view.clone();
        let mut tool = start();
        let frame = frame();

        let mut host = harness.host();
        let press = InputKind::Press(PointerButton::Primary);
        tool.handle(&at(&view, press, Vec3::ZERO), &frame, &mut host);
        assert_eq!(tool.phase(), Phase::Drawing);

        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        let scroll = ToolEvent::new(
            InputKind::Scroll(ScrollDirection::Up),
            view.window_point(Vec3::ZERO),
            ctrl,
        );
        assert_eq!(tool.handle(&scroll, &frame, &mut host), Flow::Running);
        assert_eq!(tool.handle(&at(&view, press, Vec3::X), &frame, &mut host), Flow::Finished);
        drop(host);

        let warnings: Vec<_> = tool
            .take_reports()
            .into_iter()
            .filter(|r| r.level == ReportLevel::Warning)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains(DISTANCE_GRAPH_NAME));
    }
}
