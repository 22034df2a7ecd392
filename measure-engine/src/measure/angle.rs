use bevy::math::Vec3;
use constants::interaction::{ANGLE_GRAPH_NAME, ANGLE_OBJECT_NAME, COMMIT_MOVE_EPSILON};

use super::ToolType;
use super::host::Host;
use super::input::{Flow, ToolKey};
use super::session::{Phase, ToolState, ToolVariant, Transition};

/// Three-point angle measurement. The middle point is the vertex.
#[derive(Debug, Default)]
pub struct AngleTool {
    /// Clicked second point, committed once the pointer has moved away from it.
    pending: Option<Vec3>,
}

impl AngleTool {
    /// Append the pending point once the pointer has left it. Some input backends
    /// follow a click with a move at the same position, which must not commit.
    fn commit_pending(&mut self, location: Vec3, state: &mut ToolState, host: &mut Host) {
        let Some(pending) = self.pending else {
            return;
        };
        if pending.distance(location) <= COMMIT_MOVE_EPSILON {
            return;
        }
        self.pending = None;
        if let Some(session) = state.session.as_mut() {
            session.points.truncate(1);
            session.points.extend([pending, location]);
        }
        state.attach_graph(host, ANGLE_GRAPH_NAME);
        state.phase = Phase::AwaitingThird;
    }

    fn remove_last_point(&mut self, state: &mut ToolState, host: &mut Host) {
        state.detach_graph(host);
        let pointer = state.pointer;
        if let Some(session) = state.session.as_mut() {
            session.points.pop();
            if let Some(location) = pointer {
                session.set_free_point(location);
            }
            session.sync(host);
        }
        state.phase = Phase::Drawing;
    }
}

impl ToolVariant for AngleTool {
    const TOOL: ToolType = ToolType::Angle;

    fn hint(&self) -> &'static str {
        "Click 3 points for angle."
    }

    fn phase_transition(
        &mut self,
        transition: Transition,
        state: &mut ToolState,
        host: &mut Host,
    ) -> Flow {
        match (state.phase, transition) {
            (Phase::Idle | Phase::PendingFirst, Transition::Press(location)) => {
                state.begin_session(host, ANGLE_OBJECT_NAME, vec![location, location]);
                Flow::Running
            }
            (Phase::Drawing, Transition::Press(location)) => {
                self.pending = Some(location);
                Flow::Running
            }
            (Phase::AwaitingThird, Transition::Press(_)) => state.complete(),
            (Phase::Drawing | Phase::AwaitingThird, Transition::Move(location)) => {
                if state.phase == Phase::Drawing {
                    self.commit_pending(location, state, host);
                }
                if let Some(session) = state.session.as_mut() {
                    session.set_free_point(location);
                    session.sync(host);
                }
                Flow::Running
            }
            (Phase::AwaitingThird, Transition::Key(ToolKey::Backspace)) => {
                self.remove_last_point(state, host);
                Flow::Running
            }
            (_, Transition::Move(_)) => Flow::Running,
            _ => Flow::PassThrough,
        }
    }
}
