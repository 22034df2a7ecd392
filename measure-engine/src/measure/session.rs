//! Shared point-capture engine for the measurement tools.
//!
//! ```text
//! Idle ──move──> PendingFirst ──LMB──> Drawing ──LMB (2 pts)──> Complete   (distance)
//!                                        │
//!                                        └─LMB, move > ε──> AwaitingThird ──LMB──> Complete   (angle)
//!                                                               │
//!                                                               └─Backspace──> Drawing
//!
//! Esc / RMB / mode change / tool change from any live phase ──> Cancelled
//! ```
//!
//! [`MeasureTool`] owns everything the tools have in common: pointer
//! resolution, cancellation polling, UI pass-through, the help toggle and
//! scroll routing. What differs per tool lives behind [`ToolVariant`].

use bevy::log::{debug, warn};
use bevy::math::Vec3;

use super::ToolType;
use super::host::{GeometryId, Host, HostMode, RaycastHit, ViewArea};
use super::input::{Flow, InputKind, PointerButton, ToolEvent, ToolKey};
use super::keymap::ScrollBindings;
use super::params::{Applied, InputTable, ParameterTarget, log_failure};
use super::pointer::resolve_pointer;
use super::settings::MeasureSettings;
use super::snapping::SnapSettings;
use crate::error::{MeasureError, MeasureResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Invoked, pointer not yet seen over the viewport.
    Idle,
    /// Hovering before the first click. Only the preview marker is drawn.
    PendingFirst,
    /// Geometry exists and its free point follows the pointer.
    Drawing,
    /// Angle tool with three points, the last one free.
    AwaitingThird,
    Complete,
    Cancelled,
}

impl Phase {
    pub fn is_drawing(self) -> bool {
        matches!(self, Self::Drawing | Self::AwaitingThird)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Cancelled)
    }
}

/// Host state sampled once per frame, before any input is dispatched.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameContext {
    pub mode: HostMode,
    pub active_tool: Option<ToolType>,
    /// The 3D view the tool runs in. `None` when there is no 3D viewport.
    pub area: Option<ViewArea>,
    pub snap: SnapSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Info,
    Warning,
}

/// User-facing status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub level: ReportLevel,
    pub message: String,
}

/// The measurement being built and the geometry it owns.
pub struct Session {
    pub points: Vec<Vec3>,
    pub geometry: GeometryId,
    /// Inputs of the attached graph wrapper, if one is attached.
    pub inputs: Option<InputTable>,
}

impl Session {
    pub fn sync(&self, host: &mut Host) {
        host.geometry.set_points(self.geometry, &self.points);
        host.geometry.request_redraw();
    }

    /// Move the last point to `location`.
    pub fn set_free_point(&mut self, location: Vec3) {
        if let Some(last) = self.points.last_mut() {
            *last = location;
        }
    }
}

/// A resolved input handed to the tool-specific phase logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Press(Vec3),
    Move(Vec3),
    Key(ToolKey),
}

/// State shared by all measurement tools.
pub struct ToolState {
    pub phase: Phase,
    pub session: Option<Session>,
    /// Scene hit from the most recent pointer sample. Frame-local.
    pub last_hit: Option<RaycastHit>,
    /// Most recent resolved pointer location.
    pub pointer: Option<Vec3>,
    pub help_visible: bool,
    pub settings: MeasureSettings,
    reports: Vec<Report>,
}

impl ToolState {
    fn new(settings: MeasureSettings) -> Self {
        Self {
            phase: Phase::Idle,
            session: None,
            last_hit: None,
            pointer: None,
            help_visible: settings.show_help_overlay,
            settings,
            reports: Vec::new(),
        }
    }

    pub fn report(&mut self, level: ReportLevel, message: impl Into<String>) {
        self.reports.push(Report {
            level,
            message: message.into(),
        });
    }

    /// Create the backing geometry and enter `Drawing`.
    pub fn begin_session(&mut self, host: &mut Host, name: &str, points: Vec<Vec3>) {
        let geometry = host.geometry.create(name, &points);
        host.geometry.request_redraw();
        self.session = Some(Session {
            points,
            geometry,
            inputs: None,
        });
        self.phase = Phase::Drawing;
    }

    /// Attach the named measurement graph. A missing asset leaves the
    /// measurement without adjustable parameters.
    pub fn attach_graph(&mut self, host: &mut Host, asset: &str) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match host.wrappers.attach(session.geometry, asset) {
            Ok(decls) => session.inputs = Some(InputTable::new(decls)),
            Err(err) => {
                warn!("{err}");
                self.report(ReportLevel::Warning, err.to_string());
            }
        }
    }

    pub fn detach_graph(&mut self, host: &mut Host) {
        if let Some(session) = self.session.as_mut() {
            if session.inputs.take().is_some() {
                host.wrappers.detach(session.geometry);
            }
        }
    }

    /// Run a parameter edit against the attached graph and report the result.
    pub fn edit_parameters<F>(&mut self, host: &mut Host, edit: F) -> MeasureResult<Applied>
    where
        F: FnOnce(&mut ParameterTarget<'_>) -> MeasureResult<Applied>,
    {
        let session = self.session.as_ref().ok_or(MeasureError::NoWrapper)?;
        let table = session.inputs.as_ref().ok_or(MeasureError::NoWrapper)?;
        let mut target = ParameterTarget {
            geometry_id: session.geometry,
            table,
            wrappers: &mut *host.wrappers,
            geometry: &mut *host.geometry,
        };
        let applied = edit(&mut target)?;
        self.report(
            ReportLevel::Info,
            format!("{}: {}", applied.name, applied.value),
        );
        Ok(applied)
    }

    pub fn complete(&mut self) -> Flow {
        self.phase = Phase::Complete;
        Flow::Finished
    }
}

/// Tool-specific behaviour plugged into [`MeasureTool`].
pub trait ToolVariant {
    const TOOL: ToolType;

    /// Status hint shown when the tool starts.
    fn hint(&self) -> &'static str;

    fn scroll_bindings(&self, settings: &MeasureSettings) -> ScrollBindings {
        ScrollBindings::from_keymap(Self::TOOL, settings)
    }

    /// React to a resolved press, move or key in a live phase.
    fn phase_transition(&mut self, transition: Transition, state: &mut ToolState, host: &mut Host)
    -> Flow;
}

/// One interactive measurement action, from invocation to completion or cancellation.
pub struct MeasureTool<V: ToolVariant> {
    variant: V,
    state: ToolState,
}

impl<V: ToolVariant> MeasureTool<V> {
    /// Start the tool. Fails when there is no 3D viewport to measure in.
    pub fn invoke(variant: V, settings: MeasureSettings, frame: &FrameContext) -> MeasureResult<Self> {
        let has_viewport = frame
            .area
            .as_ref()
            .and_then(ViewArea::render_region)
            .is_some();
        if !has_viewport {
            return Err(MeasureError::InvalidContext("View3D not found"));
        }
        if frame.mode != HostMode::Object {
            return Err(MeasureError::InvalidContext("measurement requires object mode"));
        }

        let mut state = ToolState::new(settings);
        state.report(ReportLevel::Info, variant.hint());
        Ok(Self { variant, state })
    }

    pub fn tool(&self) -> ToolType {
        V::TOOL
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    #[cfg(test)]
    pub(crate) fn variant(&self) -> &V {
        &self.variant
    }

    pub fn points(&self) -> &[Vec3] {
        self.state
            .session
            .as_ref()
            .map(|s| s.points.as_slice())
            .unwrap_or(&[])
    }

    pub fn geometry(&self) -> Option<GeometryId> {
        self.state.session.as_ref().map(|s| s.geometry)
    }

    pub fn help_visible(&self) -> bool {
        self.state.help_visible
    }

    /// Location of the preview marker, drawn only until geometry exists.
    pub fn preview_marker(&self) -> Option<Vec3> {
        match self.state.phase {
            Phase::Idle | Phase::PendingFirst => self.state.pointer,
            _ => None,
        }
    }

    pub fn take_reports(&mut self) -> Vec<Report> {
        std::mem::take(&mut self.state.reports)
    }

    fn terminal_flow(&self) -> Option<Flow> {
        match self.state.phase {
            Phase::Complete => Some(Flow::Finished),
            Phase::Cancelled => Some(Flow::Cancelled),
            _ => None,
        }
    }

    /// Once-per-frame exit checks, run before any input of the frame.
    pub fn poll(&mut self, frame: &FrameContext, host: &mut Host) -> Option<Flow> {
        if let Some(flow) = self.terminal_flow() {
            return Some(flow);
        }
        if frame.area.is_none() {
            return Some(self.cancel(host, Some(MeasureError::InvalidContext("3D view closed"))));
        }
        if frame.mode != HostMode::Object {
            return Some(self.cancel(host, Some(MeasureError::InvalidContext("host left object mode"))));
        }
        if frame.active_tool != Some(V::TOOL) {
            debug!("{} tool no longer active, cancelling", V::TOOL.as_str());
            return Some(self.cancel(host, None));
        }
        None
    }

    /// Dispatch one input event.
    pub fn handle(&mut self, event: &ToolEvent, frame: &FrameContext, host: &mut Host) -> Flow {
        if let Some(flow) = self.terminal_flow() {
            return flow;
        }
        let Some(area) = frame.area.as_ref() else {
            return self.cancel(host, Some(MeasureError::InvalidContext("3D view closed")));
        };

        // Pointer input over panels belongs to the host UI, except moves while
        // drawing so an endpoint can land under a panel.
        if event.is_pointer() && area.is_over_ui(event.cursor) {
            let captured = self.state.phase.is_drawing() && event.kind == InputKind::PointerMove;
            if !captured {
                self.state.pointer = None;
                return Flow::PassThrough;
            }
        }

        match event.kind {
            InputKind::Key(ToolKey::Escape) | InputKind::Press(PointerButton::Secondary) => {
                return self.cancel(host, None);
            }
            InputKind::Key(ToolKey::H)
                if event.modifiers.ctrl && event.modifiers.alt && !event.modifiers.shift =>
            {
                self.toggle_help();
                return Flow::Running;
            }
            _ => {}
        }

        if event.is_navigation() && !event.modifiers.any() {
            return Flow::PassThrough;
        }
        if let Some(direction) = event.scroll_direction() {
            if self.state.phase.is_drawing() {
                let bindings = self.variant.scroll_bindings(&self.state.settings);
                if let Some(binding) = bindings.for_modifiers(event.modifiers) {
                    let step = binding.step * direction.sign();
                    let result = self.state.edit_parameters(host, |target| {
                        target.adjust(binding.keyword, step, binding.accepted)
                    });
                    if let Err(err) = result {
                        log_failure("scroll adjustment", &err);
                    }
                    return Flow::Running;
                }
            }
        }
        if event.is_navigation() {
            return Flow::PassThrough;
        }

        match event.kind {
            InputKind::PointerMove => {
                let Some(location) = self.resolve(event, frame, area, host) else {
                    return Flow::Running;
                };
                if self.state.phase == Phase::Idle {
                    self.state.phase = Phase::PendingFirst;
                }
                self.variant
                    .phase_transition(Transition::Move(location), &mut self.state, host)
            }
            InputKind::Press(PointerButton::Primary) => {
                let Some(location) = self.resolve(event, frame, area, host) else {
                    return Flow::Running;
                };
                self.variant
                    .phase_transition(Transition::Press(location), &mut self.state, host)
            }
            InputKind::Key(key) => {
                self.variant
                    .phase_transition(Transition::Key(key), &mut self.state, host)
            }
            _ => Flow::PassThrough,
        }
    }

    fn resolve(
        &mut self,
        event: &ToolEvent,
        frame: &FrameContext,
        area: &ViewArea,
        host: &mut Host,
    ) -> Option<Vec3> {
        match resolve_pointer(
            &mut *host.scene,
            host.view,
            area,
            event.cursor,
            frame.snap,
            event.modifiers.ctrl,
        ) {
            Ok(resolved) => {
                self.state.last_hit = resolved.hit;
                self.state.pointer = Some(resolved.location);
                Some(resolved.location)
            }
            Err(err) => {
                debug!("pointer sample skipped: {err}");
                None
            }
        }
    }

    fn toggle_help(&mut self) {
        self.state.help_visible = !self.state.help_visible;
        let shown = if self.state.help_visible { "shown" } else { "hidden" };
        self.state
            .report(ReportLevel::Info, format!("Help overlay {shown}"));
    }

    /// Abandon the measurement and remove its geometry.
    pub fn cancel(&mut self, host: &mut Host, reason: Option<MeasureError>) -> Flow {
        if let Some(flow) = self.terminal_flow() {
            return flow;
        }
        self.state.detach_graph(host);
        if let Some(session) = self.state.session.take() {
            host.geometry.destroy(session.geometry);
            host.geometry.request_redraw();
        }
        self.state.pointer = None;
        self.state.last_hit = None;
        self.state.phase = Phase::Cancelled;
        if let Some(err) = reason {
            warn!("measurement cancelled: {err}");
            self.state.report(ReportLevel::Warning, err.to_string());
        }
        Flow::Cancelled
    }
}
