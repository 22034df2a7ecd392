use bevy::ecs::system::SystemParam;
use bevy::input::ButtonState;
use bevy::input::keyboard::KeyboardInput;
use bevy::input::mouse::{MouseButtonInput, MouseWheel};
use bevy::picking::mesh_picking::ray_cast::MeshRayCast;
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow, RequestRedraw, WindowEvent, WindowFocused};
use bevy_common_assets::json::JsonAssetPlugin;

use super::help_overlay::{ScreenPanel, spawn_help_overlay, update_help_overlay, update_status_text};
use super::tool_manager::{
    EditorMode, ToolManager, ToolSelectionEvent, handle_tool_keyboard_shortcuts,
    handle_tool_selection_events,
};
use crate::engine::assets::{
    ConfigLoader, MeasurementGraphLibrary, WrapperRegistry, load_config_system,
};
use crate::engine::camera::{CameraView, NoCamera, ScrollCapture};
use crate::engine::geometry::{BevyGeometry, MeasurementObject, geometry_entity};
use crate::engine::gizmos::{
    draw_floor_grid, draw_measurements, draw_preview_marker, draw_scene_cursor,
};
use crate::engine::scene::{BevyScene, SceneCursor, UnitSettings};
use crate::error::MeasureResult;
use crate::measure::ToolType;
use crate::measure::angle::AngleTool;
use crate::measure::distance::DistanceTool;
use crate::measure::host::{Host, Region, ViewArea, ViewProjection};
use crate::measure::input::{
    Flow, InputKind, Modifiers, PointerButton, ScrollDirection, ToolEvent, ToolKey,
};
use crate::measure::session::{FrameContext, MeasureTool, Phase, Report, ReportLevel};
use crate::measure::settings::MeasureSettings;
use crate::measure::snapping::SnapSettings;

/// A running measurement of either kind.
pub enum MeasureAction {
    Distance(MeasureTool<DistanceTool>),
    Angle(MeasureTool<AngleTool>),
}

impl MeasureAction {
    fn invoke(tool: ToolType, settings: MeasureSettings, frame: &FrameContext) -> MeasureResult<Self> {
        Ok(match tool {
            ToolType::Distance => Self::Distance(MeasureTool::invoke(DistanceTool, settings, frame)?),
            ToolType::Angle => Self::Angle(MeasureTool::invoke(AngleTool::default(), settings, frame)?),
        })
    }

    pub fn tool(&self) -> ToolType {
        match self {
            Self::Distance(tool) => tool.tool(),
            Self::Angle(tool) => tool.tool(),
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Self::Distance(tool) => tool.phase(),
            Self::Angle(tool) => tool.phase(),
        }
    }

    pub fn points(&self) -> &[Vec3] {
        match self {
            Self::Distance(tool) => tool.points(),
            Self::Angle(tool) => tool.points(),
        }
    }

    fn poll(&mut self, frame: &FrameContext, host: &mut Host) -> Option<Flow> {
        match self {
            Self::Distance(tool) => tool.poll(frame, host),
            Self::Angle(tool) => tool.poll(frame, host),
        }
    }

    fn handle(&mut self, event: &ToolEvent, frame: &FrameContext, host: &mut Host) -> Flow {
        match self {
            Self::Distance(tool) => tool.handle(event, frame, host),
            Self::Angle(tool) => tool.handle(event, frame, host),
        }
    }

    fn take_reports(&mut self) -> Vec<Report> {
        match self {
            Self::Distance(tool) => tool.take_reports(),
            Self::Angle(tool) => tool.take_reports(),
        }
    }

    fn help_visible(&self) -> bool {
        match self {
            Self::Distance(tool) => tool.help_visible(),
            Self::Angle(tool) => tool.help_visible(),
        }
    }

    fn preview_marker(&self) -> Option<Vec3> {
        match self {
            Self::Distance(tool) => tool.preview_marker(),
            Self::Angle(tool) => tool.preview_marker(),
        }
    }
}

/// The measurement session currently driven by [`measure_session_system`], if any.
#[derive(Resource, Default)]
pub struct ActiveMeasurement {
    action: Option<MeasureAction>,
}

impl ActiveMeasurement {
    pub fn action(&self) -> Option<&MeasureAction> {
        self.action.as_ref()
    }

    pub fn tool(&self) -> Option<ToolType> {
        self.action.as_ref().map(MeasureAction::tool)
    }

    pub fn phase(&self) -> Option<Phase> {
        self.action.as_ref().map(MeasureAction::phase)
    }

    pub fn help_visible(&self) -> bool {
        self.action.as_ref().is_some_and(MeasureAction::help_visible)
    }

    pub fn preview_marker(&self) -> Option<Vec3> {
        self.action.as_ref().and_then(MeasureAction::preview_marker)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureStatus {
    /// The measurement stays in the scene.
    Finished,
    /// The measurement and its geometry were removed.
    Cancelled,
}

impl MeasureStatus {
    pub fn from_flow(flow: Flow) -> Option<Self> {
        match flow {
            Flow::Finished => Some(Self::Finished),
            Flow::Cancelled => Some(Self::Cancelled),
            Flow::Running | Flow::PassThrough => None,
        }
    }
}

/// Sent once per session when it completes or is cancelled.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasureFinishedEvent {
    pub tool: ToolType,
    pub status: MeasureStatus,
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct MeasureReportEvent(pub Report);

/// Everything the ray caster needs to answer scene queries.
#[derive(SystemParam)]
pub struct SceneAccess<'w, 's> {
    ray_cast: MeshRayCast<'w, 's>,
    surfaces: Query<'w, 's, (&'static Mesh3d, &'static GlobalTransform)>,
    meshes: Res<'w, Assets<Mesh>>,
    cursor: Res<'w, SceneCursor>,
    units: Res<'w, UnitSettings>,
}

#[derive(SystemParam)]
pub struct ViewAccess<'w, 's> {
    windows: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    cameras: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<Camera3d>>,
    panels: Query<
        'w,
        's,
        (&'static ComputedNode, &'static GlobalTransform, &'static InheritedVisibility),
        With<ScreenPanel>,
    >,
}

impl ViewAccess<'_, '_> {
    fn active_camera(&self) -> Option<CameraView<'_>> {
        self.cameras
            .iter()
            .find(|(camera, _)| camera.is_active)
            .map(|(camera, transform)| CameraView { camera, transform })
    }

    /// The window as a 3D view area: the camera viewport plus every visible screen panel.
    fn view_area(&self) -> Option<ViewArea> {
        let window = self.windows.single().ok()?;
        let view = self.active_camera()?;
        let size = Vec2::new(window.width(), window.height());
        let viewport = view
            .camera
            .logical_viewport_rect()
            .unwrap_or(Rect::from_corners(Vec2::ZERO, size));

        let mut area = ViewArea {
            origin: Vec2::ZERO,
            size,
            regions: vec![Region::viewport(viewport.min, viewport.size())],
        };
        for (node, transform, visibility) in &self.panels {
            if !visibility.get() {
                continue;
            }
            // UI layout is in physical pixels, centred on the node.
            let scale = node.inverse_scale_factor();
            let panel_size = node.size() * scale;
            let centre = transform.translation().truncate() * scale;
            area = area.with_panel(Region::panel(centre - panel_size * 0.5, panel_size));
        }
        Some(area)
    }
}

#[derive(SystemParam)]
pub struct MeasureOutput<'w> {
    finished: EventWriter<'w, MeasureFinishedEvent>,
    reports: EventWriter<'w, MeasureReportEvent>,
}

pub fn modifiers_from(keyboard: &ButtonInput<KeyCode>) -> Modifiers {
    Modifiers {
        ctrl: keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]),
        shift: keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
        alt: keyboard.any_pressed([KeyCode::AltLeft, KeyCode::AltRight]),
    }
}

pub fn tool_key(key_code: KeyCode) -> ToolKey {
    match key_code {
        KeyCode::Escape => ToolKey::Escape,
        KeyCode::Backspace => ToolKey::Backspace,
        KeyCode::KeyE => ToolKey::E,
        KeyCode::KeyH => ToolKey::H,
        KeyCode::NumpadAdd => ToolKey::NumpadPlus,
        KeyCode::NumpadSubtract => ToolKey::NumpadMinus,
        _ => ToolKey::Other,
    }
}

/// Pointer position and held keys as of the last window event read.
///
/// Replaying the events in arrival order gives every tool event the
/// modifiers that were held when it happened, even when a modifier changes
/// within the frame.
#[derive(Default)]
pub struct InputTracker {
    cursor: Vec2,
    keys: ButtonInput<KeyCode>,
}

impl InputTracker {
    pub fn modifiers(&self) -> Modifiers {
        modifiers_from(&self.keys)
    }

    /// Translate a window event into tool input, updating the tracked state first.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<ToolEvent> {
        let kind = match event {
            WindowEvent::CursorMoved(CursorMoved { position, .. }) => {
                self.cursor = *position;
                InputKind::PointerMove
            }
            WindowEvent::MouseButtonInput(MouseButtonInput { button, state, .. }) => {
                if *state != ButtonState::Pressed {
                    return None;
                }
                match button {
                    MouseButton::Left => InputKind::Press(PointerButton::Primary),
                    MouseButton::Right => InputKind::Press(PointerButton::Secondary),
                    MouseButton::Middle => InputKind::Press(PointerButton::Middle),
                    _ => return None,
                }
            }
            WindowEvent::MouseWheel(MouseWheel { y, .. }) => {
                if *y > 0.0 {
                    InputKind::Scroll(ScrollDirection::Up)
                } else if *y < 0.0 {
                    InputKind::Scroll(ScrollDirection::Down)
                } else {
                    return None;
                }
            }
            WindowEvent::KeyboardInput(KeyboardInput {
                key_code,
                state,
                repeat,
                ..
            }) => {
                match state {
                    ButtonState::Pressed => self.keys.press(*key_code),
                    ButtonState::Released => self.keys.release(*key_code),
                }
                if *state != ButtonState::Pressed || *repeat {
                    return None;
                }
                InputKind::Key(tool_key(*key_code))
            }
            // Key releases are not delivered to an unfocused window.
            WindowEvent::WindowFocused(WindowFocused { focused: false, .. }) => {
                self.keys.release_all();
                return None;
            }
            _ => return None,
        };
        Some(ToolEvent::new(kind, self.cursor, self.modifiers()))
    }
}

/// The help visibility the user left the session with, when it differs from the preference.
fn changed_help_preference(action: &MeasureAction, settings: &MeasureSettings) -> Option<bool> {
    let visible = action.help_visible();
    (visible != settings.show_help_overlay).then_some(visible)
}

/// Drive the active measurement: start it, poll it, feed it this frame's input in order.
pub fn measure_session_system(
    mut active: ResMut<ActiveMeasurement>,
    mut tool_manager: ResMut<ToolManager>,
    mode: Res<EditorMode>,
    snap: Res<SnapSettings>,
    mut settings: ResMut<MeasureSettings>,
    mut window_events: EventReader<WindowEvent>,
    mut input: Local<InputTracker>,
    mut scene: SceneAccess,
    view: ViewAccess,
    mut wrappers: ResMut<WrapperRegistry>,
    mut commands: Commands,
    mut redraw: EventWriter<RequestRedraw>,
    mut capture: ResMut<ScrollCapture>,
    mut output: MeasureOutput,
) {
    let events: Vec<ToolEvent> = window_events
        .read()
        .filter_map(|event| input.translate(event))
        .collect();

    let frame = FrameContext {
        mode: mode.0,
        active_tool: tool_manager.active_tool(),
        area: view.view_area(),
        snap: *snap,
    };

    if active.action.is_none() {
        let Some(tool) = tool_manager.active_tool() else {
            return;
        };
        match MeasureAction::invoke(tool, settings.clone(), &frame) {
            Ok(action) => {
                debug!("{} measurement started", tool.as_str());
                active.action = Some(action);
            }
            Err(err) => {
                warn!("Cannot start {} measurement: {err}", tool.as_str());
                output.reports.write(MeasureReportEvent(Report {
                    level: ReportLevel::Warning,
                    message: err.to_string(),
                }));
                output.finished.write(MeasureFinishedEvent {
                    tool,
                    status: MeasureStatus::Cancelled,
                });
                tool_manager.deactivate_current_tool();
                return;
            }
        }
    }
    let Some(action) = active.action.as_mut() else {
        return;
    };

    let camera = view.active_camera();
    let projection: &dyn ViewProjection = match &camera {
        Some(camera) => camera,
        None => &NoCamera,
    };
    let mut scene_query = BevyScene {
        ray_cast: &mut scene.ray_cast,
        surfaces: &scene.surfaces,
        meshes: &scene.meshes,
        cursor: *scene.cursor,
        units: *scene.units,
    };
    let mut geometry = BevyGeometry {
        commands: &mut commands,
        redraw: &mut redraw,
    };
    let mut host = Host {
        scene: &mut scene_query,
        view: projection,
        geometry: &mut geometry,
        wrappers: &mut *wrappers,
    };

    let mut outcome = action.poll(&frame, &mut host);
    for event in &events {
        if outcome.is_some() {
            break;
        }
        let flow = action.handle(event, &frame, &mut host);
        if flow == Flow::Running && event.scroll_direction().is_some() {
            capture.lock_zoom_this_frame = true;
        }
        if flow.is_terminal() {
            outcome = Some(flow);
        }
    }

    for report in action.take_reports() {
        output.reports.write(MeasureReportEvent(report));
    }
    // The help toggle outlives the session.
    if let Some(visible) = changed_help_preference(action, &settings) {
        settings.show_help_overlay = visible;
    }

    let Some(status) = outcome.and_then(MeasureStatus::from_flow) else {
        return;
    };
    let tool = action.tool();
    active.action = None;
    output.finished.write(MeasureFinishedEvent { tool, status });
    // A completed measurement restarts the tool next frame; cancelling leaves it.
    if status == MeasureStatus::Cancelled && tool_manager.is_tool_active(tool) {
        tool_manager.deactivate_current_tool();
    }
}

/// Drop graph wrappers whose measurement object was despawned.
pub fn prune_orphan_wrappers(
    mut removed: RemovedComponents<MeasurementObject>,
    objects: Query<(), With<MeasurementObject>>,
    mut wrappers: ResMut<WrapperRegistry>,
) {
    if removed.read().count() == 0 {
        return;
    }
    wrappers.retain(|id| geometry_entity(id).is_some_and(|entity| objects.contains(entity)));
}

pub fn log_measure_reports(mut reports: EventReader<MeasureReportEvent>) {
    for MeasureReportEvent(report) in reports.read() {
        match report.level {
            ReportLevel::Info => info!("{}", report.message),
            ReportLevel::Warning => warn!("{}", report.message),
        }
    }
}

pub fn log_finished_measurements(mut finished: EventReader<MeasureFinishedEvent>) {
    for event in finished.read() {
        match event.status {
            MeasureStatus::Finished => info!("{} measurement completed", event.tool.as_str()),
            MeasureStatus::Cancelled => info!("{} measurement cancelled", event.tool.as_str()),
        }
    }
}

/// Distance and angle measurement: tool selection, the session driver,
/// configuration loading, gizmo drawing and the help overlay.
pub struct MeasurementPlugin;

impl Plugin for MeasurementPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(JsonAssetPlugin::<MeasureSettings>::new(&["settings.json"]))
            .add_plugins(JsonAssetPlugin::<MeasurementGraphLibrary>::new(&["graphs.json"]))
            .init_resource::<ToolManager>()
            .init_resource::<EditorMode>()
            .init_resource::<ActiveMeasurement>()
            .init_resource::<MeasureSettings>()
            .init_resource::<SnapSettings>()
            .init_resource::<WrapperRegistry>()
            .init_resource::<ConfigLoader>()
            .init_resource::<SceneCursor>()
            .init_resource::<UnitSettings>()
            .init_resource::<ScrollCapture>()
            .add_event::<ToolSelectionEvent>()
            .add_event::<MeasureFinishedEvent>()
            .add_event::<MeasureReportEvent>()
            .add_systems(Startup, spawn_help_overlay)
            .add_systems(
                Update,
                (
                    load_config_system,
                    handle_tool_keyboard_shortcuts,
                    handle_tool_selection_events,
                    measure_session_system,
                    prune_orphan_wrappers,
                    (log_measure_reports, log_finished_measurements, update_status_text),
                    update_help_overlay,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    draw_floor_grid,
                    draw_scene_cursor,
                    draw_preview_marker,
                    draw_measurements,
                )
                    .after(measure_session_system),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::input::keyboard::Key;
    use bevy::input::mouse::MouseScrollUnit;
    use crate::measure::host::HostMode;
    use crate::measure::testing::{Harness, OrthoView, TriangleScene, test_area};

    fn frame(tool: Option<ToolType>) -> FrameContext {
        FrameContext {
            mode: HostMode::Object,
            active_tool: tool,
            area: Some(test_area()),
            snap: SnapSettings::default(),
        }
    }

    fn key(key_code: KeyCode, logical_key: Key, state: ButtonState) -> WindowEvent {
        WindowEvent::KeyboardInput(KeyboardInput {
            key_code,
            logical_key,
            state,
            text: None,
            repeat: false,
            window: Entity::PLACEHOLDER,
        })
    }

    fn wheel(y: f32) -> WindowEvent {
        WindowEvent::MouseWheel(MouseWheel {
            unit: MouseScrollUnit::Line,
            x: 0.0,
            y,
            window: Entity::PLACEHOLDER,
        })
    }

    #[test]
    fn cursor_moves_update_the_tracked_position() {
        let mut input = InputTracker::default();
        let event = WindowEvent::CursorMoved(CursorMoved {
            window: Entity::PLACEHOLDER,
            position: Vec2::new(120.0, 80.0),
            delta: None,
        });

        let tool_event = input.translate(&event).unwrap();

        assert_eq!(tool_event.kind, InputKind::PointerMove);
        assert_eq!(tool_event.cursor, Vec2::new(120.0, 80.0));
        assert_eq!(input.cursor, Vec2::new(120.0, 80.0));
    }

    #[test]
    fn presses_carry_the_last_cursor_and_releases_are_dropped() {
        let mut input = InputTracker {
            cursor: Vec2::new(10.0, 20.0),
            ..default()
        };
        let press = WindowEvent::MouseButtonInput(MouseButtonInput {
            button: MouseButton::Right,
            state: ButtonState::Pressed,
            window: Entity::PLACEHOLDER,
        });
        let release = WindowEvent::MouseButtonInput(MouseButtonInput {
            button: MouseButton::Right,
            state: ButtonState::Released,
            window: Entity::PLACEHOLDER,
        });

        let tool_event = input.translate(&press).unwrap();
        assert_eq!(tool_event.kind, InputKind::Press(PointerButton::Secondary));
        assert_eq!(tool_event.cursor, Vec2::new(10.0, 20.0));
        assert!(input.translate(&release).is_none());
    }

    #[test]
    fn wheel_direction_follows_sign() {
        let mut input = InputTracker::default();

        let up = input.translate(&wheel(1.0)).unwrap();
        let down = input.translate(&wheel(-3.0)).unwrap();

        assert_eq!(up.kind, InputKind::Scroll(ScrollDirection::Up));
        assert_eq!(down.kind, InputKind::Scroll(ScrollDirection::Down));
        assert!(input.translate(&wheel(0.0)).is_none());
    }

    #[test]
    fn modifiers_follow_key_events_in_arrival_order() {
        let mut input = InputTracker::default();
        let events = [
            key(KeyCode::ControlLeft, Key::Control, ButtonState::Pressed),
            wheel(1.0),
            key(KeyCode::ControlLeft, Key::Control, ButtonState::Released),
            wheel(1.0),
        ];

        let translated: Vec<ToolEvent> = events.iter().filter_map(|event| input.translate(event)).collect();

        let wheel_modifiers: Vec<bool> = translated
            .iter()
            .filter(|event| event.scroll_direction().is_some())
            .map(|event| event.modifiers.ctrl)
            .collect();
        assert_eq!(wheel_modifiers, vec![true, false]);
    }

    #[test]
    fn losing_focus_releases_held_modifiers() {
        let mut input = InputTracker::default();
        input.translate(&key(KeyCode::ShiftRight, Key::Shift, ButtonState::Pressed));
        assert!(input.modifiers().shift);

        let blur = WindowEvent::WindowFocused(WindowFocused {
            window: Entity::PLACEHOLDER,
            focused: false,
        });
        assert!(input.translate(&blur).is_none());

        assert_eq!(input.modifiers(), Modifiers::NONE);
    }

    #[test]
    fn repeated_key_presses_are_dropped() {
        let mut input = InputTracker::default();
        let mut held = key(KeyCode::KeyE, Key::Character("e".into()), ButtonState::Pressed);

        assert_eq!(input.translate(&held).unwrap().kind, InputKind::Key(ToolKey::E));
        if let WindowEvent::KeyboardInput(event) = &mut held {
            event.repeat = true;
        }
        assert!(input.translate(&held).is_none());
    }

    #[test]
    fn key_codes_map_to_tool_keys() {
        assert_eq!(tool_key(KeyCode::Escape), ToolKey::Escape);
        assert_eq!(tool_key(KeyCode::KeyE), ToolKey::E);
        assert_eq!(tool_key(KeyCode::NumpadAdd), ToolKey::NumpadPlus);
        assert_eq!(tool_key(KeyCode::NumpadSubtract), ToolKey::NumpadMinus);
        assert_eq!(tool_key(KeyCode::KeyQ), ToolKey::Other);
    }

    #[test]
    fn modifiers_read_either_side() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::ControlRight);
        keyboard.press(KeyCode::AltLeft);

        let modifiers = modifiers_from(&keyboard);

        assert!(modifiers.ctrl && modifiers.alt);
        assert!(!modifiers.shift);
    }

    #[test]
    fn invoked_action_matches_requested_tool() {
        let settings = MeasureSettings::default();

        let distance = MeasureAction::invoke(ToolType::Distance, settings.clone(), &frame(None)).unwrap();
        let angle = MeasureAction::invoke(ToolType::Angle, settings, &frame(None)).unwrap();

        assert_eq!(distance.tool(), ToolType::Distance);
        assert_eq!(angle.tool(), ToolType::Angle);
        assert_eq!(angle.phase(), Phase::Idle);
        assert!(angle.points().is_empty());
    }

    #[test]
    fn invoke_without_view_fails() {
        let mut context = frame(Some(ToolType::Distance));
        context.area = None;

        let result = MeasureAction::invoke(ToolType::Distance, MeasureSettings::default(), &context);

        assert!(result.is_err());
    }

    #[test]
    fn idle_resource_exposes_nothing() {
        let active = ActiveMeasurement::default();
        assert_eq!(active.tool(), None);
        assert_eq!(active.preview_marker(), None);
        assert!(!active.help_visible());
    }

    #[test]
    fn only_terminal_flows_finish_a_session() {
        assert_eq!(MeasureStatus::from_flow(Flow::Finished), Some(MeasureStatus::Finished));
        assert_eq!(MeasureStatus::from_flow(Flow::Cancelled), Some(MeasureStatus::Cancelled));
        assert_eq!(MeasureStatus::from_flow(Flow::Running), None);
        assert_eq!(MeasureStatus::from_flow(Flow::PassThrough), None);
    }

    #[test]
    fn hidden_help_stays_hidden_for_the_next_measurement() {
        let mut settings = MeasureSettings::default();
        assert!(settings.show_help_overlay);
        let mut harness = Harness::new(TriangleScene::empty(), OrthoView::new(50.0));
        let view = harness.view.clone();
        let context = frame(Some(ToolType::Distance));
        let mut action = MeasureAction::invoke(ToolType::Distance, settings.clone(), &context).unwrap();
        let mut host = harness.host();

        let toggle = ToolEvent::new(
            InputKind::Key(ToolKey::H),
            view.window_point(Vec3::ZERO),
            Modifiers {
                ctrl: true,
                alt: true,
                ..Modifiers::NONE
            },
        );
        assert_eq!(action.handle(&toggle, &context, &mut host), Flow::Running);
        assert!(!action.help_visible());
        assert_eq!(changed_help_preference(&action, &settings), Some(false));
        settings.show_help_overlay = false;

        let press = InputKind::Press(PointerButton::Primary);
        let at = |kind, world| ToolEvent::new(kind, view.window_point(world), Modifiers::NONE);
        action.handle(&at(InputKind::PointerMove, Vec3::new(-2.0, 0.0, 0.0)), &context, &mut host);
        action.handle(&at(press, Vec3::new(-2.0, 0.0, 0.0)), &context, &mut host);
        action.handle(&at(InputKind::PointerMove, Vec3::new(2.0, 1.0, 0.0)), &context, &mut host);
        assert_eq!(
            action.handle(&at(press, Vec3::new(2.0, 1.0, 0.0)), &context, &mut host),
            Flow::Finished
        );
        assert_eq!(changed_help_preference(&action, &settings), None);

        let next = MeasureAction::invoke(ToolType::Distance, settings.clone(), &context).unwrap();
        assert!(!next.help_visible());
    }
}
