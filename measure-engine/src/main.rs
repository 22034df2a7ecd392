use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::window::PresentMode;
use measure_engine::MeasurementPlugin;
use measure_engine::engine::camera::{ViewportCamera, camera_controller};
use measure_engine::tools::help_overlay::ScreenPanel;
use measure_engine::tools::measure::measure_session_system;

fn main() {
    create_app().run();
}

/// Demo scene with the measurement tools installed
fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(MeasurementPlugin)
        .insert_resource(ViewportCamera::new(Vec3::new(0.0, 0.5, 0.0), 12.0))
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                fps_text_update_system,
                camera_controller.after(measure_session_system),
            ),
        );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(Window {
            title: "Measure".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

#[derive(Component)]
struct FpsText;

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    info!("=== MEASUREMENT DEMO: D distance, A angle, Tab object/edit mode ===");
    spawn_lighting(&mut commands);
    spawn_camera(&mut commands);
    spawn_scene(&mut commands, &mut meshes, &mut materials);
    spawn_ui(&mut commands);
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

fn spawn_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-2.5, 4.5, 9.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Surfaces to measure against: a floor, a box and a sloped ramp.
fn spawn_scene(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(10.0, 10.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.35, 0.3))),
        Name::new("Floor"),
    ));
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(1.5, 1.0, 1.5))),
        MeshMaterial3d(materials.add(Color::srgb(0.7, 0.55, 0.4))),
        Transform::from_xyz(-1.5, 0.5, 0.0),
        Name::new("Box"),
    ));
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(3.0, 0.2, 1.5))),
        MeshMaterial3d(materials.add(Color::srgb(0.45, 0.5, 0.7))),
        Transform::from_xyz(2.0, 0.6, 0.0)
            .with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_8)),
        Name::new("Ramp"),
    ));
}

fn spawn_ui(commands: &mut Commands) {
    commands.spawn((
        Text::new("FPS: "),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(1., 0., 0.)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            right: Val::Px(12.0),
            ..default()
        },
        FpsText,
        ScreenPanel,
    ));
}

fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                text.0 = format!("FPS: {value:.1}");
            }
        }
    }
}
