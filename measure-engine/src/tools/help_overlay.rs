use bevy::prelude::*;
use constants::interaction::{ANGLE_OBJECT_NAME, DISTANCE_OBJECT_NAME};
use constants::render_settings::{
    HELP_DESC_COLOUR, HELP_FONT_SIZE, HELP_KEY_COLOUR, HELP_KEY_COLUMN_WIDTH, HELP_TITLE_COLOUR,
    STATUS_FONT_SIZE, STATUS_INFO_COLOUR, STATUS_WARNING_COLOUR,
};

use super::measure::{ActiveMeasurement, MeasureReportEvent};
use crate::engine::scene::UnitSettings;
use crate::measure::ToolType;
use crate::measure::keymap::help_lines;
use crate::measure::session::{Phase, Report, ReportLevel};
use crate::measure::settings::MeasureSettings;

/// UI node that covers the 3D view. Pointer input over it is left to the UI.
#[derive(Component)]
pub struct ScreenPanel;

#[derive(Component)]
pub struct HelpOverlay;

#[derive(Component)]
pub struct HelpText;

#[derive(Component)]
pub struct StatusText;

pub fn spawn_help_overlay(mut commands: Commands, settings: Res<MeasureSettings>) {
    let [left, bottom] = settings.help_position;
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(left),
                bottom: Val::Px(bottom),
                padding: UiRect::all(Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            Visibility::Hidden,
            HelpOverlay,
            ScreenPanel,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: HELP_FONT_SIZE,
                    ..default()
                },
                TextColor(HELP_TITLE_COLOUR),
                HelpText,
            ));
        });

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: STATUS_FONT_SIZE,
            ..default()
        },
        TextColor(STATUS_INFO_COLOUR),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
        StatusText,
    ));
}

fn overlay_title(tool: ToolType) -> &'static str {
    match tool {
        ToolType::Distance => DISTANCE_OBJECT_NAME,
        ToolType::Angle => ANGLE_OBJECT_NAME,
    }
}

type HelpContent = (ToolType, Vec<(String, &'static str)>);

/// Show the key bindings of the running tool and phase. Spans are only rebuilt when the lines change.
pub fn update_help_overlay(
    mut commands: Commands,
    active: Res<ActiveMeasurement>,
    settings: Res<MeasureSettings>,
    mut overlay: Query<(&mut Node, &mut Visibility), With<HelpOverlay>>,
    mut help_text: Query<(Entity, &mut Text), With<HelpText>>,
    mut shown: Local<Option<HelpContent>>,
) {
    let Ok((mut node, mut visibility)) = overlay.single_mut() else {
        return;
    };
    if settings.is_changed() {
        let [left, bottom] = settings.help_position;
        node.left = Val::Px(left);
        node.bottom = Val::Px(bottom);
    }

    let content = match (active.tool(), active.phase()) {
        (Some(tool), Some(phase)) if active.help_visible() => Some((tool, help_lines(tool, phase))),
        _ => None,
    };
    visibility.set_if_neq(if content.is_some() {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    });

    if *shown == content {
        return;
    }
    let Ok((entity, mut text)) = help_text.single_mut() else {
        return;
    };
    commands.entity(entity).despawn_related::<Children>();
    if let Some((tool, lines)) = &content {
        text.0 = format!("{}\n", overlay_title(*tool));
        commands.entity(entity).with_children(|parent| {
            for (key, description) in lines {
                parent.spawn((
                    TextSpan::new(format!("{key:<width$}", width = HELP_KEY_COLUMN_WIDTH)),
                    TextFont {
                        font_size: HELP_FONT_SIZE,
                        ..default()
                    },
                    TextColor(HELP_KEY_COLOUR),
                ));
                parent.spawn((
                    TextSpan::new(format!("{description}\n")),
                    TextFont {
                        font_size: HELP_FONT_SIZE,
                        ..default()
                    },
                    TextColor(HELP_DESC_COLOUR),
                ));
            }
        });
    }
    *shown = content;
}

/// Live value of the measurement being drawn, in display units.
pub fn measurement_readout(
    tool: ToolType,
    phase: Phase,
    points: &[Vec3],
    units: UnitSettings,
) -> Option<String> {
    if !phase.is_drawing() {
        return None;
    }
    match (tool, points) {
        (ToolType::Distance, &[start, end]) => {
            let scale = units.scale.filter(|s| *s > 0.0).unwrap_or(1.0);
            Some(format!("Distance: {:.4}", start.distance(end) / scale))
        }
        (ToolType::Angle, &[first, vertex, last]) => {
            let a = first - vertex;
            let b = last - vertex;
            if a.length_squared() == 0.0 || b.length_squared() == 0.0 {
                return None;
            }
            Some(format!("Angle: {:.2}°", a.angle_between(b).to_degrees()))
        }
        _ => None,
    }
}

/// Status line: the live readout while drawing, otherwise the latest report.
pub fn update_status_text(
    active: Res<ActiveMeasurement>,
    units: Res<UnitSettings>,
    mut reports: EventReader<MeasureReportEvent>,
    mut status: Query<(&mut Text, &mut TextColor), With<StatusText>>,
    mut latest: Local<Option<Report>>,
) {
    if let Some(MeasureReportEvent(report)) = reports.read().last() {
        *latest = Some(report.clone());
    }
    let Ok((mut text, mut colour)) = status.single_mut() else {
        return;
    };

    let readout = active.action().and_then(|action| {
        measurement_readout(action.tool(), action.phase(), action.points(), *units)
    });
    let (message, level) = match (readout, latest.as_ref()) {
        (Some(readout), _) => (readout, ReportLevel::Info),
        (None, Some(report)) => (report.message.clone(), report.level),
        (None, None) => (String::new(), ReportLevel::Info),
    };
    if text.0 != message {
        text.0 = message;
    }
    colour.set_if_neq(TextColor(match level {
        ReportLevel::Info => STATUS_INFO_COLOUR,
        ReportLevel::Warning => STATUS_WARNING_COLOUR,
    }));
}
