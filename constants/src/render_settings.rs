use bevy::color::Color;

pub const PREVIEW_MARKER_RADIUS: f32 = 0.06;
pub const PREVIEW_MARKER_COLOUR: Color = Color::srgb(1.0, 0.5, 0.0);

pub const MEASURE_LINE_COLOUR: Color = Color::srgb(1.0, 1.0, 0.2);
pub const MEASURE_ARC_COLOUR: Color = Color::srgb(0.2, 0.85, 1.0);
pub const MEASURE_VERTEX_RADIUS: f32 = 0.03;
pub const MEASURE_ARC_SEGMENTS: u32 = 32;

/// Length of the end ticks drawn across a distance line.
pub const MEASURE_TICK_LENGTH: f32 = 0.1;

/// Reference floor grid, one world unit per cell.
pub const FLOOR_GRID_CELLS: u32 = 20;
pub const FLOOR_GRID_COLOUR: Color = Color::srgba(1.0, 1.0, 1.0, 0.15);

/// Size of the 3D cursor cross.
pub const CURSOR_GIZMO_SIZE: f32 = 0.3;
pub const CURSOR_GIZMO_COLOUR: Color = Color::srgb(1.0, 0.2, 0.2);

pub const HELP_FONT_SIZE: f32 = 14.0;
pub const HELP_TITLE_COLOUR: Color = Color::srgb(1.0, 0.8, 0.2);
pub const HELP_KEY_COLOUR: Color = Color::srgb(0.6, 0.85, 1.0);
pub const HELP_DESC_COLOUR: Color = Color::srgb(0.75, 0.75, 0.75);
pub const HELP_KEY_COLUMN_WIDTH: usize = 16;

pub const STATUS_FONT_SIZE: f32 = 16.0;
pub const STATUS_INFO_COLOUR: Color = Color::srgb(0.9, 0.9, 0.9);
pub const STATUS_WARNING_COLOUR: Color = Color::srgb(1.0, 0.6, 0.2);
