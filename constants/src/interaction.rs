/// Screen-space radius within which a face vertex or edge midpoint captures the pointer (pixels).
pub const VERTEX_SNAP_PIXEL_THRESHOLD: f32 = 20.0;

/// Desired on-screen spacing between adaptive grid lines (pixels).
pub const GRID_TARGET_PIXEL_SPACING: f32 = 30.0;

/// Below this many pixels per world unit the projection is treated as degenerate.
pub const GRID_MIN_PIXELS_PER_UNIT: f32 = 0.00001;

/// Grid cell size used when the adaptive size cannot be derived.
pub const GRID_FALLBACK_SCALE: f32 = 1.0;

/// A pending angle vertex is committed once the pointer moves further than this (world units).
pub const COMMIT_MOVE_EPSILON: f32 = 0.001;

/// Endpoints closer than this cannot define a tangent for surface alignment.
pub const ALIGN_MIN_SEGMENT_LENGTH: f32 = 0.0001;

/// Tangent considered parallel to world up when |t · up| exceeds `1 - ALIGN_PARALLEL_EPSILON`.
pub const ALIGN_PARALLEL_EPSILON: f32 = 0.0001;

/// Surface normals this close to the tangent leave the alignment undefined.
pub const ALIGN_MIN_PROJECTION_LENGTH: f32 = 0.001;

/// Rotation added by a repeated alignment (degrees).
pub const ALIGN_FLIP_DEGREES: i64 = 180;

/// Asset names of the reusable measurement graphs.
pub const DISTANCE_GRAPH_NAME: &str = "Distance Measurement";
pub const ANGLE_GRAPH_NAME: &str = "Angle Measurement";

/// Names given to the backing geometry of new measurements.
pub const DISTANCE_OBJECT_NAME: &str = "Distance Measurement";
pub const ANGLE_OBJECT_NAME: &str = "Angle Measurement";
