//! Key bindings of the measurement tools.
//!
//! One static table drives both the scroll routing and the help overlay. Rows
//! are filtered by tool and phase, then deduplicated on (key, modifiers) so the
//! first matching row for a combination wins.

use super::ToolType;
use super::input::Modifiers;
use super::params::{FLOAT_KINDS, INT_KINDS, ParameterBinding, SocketKind};
use super::session::Phase;
use super::settings::MeasureSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mods {
    None,
    Ctrl,
    Shift,
    Alt,
    CtrlAlt,
}

impl Mods {
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Ctrl => "Ctrl",
            Self::Shift => "Shift",
            Self::Alt => "Alt",
            Self::CtrlAlt => "Ctrl+Alt",
        }
    }
}

/// Phases a row applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseFilter {
    Any,
    /// Before the first point is placed.
    Idle,
    /// While a measurement is being drawn.
    Drawing,
}

impl PhaseFilter {
    fn matches(self, phase: Phase) -> bool {
        match self {
            Self::Any => true,
            Self::Idle => matches!(phase, Phase::Idle | Phase::PendingFirst),
            Self::Drawing => matches!(phase, Phase::Drawing | Phase::AwaitingThird),
        }
    }
}

/// Which configured increment a scroll step uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSize {
    Angle,
    Distance,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub keyword: &'static str,
    pub step: StepSize,
    pub accepted: &'static [SocketKind],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyBinding {
    pub key: &'static str,
    pub mods: Mods,
    pub description: &'static str,
    pub tools: &'static [ToolType],
    pub phase: PhaseFilter,
    pub param: Option<ParamSpec>,
}

const BOTH: &[ToolType] = &[ToolType::Distance, ToolType::Angle];
const DISTANCE: &[ToolType] = &[ToolType::Distance];
const ANGLE: &[ToolType] = &[ToolType::Angle];

const fn row(
    key: &'static str,
    mods: Mods,
    description: &'static str,
    tools: &'static [ToolType],
    phase: PhaseFilter,
) -> KeyBinding {
    KeyBinding {
        key,
        mods,
        description,
        tools,
        phase,
        param: None,
    }
}

const fn scroll(
    mods: Mods,
    description: &'static str,
    tools: &'static [ToolType],
    keyword: &'static str,
    step: StepSize,
    accepted: &'static [SocketKind],
) -> KeyBinding {
    KeyBinding {
        key: "Scroll",
        mods,
        description,
        tools,
        phase: PhaseFilter::Drawing,
        param: Some(ParamSpec {
            keyword,
            step,
            accepted,
        }),
    }
}

pub static KEYMAP: &[KeyBinding] = &[
    row("LMB", Mods::None, "Set start point", DISTANCE, PhaseFilter::Idle),
    row("LMB", Mods::None, "Confirm endpoint", DISTANCE, PhaseFilter::Drawing),
    row("LMB", Mods::None, "Set vertex", ANGLE, PhaseFilter::Idle),
    row("LMB", Mods::None, "Set next vertex", ANGLE, PhaseFilter::Drawing),
    row("Mouse Move", Mods::None, "Preview position", BOTH, PhaseFilter::Any),
    row("Esc / RMB", Mods::None, "Cancel", BOTH, PhaseFilter::Any),
    row("H", Mods::CtrlAlt, "Toggle help", BOTH, PhaseFilter::Any),
    row("E", Mods::None, "Align to surface", DISTANCE, PhaseFilter::Drawing),
    row("Backspace", Mods::None, "Remove last point", ANGLE, PhaseFilter::Drawing),
    scroll(Mods::Ctrl, "Adjust Rotation", DISTANCE, "Rotation", StepSize::Angle, INT_KINDS),
    scroll(Mods::Shift, "Adjust Text Rotation", DISTANCE, "Text Rotation", StepSize::Angle, INT_KINDS),
    scroll(Mods::Alt, "Adjust Offset", DISTANCE, "Offset", StepSize::Distance, FLOAT_KINDS),
    scroll(Mods::Ctrl, "Adjust Radius", ANGLE, "Radius", StepSize::Distance, FLOAT_KINDS),
    scroll(Mods::Shift, "Adjust Text Rotation", ANGLE, "Text Rotation", StepSize::Angle, INT_KINDS),
    scroll(Mods::Alt, "Adjust Offset", ANGLE, "Offset", StepSize::Distance, FLOAT_KINDS),
];

/// Rows for `tool` in `phase`, first occurrence of each (key, modifiers) pair only.
pub fn bindings_for(tool: ToolType, phase: Phase) -> Vec<&'static KeyBinding> {
    let mut seen = Vec::new();
    KEYMAP
        .iter()
        .filter(|b| b.tools.contains(&tool) && b.phase.matches(phase))
        .filter(|b| {
            let id = (b.key, b.mods);
            if seen.contains(&id) {
                false
            } else {
                seen.push(id);
                true
            }
        })
        .collect()
}

/// Overlay text for each binding: key column, description column.
pub fn help_lines(tool: ToolType, phase: Phase) -> Vec<(String, &'static str)> {
    bindings_for(tool, phase)
        .into_iter()
        .map(|b| {
            let key = match b.mods {
                Mods::None => b.key.to_string(),
                mods => format!("{}+{}", mods.label(), b.key),
            };
            (key, b.description)
        })
        .collect()
}

/// Parameters reachable by modifier + scroll for one tool.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollBindings {
    pub ctrl: Option<ParameterBinding>,
    pub shift: Option<ParameterBinding>,
    pub alt: Option<ParameterBinding>,
}

impl ScrollBindings {
    pub fn from_keymap(tool: ToolType, settings: &MeasureSettings) -> Self {
        let mut bindings = Self::default();
        let rows = KEYMAP
            .iter()
            .filter(|b| b.tools.contains(&tool))
            .filter_map(|b| b.param.map(|p| (b.mods, p)));
        for (mods, spec) in rows {
            let step = match spec.step {
                StepSize::Angle => settings.angle_step(),
                StepSize::Distance => settings.distance_increment,
            };
            let binding = ParameterBinding {
                keyword: spec.keyword,
                step,
                accepted: spec.accepted,
            };
            let slot = match mods {
                Mods::Ctrl => &mut bindings.ctrl,
                Mods::Shift => &mut bindings.shift,
                Mods::Alt => &mut bindings.alt,
                Mods::None | Mods::CtrlAlt => continue,
            };
            slot.get_or_insert(binding);
        }
        bindings
    }

    /// Binding for the held modifiers, Ctrl taking precedence over Shift over Alt.
    pub fn for_modifiers(&self, modifiers: Modifiers) -> Option<ParameterBinding> {
        if modifiers.ctrl {
            self.ctrl
        } else if modifiers.shift {
            self.shift
        } else if modifiers.alt {
            self.alt
        } else {
            None
        }
    }
}
