use bevy::prelude::*;

use crate::measure::ToolType;
use crate::measure::host::HostMode;

/// Resource tracking the currently active tool.
#[derive(Resource, Default)]
pub struct ToolManager {
    /// Currently selected tool, if any.
    active_tool: Option<ToolType>,
}

impl ToolManager {
    /// Activate specified tool, replacing the previous one.
    pub fn activate_tool(&mut self, tool_type: ToolType) -> bool {
        if self.active_tool == Some(tool_type) {
            return false;
        }
        self.active_tool = Some(tool_type);
        info!("Tool manager activated: {}", tool_type.as_str());
        true
    }

    /// Deactivate currently active tool.
    pub fn deactivate_current_tool(&mut self) -> Option<ToolType> {
        let previous = self.active_tool.take();
        if let Some(tool) = previous {
            info!("Tool manager deactivated: {}", tool.as_str());
        }
        previous
    }

    pub fn active_tool(&self) -> Option<ToolType> {
        self.active_tool
    }

    pub fn is_tool_active(&self, tool_type: ToolType) -> bool {
        self.active_tool == Some(tool_type)
    }
}

/// Editing mode of the host. Measurement only runs in object mode.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorMode(pub HostMode);

/// Event fired when a tool is picked from the keyboard or by another plugin.
#[derive(Event, Debug, Clone, Copy)]
pub struct ToolSelectionEvent {
    pub tool_type: ToolType,
    pub source: ToolSelectionSource,
}

/// Source of tool selection for debugging and conditional logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolSelectionSource {
    Keyboard,
    Api,
}

pub fn handle_tool_selection_events(
    mut events: EventReader<ToolSelectionEvent>,
    mut tool_manager: ResMut<ToolManager>,
) {
    for event in events.read() {
        if tool_manager.activate_tool(event.tool_type) {
            info!("{} tool selected via {:?}", event.tool_type.as_str(), event.source);
        }
    }
}

/// `D` distance, `A` angle, `Tab` toggles object/edit mode.
pub fn handle_tool_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut tool_events: EventWriter<ToolSelectionEvent>,
    mut mode: ResMut<EditorMode>,
) {
    let shortcuts = [(KeyCode::KeyD, ToolType::Distance), (KeyCode::KeyA, ToolType::Angle)];
    for (key, tool_type) in shortcuts {
        if keyboard.just_pressed(key) {
            tool_events.write(ToolSelectionEvent {
                tool_type,
                source: ToolSelectionSource::Keyboard,
            });
        }
    }

    if keyboard.just_pressed(KeyCode::Tab) {
        mode.0 = match mode.0 {
            HostMode::Object => HostMode::Edit,
            HostMode::Edit => HostMode::Object,
        };
        info!("Editor mode: {:?}", mode.0);
    }
}
