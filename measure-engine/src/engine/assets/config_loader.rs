use bevy::asset::LoadState;
use bevy::prelude::*;

use super::graph_library::{MeasurementGraphLibrary, WrapperRegistry};
use crate::measure::settings::MeasureSettings;

pub const SETTINGS_PATH: &str = "measure.settings.json";

/// Graph libraries in search order.
pub const GRAPH_LIBRARY_PATHS: &[&str] = &["measurement.graphs.json"];

#[derive(Resource, Default)]
pub struct ConfigLoader {
    settings: Option<Handle<MeasureSettings>>,
    libraries: Vec<Handle<MeasurementGraphLibrary>>,
    settings_done: bool,
    libraries_done: bool,
}

impl ConfigLoader {
    pub fn is_done(&self) -> bool {
        self.settings_done && self.libraries_done
    }
}

/// Load preferences and graph libraries, replacing the defaults once each file is in.
pub fn load_config_system(
    mut loader: ResMut<ConfigLoader>,
    asset_server: Res<AssetServer>,
    settings_assets: Res<Assets<MeasureSettings>>,
    library_assets: Res<Assets<MeasurementGraphLibrary>>,
    mut settings: ResMut<MeasureSettings>,
    mut wrappers: ResMut<WrapperRegistry>,
) {
    if loader.is_done() {
        return;
    }

    // Start loading if not already started
    let Some(settings_handle) = loader.settings.clone() else {
        info!("Loading measurement settings from: {SETTINGS_PATH}");
        loader.settings = Some(asset_server.load(SETTINGS_PATH));
        loader.libraries = GRAPH_LIBRARY_PATHS
            .iter()
            .map(|path| asset_server.load(*path))
            .collect();
        return;
    };

    if !loader.settings_done {
        if let Some(loaded) = settings_assets.get(&settings_handle) {
            *settings = loaded.clone();
            info!(
                "Measurement settings loaded: angle step {}°, distance step {}",
                settings.angle_step(),
                settings.distance_increment
            );
            loader.settings_done = true;
        } else if let LoadState::Failed(err) = asset_server.load_state(settings_handle.id()) {
            warn!("Using default measurement settings: {err}");
            loader.settings_done = true;
        }
    }

    if !loader.libraries_done {
        let mut pending = false;
        let mut libraries = Vec::new();
        for handle in &loader.libraries {
            if let Some(library) = library_assets.get(handle) {
                libraries.push(library.clone());
            } else if let LoadState::Failed(err) = asset_server.load_state(handle.id()) {
                warn!("Skipping measurement graph library: {err}");
            } else {
                pending = true;
            }
        }
        if !pending {
            let graphs: usize = libraries.iter().map(|l| l.graphs.len()).sum();
            info!("Loaded {graphs} measurement graphs from {} libraries", libraries.len());
            wrappers.libraries = libraries;
            loader.libraries_done = true;
        }
    }
}
