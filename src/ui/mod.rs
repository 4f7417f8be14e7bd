mod sidebar;
mod upload;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<upload::UploadState>()
            .add_systems(EguiPrimaryContextPass, sidebar::sidebar_ui)
            .add_systems(Update, upload::poll_upload_dialog);
    }
}
