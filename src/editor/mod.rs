//! Editor state controller.
//!
//! ## Module Structure
//!
//! - [`mode`] - Interaction modes and the color palette
//! - [`state`] - Immutable state snapshot and its transitions
//! - [`handlers`] - Pointer handler set derived from a snapshot
//! - [`controller`] - Applies transitions and reacts on the drawing surface
//! - [`geometry`] - Polygon closure and bounds helpers
//! - [`input`] - Pointer and keyboard systems
//! - [`actions`] - Sidebar messages (state events, export, clear)

mod actions;
mod controller;
pub mod geometry;
mod handlers;
mod input;
mod mode;
mod state;

pub use actions::{ClearRequest, EditorInput, ExportRequest};
pub use controller::EditorController;
pub use mode::{Mode, Swatch};
pub use state::{EditorEvent, EditorState};

use bevy::prelude::*;

use crate::config::ConfigLoaded;

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EditorController>()
            .add_message::<EditorInput>()
            .add_message::<ExportRequest>()
            .add_message::<ClearRequest>()
            .add_systems(Startup, input::mount_surface.after(ConfigLoaded))
            .add_systems(
                Update,
                (
                    input::handle_pointer_input,
                    input::handle_delete_key,
                    actions::apply_editor_input.run_if(on_message::<EditorInput>),
                    actions::handle_clear_requests.run_if(on_message::<ClearRequest>),
                    actions::handle_export_requests.run_if(on_message::<ExportRequest>),
                )
                    .chain(),
            );
    }
}
