//! Pointer and keyboard systems that feed the controller.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::config::AppConfig;
use crate::surface::{
    BackgroundSource, Canvas, LoadBackgroundRequest, SurfacePointer,
};

use super::controller::{EditorController, Outcome};
use super::state::EditorEvent;

/// Bundled resources for the input systems
#[derive(SystemParam)]
pub struct EditorResources<'w> {
    pub controller: ResMut<'w, EditorController>,
    pub canvas: ResMut<'w, Canvas>,
    pub loads: MessageWriter<'w, LoadBackgroundRequest>,
}

impl EditorResources<'_> {
    pub fn dispatch(&mut self, event: &EditorEvent) {
        let outcome = self.controller.dispatch(event, Some(&mut *self.canvas));
        request_background(outcome, &mut self.loads);
    }
}

pub fn request_background(outcome: Outcome, loads: &mut MessageWriter<LoadBackgroundRequest>) {
    if let Some(source) = outcome.background_reload {
        loads.write(LoadBackgroundRequest { source });
    }
}

/// Startup system handing the canvas to the controller
pub fn mount_surface(config: Res<AppConfig>, mut res: EditorResources) {
    let source = BackgroundSource::parse(&config.data.background.default_source);
    res.controller.set_default_background(source);

    let outcome = res.controller.mount(&mut *res.canvas);
    request_background(outcome, &mut res.loads);

    let size = res.canvas.size();
    info!("Drawing surface mounted ({}x{})", size.x, size.y);
}

pub fn handle_pointer_input(
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    pointer: SurfacePointer,
    mut contexts: EguiContexts,
    mut res: EditorResources,
    mut last_position: Local<Option<Vec2>>,
) {
    let position = pointer.surface_position(res.canvas.size());
    let delta = match (*last_position, position) {
        (Some(last), Some(current)) => current - last,
        _ => Vec2::ZERO,
    };
    *last_position = position;

    let handlers = res.controller.handlers();

    if mouse_button.just_pressed(MouseButton::Left) {
        // Presses over the sidebar or outside the surface are not ours
        if let Ok(ctx) = contexts.ctx_mut()
            && ctx.is_pointer_over_area()
        {
            return;
        }
        let Some(screen) = position.filter(|p| res.canvas.contains_screen(*p)) else {
            return;
        };

        let scene = res.canvas.to_scene(screen);
        if handlers.forward_to_surface {
            let additive =
                keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);
            res.canvas.handle_press(scene, additive);
        }
        res.dispatch(&EditorEvent::PointerDown(scene));
        return;
    }

    if !res.controller.state().pointer_down {
        return;
    }

    if mouse_button.pressed(MouseButton::Left) {
        if delta == Vec2::ZERO {
            return;
        }
        let panned = res.controller.pointer_move(delta, Some(&mut *res.canvas));
        if !panned
            && handlers.forward_to_surface
            && let Some(screen) = position
        {
            let scene = res.canvas.to_scene(screen);
            res.canvas.handle_drag(scene, delta);
        }
    } else {
        if handlers.forward_to_surface
            && let Some(id) = res.canvas.handle_release()
        {
            debug!("Freehand stroke added as {:?}", id);
        }
        res.dispatch(&EditorEvent::PointerUp);
    }
}

pub fn handle_delete_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut contexts: EguiContexts,
    mut res: EditorResources,
) {
    // Don't trigger if typing in UI
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    if !keyboard.just_pressed(KeyCode::Delete) {
        return;
    }

    let removed = res.controller.delete_selection(Some(&mut *res.canvas));
    if removed > 0 {
        info!("Deleted {} selected object(s)", removed);
    }
}
