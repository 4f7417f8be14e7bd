//! Background upload through the native file dialog.

use std::path::PathBuf;

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use futures_lite::future;

use crate::editor::{EditorEvent, EditorInput};

/// Image extensions offered by the upload dialog
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff"];

#[derive(Resource, Default)]
pub struct UploadState {
    pub pending: Option<Task<Option<PathBuf>>>,
}

impl UploadState {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Open the file dialog unless one is already open.
    pub fn open_dialog(&mut self) {
        if self.pending.is_some() {
            return;
        }
        let task_pool = AsyncComputeTaskPool::get();
        self.pending = Some(task_pool.spawn(async {
            rfd::AsyncFileDialog::new()
                .set_title("Upload Image")
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_file()
                .await
                .map(|h| h.path().to_path_buf())
        }));
    }
}

/// Polls the file dialog and reports the chosen file as the new background
pub fn poll_upload_dialog(
    mut upload: ResMut<UploadState>,
    mut inputs: MessageWriter<EditorInput>,
) {
    let Some(task) = upload.pending.as_mut() else {
        return;
    };
    let Some(result) = future::block_on(future::poll_once(task)) else {
        return;
    };
    upload.pending = None;

    match result {
        Some(path) => {
            info!("Uploaded background {:?}", path);
            inputs.write(EditorInput(EditorEvent::ImageUploaded(path)));
        }
        None => debug!("Upload cancelled"),
    }
}
