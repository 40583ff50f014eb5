use std::collections::HashMap;

use iced::widget::image::{Handle, Image};
use iced::widget::{button, column, container, row, scrollable, text, Column};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod intake;
mod render;
mod state;
mod ui;

use config::EditorConfig;
use intake::{DecodeBatch, Decoded};
use render::Composite;
use state::{EntryId, Stack};

/// Main application state
struct ImageStackEditor {
    config: EditorConfig,
    /// Current stack, replaced as a whole on every edit
    stack: Stack,
    /// Row previews, keyed by entry
    thumbnails: HashMap<EntryId, Handle>,
    /// Last finished composite
    preview: Option<Handle>,
    /// Bumped on every render request; older results are dropped
    generation: u64,
    /// Selections still being decoded
    pending_batches: usize,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the "Add file" button
    AddFiles,
    /// Background decode of a selection finished
    FilesDecoded(Result<DecodeBatch, String>),
    MoveUp(usize),
    MoveDown(usize),
    Remove(usize),
    /// Background composite finished for the given generation
    Composited(u64, Result<Composite, String>),
}

impl ImageStackEditor {
    fn new() -> (Self, Task<Message>) {
        let config = EditorConfig::load();
        tracing::info!(
            "Image stack editor started: {}px canvas, {:?} filter",
            config.canvas_size,
            config.filter
        );

        let mut editor = Self::with_config(config);
        let task = editor.render();
        (editor, task)
    }

    fn with_config(config: EditorConfig) -> Self {
        ImageStackEditor {
            config,
            stack: Stack::new(),
            thumbnails: HashMap::new(),
            preview: None,
            generation: 0,
            pending_batches: 0,
            status: "Ready. Add some images to start stacking.".to_string(),
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::AddFiles => {
                let Some(paths) = FileDialog::new()
                    .set_title("Select images to stack")
                    .add_filter("Images", intake::IMAGE_EXTENSIONS)
                    .pick_files()
                else {
                    return Task::none();
                };

                if paths.is_empty() {
                    return Task::none();
                }

                self.pending_batches += 1;
                self.status = format!("Loading {} files...", paths.len());

                Task::perform(
                    intake::load_batch(paths, self.config.thumbnail_size),
                    |result| Message::FilesDecoded(result.map_err(|e| e.to_string())),
                )
            }
            Message::FilesDecoded(result) => {
                self.pending_batches = self.pending_batches.saturating_sub(1);

                match result {
                    Ok(batch) => self.add_batch(batch),
                    Err(e) => {
                        tracing::warn!("Loading failed: {}", e);
                        self.status = format!("Loading failed: {}", e);
                        Task::none()
                    }
                }
            }
            Message::MoveUp(index) => {
                let action = format!("Moved {} up", self.entry_name(index));
                self.replace_stack(self.stack.move_up(index), action)
            }
            Message::MoveDown(index) => {
                let action = format!("Moved {} down", self.entry_name(index));
                self.replace_stack(self.stack.move_down(index), action)
            }
            Message::Remove(index) => {
                let action = format!("Removed {}", self.entry_name(index));
                self.replace_stack(self.stack.remove(index), action)
            }
            Message::Composited(generation, result) => {
                if generation != self.generation {
                    tracing::debug!(
                        "Dropping stale composite {} (latest {})",
                        generation,
                        self.generation
                    );
                    return Task::none();
                }

                match result {
                    Ok(composite) => {
                        tracing::debug!(
                            "Showing composite of {} layers ({:?})",
                            composite.layers,
                            composite.elapsed
                        );
                        let (width, height) = composite.image.dimensions();
                        self.preview = Some(Handle::from_rgba(
                            width,
                            height,
                            composite.image.into_raw(),
                        ));
                    }
                    Err(e) => {
                        tracing::error!("Compositing failed: {}", e);
                        self.status = format!("Compositing failed: {}", e);
                    }
                }

                Task::none()
            }
        }
    }

    fn add_batch(&mut self, batch: DecodeBatch) -> Task<Message> {
        let added = batch.decoded.len();
        let mut entries = Vec::with_capacity(added);
        for Decoded { entry, thumbnail } in batch.decoded {
            self.thumbnails.insert(entry.id, ui::to_handle(thumbnail));
            entries.push(entry);
        }
        self.stack = self.stack.append(entries);

        self.status = match batch.failed.first() {
            None => format!("Added {} images. {} in stack.", added, self.stack.len()),
            Some(first) => format!(
                "Added {} images, skipped {} ({}: {}). {} in stack.",
                added,
                batch.failed.len(),
                first.name(),
                first.reason,
                self.stack.len()
            ),
        };

        if added == 0 {
            return Task::none();
        }
        self.render()
    }

    /// Filename of the entry at `index` in the current stack
    fn entry_name(&self, index: usize) -> String {
        self.stack
            .entries()
            .get(index)
            .map(|e| e.source.name.clone())
            .unwrap_or_default()
    }

    /// Swap in the result of a stack edit, or keep the old stack on error
    fn replace_stack(&mut self, result: error::Result<Stack>, action: String) -> Task<Message> {
        match result {
            Ok(stack) => {
                self.stack = stack;
                let live = self.stack.ids();
                self.thumbnails.retain(|id, _| live.contains(id));
                self.status = format!("{}. {} in stack.", action, self.stack.len());
                self.render()
            }
            Err(e) => {
                tracing::warn!("Ignoring stack edit: {}", e);
                self.status = e.to_string();
                Task::none()
            }
        }
    }

    /// Full redraw of the current stack in the background
    fn render(&mut self) -> Task<Message> {
        self.generation += 1;
        let generation = self.generation;

        Task::perform(
            render::composite_async(
                self.stack.clone(),
                self.config.canvas_size,
                self.config.filter.into(),
            ),
            move |result| Message::Composited(generation, result.map_err(|e| e.to_string())),
        )
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let status = if self.pending_batches > 0 {
            format!("{} (decoding...)", self.status)
        } else {
            self.status.clone()
        };

        let toolbar = row![
            button("Add file")
                .on_press(Message::AddFiles)
                .padding(10),
            text(status).size(16),
        ]
        .spacing(20)
        .align_y(Alignment::Center);

        let list = scrollable(ui::stack_list::view(
            &self.stack,
            &self.thumbnails,
            self.config.thumbnail_size,
        ))
        .width(Length::Fixed(360.0))
        .height(Length::Fill);

        let canvas: Element<Message> = match &self.preview {
            Some(handle) => Image::new(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => text("Rendering...").into(),
        };

        let content: Column<Message> = column![
            toolbar,
            row![
                list,
                container(canvas)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .center_x(Length::Fill)
                    .center_y(Length::Fill),
            ]
            .spacing(20),
        ]
        .spacing(20)
        .padding(20);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    iced::application(
        "Image Stack",
        ImageStackEditor::update,
        ImageStackEditor::view,
    )
    .theme(ImageStackEditor::theme)
    .centered()
    .run_with(ImageStackEditor::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::decode::DecodeFailure;
    use crate::state::ImageEntry;

    fn decoded(name: &str) -> Decoded {
        Decoded {
            entry: ImageEntry::solid(name, 4, 4, [0, 0, 0, 255]),
            thumbnail: image::RgbaImage::new(4, 4),
        }
    }

    fn editor_with(n: usize) -> ImageStackEditor {
        let mut editor = ImageStackEditor::with_config(EditorConfig::default());
        let _ = editor.add_batch(DecodeBatch {
            decoded: (0..n).map(|i| decoded(&format!("{}.png", i))).collect(),
            failed: Vec::new(),
        });
        editor
    }

    #[test]
    fn test_add_batch_registers_thumbnails() {
        let editor = editor_with(3);

        assert_eq!(editor.stack.len(), 3);
        assert_eq!(editor.thumbnails.len(), 3);
        assert_eq!(editor.generation, 1);
        assert_eq!(editor.status, "Added 3 images. 3 in stack.");
    }

    #[test]
    fn test_add_batch_reports_skipped_files() {
        let mut editor = editor_with(1);

        let _ = editor.add_batch(DecodeBatch {
            decoded: vec![decoded("ok.png")],
            failed: vec![
                DecodeFailure {
                    path: "/photos/broken.png".into(),
                    reason: "unsupported format".to_string(),
                },
                DecodeFailure {
                    path: "/photos/gone.png".into(),
                    reason: "not found".to_string(),
                },
            ],
        });

        assert_eq!(editor.stack.len(), 2);
        assert_eq!(
            editor.status,
            "Added 1 images, skipped 2 (broken.png: unsupported format). 2 in stack."
        );
    }

    #[test]
    fn test_failed_load_keeps_stack() {
        let mut editor = editor_with(2);
        editor.pending_batches = 1;

        let _ = editor.update(Message::FilesDecoded(Err("no files were selected".to_string())));

        assert_eq!(editor.pending_batches, 0);
        assert_eq!(editor.stack.len(), 2);
        assert_eq!(editor.generation, 1);
        assert_eq!(editor.status, "Loading failed: no files were selected");
    }

    #[test]
    fn test_remove_drops_thumbnail() {
        let mut editor = editor_with(3);
        let removed = editor.stack.entries()[1].id;

        let _ = editor.update(Message::Remove(1));

        assert_eq!(editor.stack.len(), 2);
        assert!(!editor.thumbnails.contains_key(&removed));
        assert_eq!(editor.generation, 2);
        assert_eq!(editor.status, "Removed 1.png. 2 in stack.");
    }

    #[test]
    fn test_moves_update_status() {
        let mut editor = editor_with(3);

        let _ = editor.update(Message::MoveUp(2));
        assert_eq!(editor.status, "Moved 2.png up. 3 in stack.");

        let _ = editor.update(Message::MoveDown(0));
        assert_eq!(editor.status, "Moved 0.png down. 3 in stack.");
    }

    #[test]
    fn test_bad_index_keeps_stack() {
        let mut editor = editor_with(2);
        let before = editor.stack.ids();

        let _ = editor.update(Message::MoveDown(7));

        assert_eq!(editor.stack.ids(), before);
        assert_eq!(editor.generation, 1);
        assert_eq!(editor.status, "index 7 is out of range for a stack of 2");

        // The next good edit replaces the error
        let _ = editor.update(Message::Remove(0));
        assert_eq!(editor.status, "Removed 0.png. 1 in stack.");
    }

    #[test]
    fn test_stale_composite_is_dropped() {
        let mut editor = editor_with(1);
        let _ = editor.update(Message::MoveUp(0));
        assert_eq!(editor.generation, 2);

        let stale = Composite {
            image: image::RgbaImage::new(2, 2),
            layers: 1,
            elapsed: std::time::Duration::ZERO,
        };
        let _ = editor.update(Message::Composited(1, Ok(stale.clone())));
        assert!(editor.preview.is_none());

        let _ = editor.update(Message::Composited(2, Ok(stale)));
        assert!(editor.preview.is_some());
    }
}
