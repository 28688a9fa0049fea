//! Interactive edit session
//!
//! An [`EditSession`] owns three views of one layout and keeps them in step:
//!
//! - the applied [`Document`], which drags mutate and previews show
//! - the editor's text buffer, which the user types into
//! - the persisted layout in a [`LayoutStore`]
//!
//! Text edits are validated after a quiet period (see [`Debouncer`]). Apply
//! moves a valid buffer into the document; save additionally normalizes the
//! layout to the origin and persists it. Failed applies and saves leave every
//! view untouched.

pub mod debounce;
pub mod state;
pub mod store;
pub mod surface;

pub use debounce::Debouncer;
pub use state::BufferState;
pub use store::{FileStore, LayoutStore, MemoryStore};
pub use surface::{PreviewCache, Surface};

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::document::{Document, DocumentError, MAX_COORDINATE};
use crate::layout::{normalize_origin, snap, LayoutConfig, Size, SpanError};
use crate::renderer::{self, ImageLoader, RenderConfig, RenderError};

/// Default quiet period before an edited buffer is validated
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Errors surfaced by session actions
#[derive(Debug, Error)]
pub enum SessionError {
    /// The buffer (or stored layout) does not parse
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The layout store could not be read or written
    #[error("layout storage '{name}': {source}")]
    Store {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// A drag referenced a placement that does not exist
    #[error("no placement at index {index} (layout has {len})")]
    NoSuchPlacement { index: usize, len: usize },

    /// The layout is too spread out to save as one canvas
    #[error(transparent)]
    Span(#[from] SpanError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Configuration fixed at session start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    /// Quiet period after the last edit before the buffer is validated
    pub debounce: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            render: RenderConfig::default(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    pub fn with_render(mut self, config: RenderConfig) -> Self {
        self.render = config;
        self
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce = delay;
        self
    }
}

/// State machine mediating the text buffer, the applied document and storage
pub struct EditSession<S> {
    store: S,
    config: SessionConfig,
    document: Document,
    canvas: Size,
    buffer: String,
    state: BufferState,
    pending: Debouncer,
}

impl<S: LayoutStore> EditSession<S> {
    /// Load the layout from `store` and start a clean session
    pub fn open(store: S, config: SessionConfig) -> Result<Self, SessionError> {
        let text = store.load().map_err(|source| SessionError::Store {
            name: store.name(),
            source,
        })?;
        let document = Document::parse(&text)?;
        let canvas = document.canvas_size();
        info!(
            store = %store.name(),
            placements = document.placements.len(),
            %canvas,
            "opened layout"
        );
        let pending = Debouncer::new(config.debounce);
        Ok(Self {
            store,
            config,
            document,
            canvas,
            buffer: text,
            state: BufferState::Clean,
            pending,
        })
    }

    /// Re-read the store, discarding all in-memory state.
    ///
    /// The session is consumed: if the stored layout cannot be loaded there
    /// is nothing left to continue with.
    pub fn reload(self) -> Result<Self, SessionError> {
        let Self { store, config, .. } = self;
        Self::open(store, config)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn state(&self) -> &BufferState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// True while an edit is waiting for its quiet period to pass
    pub fn has_pending_validation(&self) -> bool {
        self.pending.is_pending()
    }

    /// Replace the text buffer. Validation is deferred until [`poll`](Self::poll)
    /// sees the buffer unchanged for the debounce delay.
    pub fn edit_text(&mut self, text: impl Into<String>, now: Instant) {
        self.buffer = text.into();
        self.pending.arm(now);
    }

    /// Run the deferred validation if it is due. Returns true if it ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.pending.fire_if_due(now) {
            return false;
        }
        self.validate_buffer();
        true
    }

    /// Move one placement to a candidate position, snapped to its neighbours.
    ///
    /// Only the applied document changes; the buffer and its state do not.
    /// Positions are kept within [`MAX_COORDINATE`] of the origin.
    pub fn drag(
        &mut self,
        index: usize,
        candidate_x: i64,
        candidate_y: i64,
    ) -> Result<(i64, i64), SessionError> {
        let placements = &self.document.placements;
        let moving = placements
            .get(index)
            .ok_or(SessionError::NoSuchPlacement {
                index,
                len: placements.len(),
            })?;
        let candidate = moving.rect().moved_to(
            candidate_x.clamp(-MAX_COORDINATE, MAX_COORDINATE),
            candidate_y.clamp(-MAX_COORDINATE, MAX_COORDINATE),
        );
        let others = placements
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, p)| p.rect());
        let (x, y) = snap(candidate, others, self.config.layout.snap_threshold);
        let x = x.clamp(-MAX_COORDINATE, MAX_COORDINATE);
        let y = y.clamp(-MAX_COORDINATE, MAX_COORDINATE);

        let placement = &mut self.document.placements[index];
        placement.x = x;
        placement.y = y;
        debug!(item = index + 1, candidate_x, candidate_y, x, y, "dragged");
        Ok((x, y))
    }

    /// Parse the buffer into a new applied document.
    ///
    /// Returns whether a new document was applied: a clean buffer has nothing
    /// to apply and yields `false` without changes. An invalid buffer fails
    /// with the stored error and changes nothing.
    pub fn apply(&mut self) -> Result<bool, SessionError> {
        self.flush_validation();
        match &self.state {
            BufferState::Clean => {
                debug!("apply: buffer already applied");
                Ok(false)
            }
            BufferState::DirtyInvalid(e) => Err(e.clone().into()),
            BufferState::DirtyValid => {
                let document = Document::parse(&self.buffer)?;
                self.replace_document(document);
                self.state = BufferState::Clean;
                info!(canvas = %self.canvas, "applied layout");
                Ok(true)
            }
        }
    }

    /// Normalize the layout to the origin and persist it.
    ///
    /// An edited buffer is parsed and saved; a clean buffer saves the applied
    /// document, including any drags. On success the buffer holds the
    /// normalized text and the state is clean. On failure nothing changes.
    pub fn save(&mut self) -> Result<(), SessionError> {
        self.flush_validation();
        let mut document = match &self.state {
            BufferState::DirtyInvalid(e) => return Err(e.clone().into()),
            BufferState::DirtyValid => Document::parse(&self.buffer)?,
            BufferState::Clean => self.document.clone(),
        };

        if let Some(n) = normalize_origin(&document.placements)? {
            if !n.is_identity() {
                debug!(shift_x = n.shift_x, shift_y = n.shift_y, "normalizing origin");
            }
            n.apply(&mut document.placements);
            document.canvas = Some(n.size);
        }

        let text = document.to_text().map_err(DocumentError::from)?;
        self.store
            .store(&text)
            .map_err(|source| SessionError::Store {
                name: self.store.name(),
                source,
            })?;

        self.buffer = text;
        self.replace_document(document);
        self.state = BufferState::Clean;
        info!(canvas = %self.canvas, "saved layout");
        Ok(())
    }

    /// Write the applied document, including drags, into the buffer
    pub fn sync_text(&mut self) -> Result<(), SessionError> {
        let text = self.document.to_text().map_err(DocumentError::from)?;
        if !self.state.is_clean() {
            warn!("sync_text replaced unapplied buffer edits");
        }
        self.buffer = text;
        self.pending.cancel();
        self.state = BufferState::Clean;
        Ok(())
    }

    /// Composite the applied document and write it as PNG.
    ///
    /// Writes to `output` if given, else to the layout's output path or the
    /// configured default. Returns the path written.
    pub fn export<L: ImageLoader>(
        &self,
        loader: &L,
        output: Option<&Path>,
    ) -> Result<PathBuf, SessionError> {
        let path = match output {
            Some(p) => p.to_path_buf(),
            None => PathBuf::from(self.document.output_or(&self.config.layout.default_output)),
        };
        let image = renderer::render(
            self.canvas,
            &self.document.placements,
            loader,
            &self.config.render,
        )?;
        renderer::write_png(&path, &image)?;
        Ok(path)
    }

    /// Paint the canvas and every placement onto a toolkit surface
    pub fn present<L: ImageLoader>(
        &self,
        surface: &mut dyn Surface,
        previews: &mut PreviewCache<L>,
    ) {
        surface.set_canvas(self.canvas);
        for (i, placement) in self.document.placements.iter().enumerate() {
            surface.paint(i, placement.rect(), &placement.file, previews.get(placement));
        }
    }

    fn flush_validation(&mut self) {
        if self.pending.is_pending() {
            self.pending.cancel();
            self.validate_buffer();
        }
    }

    fn validate_buffer(&mut self) {
        self.state = match Document::parse(&self.buffer) {
            Ok(_) => BufferState::DirtyValid,
            Err(e) => {
                debug!("buffer invalid: {}", e);
                BufferState::DirtyInvalid(e)
            }
        };
    }

    fn replace_document(&mut self, document: Document) {
        self.canvas = document.canvas_size();
        self.document = document;
    }
}
