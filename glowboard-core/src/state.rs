//! Editor state management.
//!
//! [`EditorState`] owns the committed element snapshot and is its only
//! writer. Every command reads the current snapshot, derives the next one
//! through the layout operations, and replaces it as a whole. Drag and
//! resize frames touch only the active session; history is written once,
//! when the session ends.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::collision::validate_and_correct_positions;
use crate::element::{normalize_rotation, sanitize_geometry};
use crate::event::EditorCommand;
use crate::geometry::{collides_with_any, satisfies_invariant, Point, Rect, Size};
use crate::history::{History, Snapshot};
use crate::ops::{self, MutationResult, Rejection, NUDGE_STEP, NUDGE_STEP_LARGE};
use crate::schema::ElementDocument;
use crate::session::{DragSession, FrameUpdate, ResizeSession};
use crate::{Element, ElementId, Panel};

/// How long a notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// A transient user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Text to show.
    pub message: String,
    /// When the notice was raised.
    pub raised_at: Instant,
    /// How long it stays up.
    pub ttl: Duration,
}

impl Notice {
    fn new(message: impl Into<String>, now: Instant) -> Self {
        Self {
            message: message.into(),
            raised_at: now,
            ttl: NOTICE_TTL,
        }
    }

    /// Check if the notice should be dismissed at `now`.
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= self.ttl
    }
}

/// What a dispatched command did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A new snapshot was published.
    Committed {
        /// Snapshot version after the commit.
        version: u64,
    },
    /// A drag or resize session began.
    Started {
        /// Element under manipulation.
        element_id: ElementId,
    },
    /// An in-flight frame to display. Nothing was committed.
    Frame(FrameUpdate),
    /// The clipboard was filled.
    Clipboard {
        /// Elements now on the clipboard.
        count: usize,
    },
    /// The mutation could not be made legal. State is unchanged.
    Rejected(Rejection),
    /// Nothing to do: unknown target, no session, or no change.
    Ignored,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Committed { version } => write!(f, "committed (version {version})"),
            Self::Started { element_id } => write!(f, "started session on {element_id}"),
            Self::Frame(update) => write!(
                f,
                "frame {} at ({}, {}) {}x{}, {} guide(s)",
                update.element_id,
                update.geometry.x,
                update.geometry.y,
                update.geometry.width,
                update.geometry.height,
                update.guides.len()
            ),
            Self::Clipboard { count } => write!(f, "clipboard holds {count} element(s)"),
            Self::Rejected(reason) => write!(f, "rejected: {reason}"),
            Self::Ignored => write!(f, "ignored"),
        }
    }
}

#[derive(Debug, Clone)]
enum ActiveSession {
    Drag(DragSession),
    Resize(ResizeSession),
}

impl ActiveSession {
    fn current(&self) -> (ElementId, Rect) {
        match self {
            Self::Drag(s) => (s.element_id(), s.current()),
            Self::Resize(s) => (s.element_id(), s.current()),
        }
    }
}

/// The complete editor state for one panel.
#[derive(Debug, Clone)]
pub struct EditorState {
    panel: Panel,
    elements: Snapshot,
    version: u64,
    history: History,
    clipboard: Vec<Element>,
    session: Option<ActiveSession>,
    notice: Option<Notice>,
}

impl EditorState {
    /// Create an empty editor for a panel.
    #[must_use]
    pub fn new(panel: Panel) -> Self {
        Self {
            panel,
            elements: Arc::from(Vec::<Element>::new()),
            version: 0,
            history: History::new(),
            clipboard: Vec::new(),
            session: None,
            notice: None,
        }
    }

    /// Create an editor over loaded elements.
    ///
    /// Geometry is sanitized and overlaps are corrected before the elements
    /// become the first committed snapshot. Loading is not undoable.
    #[must_use]
    pub fn with_elements(panel: Panel, elements: Vec<Element>) -> Self {
        let sanitized: Vec<Element> = elements
            .into_iter()
            .map(|mut e| {
                e.geometry = sanitize_geometry(e.geometry);
                e.rotation = normalize_rotation(e.rotation);
                e
            })
            .collect();
        let corrected = validate_and_correct_positions(&sanitized, &panel);
        tracing::debug!(count = corrected.len(), "Loaded elements");

        Self {
            elements: corrected.into(),
            ..Self::new(panel)
        }
    }

    /// Replace the history with one bounded to `limit` entries.
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = History::with_limit(limit);
        self
    }

    /// Panel dimensions.
    #[must_use]
    pub const fn panel(&self) -> &Panel {
        &self.panel
    }

    /// Committed elements in draw order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Shared handle to the committed snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.elements)
    }

    /// Monotonic counter bumped by every published snapshot.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Elements currently on the clipboard.
    #[must_use]
    pub fn clipboard(&self) -> &[Element] {
        &self.clipboard
    }

    /// Current notice, if any.
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Check if a drag or resize is in flight.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Check if there is anything to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if there is anything to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Elements as they should be drawn right now.
    ///
    /// The committed snapshot with the in-flight session geometry overlaid.
    #[must_use]
    pub fn display_elements(&self) -> Vec<Element> {
        let mut elements = self.elements.to_vec();
        if let Some(session) = &self.session {
            let (id, geometry) = session.current();
            if let Some(element) = elements.iter_mut().find(|e| e.id == id) {
                element.geometry = geometry;
            }
        }
        elements
    }

    /// Consume the one-shot edit request of a freshly added element.
    ///
    /// Returns the element that should enter edit mode. The flag is cleared
    /// without touching history or the version.
    pub fn take_auto_edit(&mut self) -> Option<ElementId> {
        let index = self.elements.iter().position(|e| e.auto_edit)?;
        let mut next = self.elements.to_vec();
        next[index].auto_edit = false;
        let id = next[index].id;
        self.elements = next.into();
        Some(id)
    }

    /// Drop the notice once its time is up. Returns true if one was dismissed.
    pub fn dismiss_expired(&mut self, now: Instant) -> bool {
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
            true
        } else {
            false
        }
    }

    /// Apply a command.
    pub fn dispatch(&mut self, command: EditorCommand) -> Outcome {
        self.dispatch_at(command, Instant::now())
    }

    /// Apply a command, stamping any notice it raises with `now`.
    pub fn dispatch_at(&mut self, command: EditorCommand, now: Instant) -> Outcome {
        match command {
            EditorCommand::AddText { content } => self.add(Element::text(content), now),
            EditorCommand::AddIcon { icon } => self.add(Element::icon(icon), now),
            EditorCommand::Duplicate { id } => {
                let result = ops::duplicate_element(&self.elements, &self.panel, id);
                self.commit(result, now)
            }
            EditorCommand::Copy { id } => self.copy(id),
            EditorCommand::Cut { id } => match self.copy(id) {
                Outcome::Clipboard { .. } => {
                    let result = ops::delete_element(&self.elements, id);
                    self.commit(result, now)
                }
                other => other,
            },
            EditorCommand::Paste { payload } => {
                let sources: Vec<Element> = match payload {
                    Some(docs) => docs
                        .into_iter()
                        .map(ElementDocument::into_clipboard_element)
                        .collect(),
                    None => self.clipboard.clone(),
                };
                if sources.is_empty() {
                    return Outcome::Ignored;
                }
                let result = ops::paste_elements(&self.elements, &self.panel, &sources);
                self.commit(result, now)
            }
            EditorCommand::Delete { id } => {
                let result = ops::delete_element(&self.elements, id);
                self.commit(result, now)
            }
            EditorCommand::Nudge {
                id,
                direction,
                large,
            } => {
                let step = if large { NUDGE_STEP_LARGE } else { NUDGE_STEP };
                let result = ops::nudge_element(&self.elements, &self.panel, id, direction, step);
                self.commit(result, now)
            }
            EditorCommand::Rotate { id, degrees } => {
                let result = ops::rotate_element(&self.elements, id, degrees);
                self.commit(result, now)
            }
            EditorCommand::BringToFront { id } => {
                let result = ops::bring_to_front(&self.elements, id);
                self.commit(result, now)
            }
            EditorCommand::SendToBack { id } => {
                let result = ops::send_to_back(&self.elements, id);
                self.commit(result, now)
            }
            EditorCommand::DragStart { id } => self.start_session(id, true),
            EditorCommand::ResizeStart { id } => self.start_session(id, false),
            EditorCommand::DragMove { x, y } => self.drag_frame(Point::new(x, y)),
            EditorCommand::ResizeMove {
                width,
                height,
                x,
                y,
            } => {
                let origin = x.zip(y).map(|(x, y)| Point::new(x, y));
                self.resize_frame(Size::new(width, height), origin)
            }
            EditorCommand::DragEnd => self.end_session(true, now),
            EditorCommand::ResizeEnd => self.end_session(false, now),
            EditorCommand::DragCancel => self.cancel_session(true),
            EditorCommand::ResizeCancel => self.cancel_session(false),
            EditorCommand::ValidateAll => {
                let corrected = validate_and_correct_positions(&self.elements, &self.panel);
                self.commit(Ok(corrected), now)
            }
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
        }
    }

    fn add(&mut self, element: Element, now: Instant) -> Outcome {
        let result = ops::add_element(&self.elements, &self.panel, element).map(|mut next| {
            if let Some(added) = next.last_mut() {
                added.auto_edit = true;
            }
            next
        });
        self.commit(result, now)
    }

    fn copy(&mut self, id: ElementId) -> Outcome {
        match self.elements.iter().find(|e| e.id == id) {
            Some(element) => {
                self.clipboard = vec![element.clone()];
                Outcome::Clipboard { count: 1 }
            }
            None => Outcome::Ignored,
        }
    }

    /// Publish a mutation result as the next snapshot.
    fn commit(&mut self, result: MutationResult, now: Instant) -> Outcome {
        match result {
            Ok(next) if next.as_slice() == &*self.elements => Outcome::Ignored,
            Ok(next) => {
                let previous = std::mem::replace(&mut self.elements, next.into());
                self.history.record(previous);
                self.version += 1;
                tracing::debug!(version = self.version, "Committed snapshot");
                Outcome::Committed {
                    version: self.version,
                }
            }
            Err(Rejection::ElementNotFound(id)) => {
                tracing::debug!(%id, "Command target no longer exists");
                Outcome::Ignored
            }
            Err(Rejection::NoSpace) => {
                self.notice = Some(Notice::new(Rejection::NoSpace.to_string(), now));
                Outcome::Rejected(Rejection::NoSpace)
            }
            Err(reason) => Outcome::Rejected(reason),
        }
    }

    fn start_session(&mut self, id: ElementId, drag: bool) -> Outcome {
        if self.session.take().is_some() {
            tracing::debug!("Discarding unfinished session");
        }
        self.session = if drag {
            DragSession::start(&self.elements, id).map(ActiveSession::Drag)
        } else {
            ResizeSession::start(&self.elements, id).map(ActiveSession::Resize)
        };
        if self.session.is_some() {
            Outcome::Started { element_id: id }
        } else {
            Outcome::Ignored
        }
    }

    fn drag_frame(&mut self, proposed: Point) -> Outcome {
        let Some(ActiveSession::Drag(session)) = &mut self.session else {
            return Outcome::Ignored;
        };
        match session.frame(&self.elements, &self.panel, proposed) {
            Some(update) => Outcome::Frame(update),
            None => {
                self.session = None;
                Outcome::Ignored
            }
        }
    }

    fn resize_frame(&mut self, proposed: Size, origin: Option<Point>) -> Outcome {
        let Some(ActiveSession::Resize(session)) = &mut self.session else {
            return Outcome::Ignored;
        };
        match session.frame(&self.elements, &self.panel, proposed, origin) {
            Some(update) => Outcome::Frame(update),
            None => {
                self.session = None;
                Outcome::Ignored
            }
        }
    }

    fn end_session(&mut self, drag: bool, now: Instant) -> Outcome {
        let finished = match self.session.take() {
            Some(ActiveSession::Drag(s)) if drag => s.finish(),
            Some(ActiveSession::Resize(s)) if !drag => s.finish(),
            other => {
                self.session = other;
                return Outcome::Ignored;
            }
        };
        let Some((id, geometry)) = finished else {
            return Outcome::Ignored;
        };

        // Commands applied mid-session may have filled the target slot.
        let others: Vec<Rect> = self
            .elements
            .iter()
            .filter(|e| e.id != id)
            .map(|e| e.geometry)
            .collect();
        if collides_with_any(&geometry, &others) {
            tracing::warn!(%id, "Session result collides with current layout, discarding");
            return Outcome::Rejected(Rejection::Blocked);
        }

        let outcome = self.commit(ops::set_geometry(&self.elements, id, geometry), now);
        if matches!(outcome, Outcome::Committed { .. }) {
            let kind = if drag { "drag" } else { "resize" };
            tracing::info!(%id, ?geometry, kind, "Session committed");
        }
        outcome
    }

    fn cancel_session(&mut self, drag: bool) -> Outcome {
        match self.session.take() {
            Some(ActiveSession::Drag(_)) if drag => {
                tracing::debug!("Drag cancelled");
            }
            Some(ActiveSession::Resize(_)) if !drag => {
                tracing::debug!("Resize cancelled");
            }
            other => self.session = other,
        }
        Outcome::Ignored
    }

    fn undo(&mut self) -> Outcome {
        self.session = None;
        match self.history.undo(Arc::clone(&self.elements)) {
            Some(previous) => self.restore(previous),
            None => Outcome::Ignored,
        }
    }

    fn redo(&mut self) -> Outcome {
        self.session = None;
        match self.history.redo(Arc::clone(&self.elements)) {
            Some(next) => self.restore(next),
            None => Outcome::Ignored,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) -> Outcome {
        self.elements = snapshot;
        self.version += 1;
        Outcome::Committed {
            version: self.version,
        }
    }

    /// Check the committed snapshot against the collision invariant.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        satisfies_invariant(&self.elements)
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(Panel::default())
    }
}
