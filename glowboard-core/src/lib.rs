//! # Glowboard Core
//!
//! Collision-aware layout engine for Glowboard panels.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               EditorState                   │
//! │  dispatch(EditorCommand) -> Outcome         │
//! ├─────────────────────────────────────────────┤
//! │  Sessions         │  Layout operations      │
//! │  - Drag frames    │  - Add / duplicate      │
//! │  - Resize frames  │  - Paste / nudge        │
//! ├─────────────────────────────────────────────┤
//! │  Snapping         │  Collision service      │
//! │  - Panel thirds   │  - Safe position        │
//! │  - Sibling edges  │  - Safe resize          │
//! │  - Grid           │  - Batch correction     │
//! ├─────────────────────────────────────────────┤
//! │  Free-space search (spiral, then grid)      │
//! │  Geometry primitives (buffered overlap)     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Every algorithm below the editor is a pure function over an immutable
//! element snapshot. The editor is the only writer and publishes each new
//! snapshot as a whole.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod collision;
pub mod element;
pub mod error;
pub mod event;
pub mod free_space;
pub mod geometry;
pub mod history;
pub mod ops;
pub mod panel;
pub mod schema;
pub mod session;
pub mod snap;
pub mod state;

pub use collision::{validate_and_correct_positions, CollisionService, MIN_RESIZE_DIMENSION};
pub use element::{
    Element, ElementId, ElementKind, FontStyle, TextAlign, DEFAULT_ICON_SIZE, DEFAULT_TEXT_SIZE,
    FALLBACK_SIZE,
};
pub use error::{PanelError, PanelResult};
pub use event::{command_for_key, EditorCommand, KeyModifiers};
pub use free_space::{find_free_space, EDGE_PADDING, GRID_STEP, SPIRAL_RADIUS_LIMIT};
pub use geometry::{
    find_collisions, overlaps, satisfies_invariant, Point, Rect, Size, COLLISION_BUFFER,
};
pub use history::{History, Snapshot, DEFAULT_HISTORY_LIMIT};
pub use ops::{MutationResult, NudgeDirection, Rejection};
pub use panel::Panel;
pub use schema::{ElementDocument, GeometryDocument, LayoutDocument};
pub use session::{DragSession, FrameUpdate, ResizeSession};
pub use snap::{snap, Guide, GuideOrientation, SnapResult, SNAP_TOLERANCE};
pub use state::{EditorState, Notice, Outcome, NOTICE_TTL};

/// Glowboard core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
