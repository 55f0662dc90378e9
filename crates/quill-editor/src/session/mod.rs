//! The draft/publish lifecycle manager.
//!
//! A session is the lifetime of one open editing or viewing interaction
//! with a single post, bounded by construction and teardown. Editing and
//! viewing are separate types rather than a mode flag: [`EditSession`] has
//! the save path, [`ViewSession`] has none.

mod debounce;
mod edit;
mod state;
mod view;

pub use debounce::Debouncer;
pub use edit::{DEFAULT_AUTOSAVE_DELAY, EditSession, SessionConfig};
pub use state::SessionPhase;
pub use view::ViewSession;
