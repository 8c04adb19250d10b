// Library surface for headless/integration tests and reuse.
// Rendering lives in the binary; everything here is terminal-agnostic
// apart from the key events the app consumes.
pub mod app;
pub mod app_dirs;
pub mod coach;
pub mod config;
pub mod error;
pub mod ledger;
pub mod lesson;
pub mod logging;
pub mod metrics;
pub mod result;
pub mod runtime;
pub mod scoreboard;
pub mod session;
pub mod util;

pub use error::{Result, TutorError};
pub use ledger::ProgressLedger;
pub use lesson::{Lesson, LessonCatalog, LessonCategory};
pub use result::SessionResult;
pub use session::SessionManager;
