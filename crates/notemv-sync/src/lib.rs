//! # notemv-sync
//!
//! The engine behind notemv. Keeps a note's location, file name and
//! first-line heading consistent in both directions:
//!
//! - [`dispatch`]: runs the command on the cursor line (`move [[dest]]`)
//! - [`mover`]: relocates the active file, rewriting a tracking heading
//! - [`title_sync`]: renames a file when its heading is edited
//! - [`migrate`]: moves one folder's notes into another
//!
//! All I/O goes through the host traits in `notemv-vault`.

pub mod debounce;
pub mod dispatch;
pub mod migrate;
pub mod mover;
pub mod resolver;
pub mod title_sync;

pub use debounce::Debouncer;
pub use dispatch::{CommandDispatcher, Dispatch};
pub use migrate::{migrate_folder, MigrationFailure, MigrationReport};
pub use mover::{MoveExecutor, MoveOutcome};
pub use resolver::{plan_destination, resolve, DestinationPlan, ResolvedDestination};
pub use title_sync::{SyncDecision, TitleSynchronizer};
