//! The "process current line" action.
//!
//! This is the boundary where errors stop: every failure becomes exactly
//! one user notice and a [`Dispatch`] value, and nothing propagates to the
//! host.

use serde::Serialize;

use notemv_core::config::CollisionCheck;
use notemv_core::error::NotemvError;
use notemv_parser::{parse_line, parse_move_args, Verb};
use notemv_vault::{Editor, NoteStore, Notifier, Workspace};

use crate::mover::{MoveExecutor, MoveOutcome};

pub const NO_ACTION_NOTICE: &str = "No recognized action on the current line.";
pub const TITLE_NOTICE: &str = "Title action is not implemented yet.";

/// What processing a command line ended in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Dispatch {
    Moved(MoveOutcome),
    /// `title` is recognized but has no behavior.
    TitleNotImplemented,
    /// The line holds no known verb.
    NoAction,
    /// A reported failure, with the notice that was shown.
    Failed { message: String },
}

/// Runs command lines from the active editor against a vault.
pub struct CommandDispatcher<'a, S, W, N> {
    store: &'a S,
    workspace: &'a mut W,
    notifier: &'a N,
    collision: CollisionCheck,
}

impl<'a, S, W, N> CommandDispatcher<'a, S, W, N>
where
    S: NoteStore,
    W: Workspace,
    N: Notifier,
{
    pub fn new(store: &'a S, workspace: &'a mut W, notifier: &'a N) -> Self {
        Self {
            store,
            workspace,
            notifier,
            collision: CollisionCheck::default(),
        }
    }

    pub fn with_collision(mut self, collision: CollisionCheck) -> Self {
        self.collision = collision;
        self
    }

    /// Read the line under the cursor and act on it.
    pub async fn process_current_line(&mut self) -> Dispatch {
        let Some(editor) = self.workspace.active_editor() else {
            return self.fail(&NotemvError::NoActiveContext("markdown view"));
        };
        let line = editor.line(editor.cursor_line()).unwrap_or_default();
        self.process_line(&line).await
    }

    /// Act on `line` as if it were under the cursor.
    pub async fn process_line(&mut self, line: &str) -> Dispatch {
        let command = parse_line(line);
        tracing::debug!(verb = %command.verb, args = %command.raw_args, "dispatching");

        match command.action() {
            Verb::Move => self.handle_move(&command.raw_args).await,
            Verb::Title => {
                self.notifier.notify(TITLE_NOTICE);
                Dispatch::TitleNotImplemented
            }
            Verb::Unknown => {
                self.notifier.notify(NO_ACTION_NOTICE);
                Dispatch::NoAction
            }
        }
    }

    async fn handle_move(&mut self, raw_args: &str) -> Dispatch {
        let spec = match parse_move_args(raw_args) {
            Ok(spec) => spec,
            Err(e) => return self.fail(&e),
        };
        let result = MoveExecutor::new(self.store, &mut *self.workspace, self.notifier)
            .with_collision(self.collision)
            .execute(&spec.link_target)
            .await;
        match result {
            Ok(outcome) => Dispatch::Moved(outcome),
            Err(e) => self.fail(&e),
        }
    }

    fn fail(&self, err: &NotemvError) -> Dispatch {
        let message = notice_for(err);
        tracing::warn!(error = %err, "command failed");
        self.notifier.notify(&message);
        Dispatch::Failed { message }
    }
}

/// The user-facing notice for a failed command.
pub fn notice_for(err: &NotemvError) -> String {
    match err {
        NotemvError::NoActiveContext(_) | NotemvError::InvalidSyntax(_) => err.to_string(),
        other => format!("Failed to move file: {other}"),
    }
}
