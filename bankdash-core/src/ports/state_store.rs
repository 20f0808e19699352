//! State store port - persisted application flags

use crate::domain::result::Result;
use crate::domain::AppState;

/// Typed load/save boundary for the dashboard's persisted flags
///
/// Every read and write of login, PIN and mode flags goes through this
/// trait instead of ad hoc key lookups.
pub trait StateStore: Send + Sync {
    /// Load the current state. A store with nothing saved yet returns defaults.
    fn load(&self) -> Result<AppState>;

    /// Replace the stored state
    fn save(&self, state: &AppState) -> Result<()>;

    /// Load, apply `change`, save, and return the new state
    fn update(&self, change: &mut dyn FnMut(&mut AppState)) -> Result<AppState> {
        let mut state = self.load()?;
        change(&mut state);
        self.save(&state)?;
        Ok(state)
    }
}
