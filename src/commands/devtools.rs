//! DevTools commands

use crate::devtools::DevToolsOutcome;
use crate::AppState;

/// Open devtools, either in the system browser (`remote`) or embedded.
pub fn open_devtools(state: &AppState, remote: bool) -> DevToolsOutcome {
    state.devtools.open(remote)
}
