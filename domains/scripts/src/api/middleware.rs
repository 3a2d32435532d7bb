//! Scripts domain state

use crate::repository::ScriptVersionRepository;

/// Application state for the Scripts domain
#[derive(Clone)]
pub struct ScriptsState {
    pub scripts: ScriptVersionRepository,
}
