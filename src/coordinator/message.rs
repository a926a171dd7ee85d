//! Operator-facing diagnostic for a contended project lock.

use crate::config::FORCE_ANALYSIS;
use crate::duration;

/// Message shown when another run holds the project lock.
///
/// Names the project, how long ago the other run started, and the exact
/// property that forces a re-run.
pub fn contention_message(project_name: &str, held_for_ms: u64) -> String {
    format!(
        "It looks like an analysis of '{}' is already running (started {} ago). \
         If this is not the case, it probably means that the previous analysis was \
         interrupted and you should then force a re-run by using the option '{}=true'.",
        project_name,
        duration::label(held_for_ms),
        FORCE_ANALYSIS
    )
}
