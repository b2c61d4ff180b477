/// Per-run settings handed to every component of a database run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Agent id stamped on every stored result.
    pub agent_id: i64,
    /// Code stored for undetermined pairs.
    pub default_marker: char,
    /// Repository area holding scanned files.
    pub repo_area: String,
    pub workers: usize,
}

impl RunContext {
    #[must_use]
    pub fn new(agent_id: i64, default_marker: char, repo_area: impl Into<String>, workers: usize) -> Self {
        Self {
            agent_id,
            default_marker,
            repo_area: repo_area.into(),
            workers: workers.max(1),
        }
    }
}
