//! Control-flow signals raised by views.
//!
//! A view returns `Err(Interrupt)` to abort the current pass. Interrupts are
//! never errors from the host's point of view: the controller consumes them.

use crate::core::Props;

/// Result type of every view routine.
pub type ViewResult = Result<(), Interrupt>;

/// Which view the controller re-runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RerunScope {
    /// Whole page.
    App,
    /// The fragment being rendered.
    Fragment,
    /// `Fragment` when rendering a fragment, `App` otherwise.
    #[default]
    Auto,
}

impl RerunScope {
    /// Resolve `Auto` against the kind of render in progress.
    pub fn resolve(self, in_fragment: bool) -> Self {
        match self {
            Self::Auto if in_fragment => Self::Fragment,
            Self::Auto => Self::App,
            other => other,
        }
    }
}

/// Restart request carrying the state snapshot to persist before rerunning.
#[derive(Debug, Clone, PartialEq)]
pub struct Rerun {
    pub state: Props,
    pub scope: RerunScope,
    /// Drop the current event so the next pass does not see it again.
    pub clear_event: bool,
}

/// Why a view stopped early.
#[derive(Debug, Clone, PartialEq)]
pub enum Interrupt {
    Rerun(Rerun),
    /// Stop without producing actions.
    Halt,
}

impl From<Rerun> for Interrupt {
    fn from(rerun: Rerun) -> Self {
        Self::Rerun(rerun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_auto_scope() {
        assert_eq!(RerunScope::Auto.resolve(true), RerunScope::Fragment);
        assert_eq!(RerunScope::Auto.resolve(false), RerunScope::App);
        assert_eq!(RerunScope::App.resolve(true), RerunScope::App);
        assert_eq!(RerunScope::Fragment.resolve(false), RerunScope::Fragment);
    }
}
