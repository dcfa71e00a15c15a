//! Report presentation port trait.

use crate::domain::error::HedgeboxError;
use crate::domain::pipeline::RunOutcome;

/// Port for presenting pipeline outcomes.
pub trait ReportPort {
    fn write(&mut self, outcome: &RunOutcome) -> Result<(), HedgeboxError>;

    /// Default implementation: writes each outcome in order.
    fn write_all(&mut self, outcomes: &[RunOutcome]) -> Result<(), HedgeboxError> {
        for outcome in outcomes {
            self.write(outcome)?;
        }
        Ok(())
    }
}
