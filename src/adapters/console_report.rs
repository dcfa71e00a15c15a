//! Plain-text report adapter implementing ReportPort.
//!
//! Writes one block per outcome to any `io::Write`, normally stdout.

use crate::domain::error::HedgeboxError;
use crate::domain::pipeline::{RunOutcome, Snapshot};
use crate::domain::quant::QuantMetrics;
use crate::ports::report_port::ReportPort;
use std::io::Write;

const RULE_WIDTH: usize = 30;

pub struct ConsoleReportAdapter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReportAdapter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn rule(&mut self) -> std::io::Result<()> {
        writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))
    }

    fn write_quant(&mut self, quant: Option<&QuantMetrics>) -> std::io::Result<()> {
        let Some(q) = quant else {
            writeln!(self.out, "Volatility:  n/a")?;
            writeln!(self.out, "RSI:         n/a")?;
            return Ok(());
        };
        writeln!(self.out, "Last price:  {:.2}", q.last_price)?;
        writeln!(self.out, "Volatility:  {:.2}%", q.volatility * 100.0)?;
        writeln!(self.out, "Risk-adj.:   {:.2}", q.risk_adjusted_return)?;
        writeln!(self.out, "RSI:         {}", fmt_opt(q.momentum_oscillator))?;
        writeln!(self.out, "SMA:         {}", fmt_opt(q.moving_average))?;
        Ok(())
    }

    fn write_snapshot(&mut self, snap: &Snapshot) -> std::io::Result<()> {
        writeln!(self.out)?;
        self.rule()?;
        writeln!(self.out, "REPORT FOR: {}", snap.symbol)?;
        self.rule()?;
        self.write_quant(snap.quant.as_ref())?;
        writeln!(self.out, "AI score:    {}", snap.sentiment.score)?;
        writeln!(self.out, "Rationale:   {}", snap.sentiment.rationale)?;
        self.rule()?;
        writeln!(
            self.out,
            "DECISION:    {} (score: {:.1})",
            snap.decision.action, snap.decision.final_score
        )?;
        self.rule()
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "n/a".to_string(),
    }
}

impl<W: Write> ReportPort for ConsoleReportAdapter<W> {
    fn write(&mut self, outcome: &RunOutcome) -> Result<(), HedgeboxError> {
        match outcome {
            RunOutcome::Decided(snap) => self.write_snapshot(snap)?,
            RunOutcome::NoData { symbol, reason } => {
                writeln!(self.out, "No data found for {symbol}: {reason}")?
            }
            RunOutcome::Failed { symbol, error } => {
                writeln!(self.out, "Analysis failed for {symbol}: {error}")?
            }
        }
        self.out.flush()?;
        Ok(())
    }
}
