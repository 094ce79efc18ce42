//! Reactive controller: explicit bindings from control values to outputs.
//!
//! Each binding declares the controls it listens to and the output it writes.
//! A control change runs every binding listening to that control exactly
//! once, to completion, before `change` returns.

use crate::dashboard::layout::ControlId;
use crate::data::SalesTable;
use crate::error::AppError;
use crate::report::{ReportOutput, render_report_for, year_selector_disabled};

/// Current values of the input controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    /// Raw report-type value (`None` when nothing is selected).
    pub statistics: Option<String>,
    pub year: i32,
}

impl Controls {
    /// Startup values: no report type, first year option.
    pub fn initial(table: &SalesTable) -> Self {
        Self {
            statistics: None,
            year: table.years().first().copied().unwrap_or_default(),
        }
    }
}

/// Outputs written by the bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub year_disabled: bool,
    pub output: ReportOutput,
}

impl Default for View {
    fn default() -> Self {
        Self {
            year_disabled: true,
            output: ReportOutput::Empty,
        }
    }
}

/// A user interaction with one of the input controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlChange {
    Statistics(Option<String>),
    Year(i32),
}

impl ControlChange {
    pub fn control(&self) -> ControlId {
        match self {
            ControlChange::Statistics(_) => ControlId::Statistics,
            ControlChange::Year(_) => ControlId::Year,
        }
    }
}

type Handler = fn(&SalesTable, &Controls, &mut View) -> Result<(), AppError>;

/// A handler registered against named control-change events.
pub struct Binding {
    pub name: &'static str,
    pub inputs: &'static [ControlId],
    pub output: ControlId,
    handler: Handler,
}

/// Registered bindings, in dispatch order.
pub const BINDINGS: &[Binding] = &[
    Binding {
        name: "update_year_selector",
        inputs: &[ControlId::Statistics],
        output: ControlId::Year,
        handler: update_year_selector,
    },
    Binding {
        name: "update_output_container",
        inputs: &[ControlId::Year, ControlId::Statistics],
        output: ControlId::Output,
        handler: update_output_container,
    },
];

fn update_year_selector(_: &SalesTable, controls: &Controls, view: &mut View) -> Result<(), AppError> {
    view.year_disabled = year_selector_disabled(controls.statistics.as_deref());
    Ok(())
}

fn update_output_container(
    table: &SalesTable,
    controls: &Controls,
    view: &mut View,
) -> Result<(), AppError> {
    // Assign only after a successful render so a failure keeps the previous output.
    let output = render_report_for(table, controls.year, controls.statistics.as_deref())?;
    view.output = output;
    Ok(())
}

/// Dashboard state for one session (a terminal run or one HTTP request).
pub struct Dashboard<'t> {
    table: &'t SalesTable,
    controls: Controls,
    view: View,
}

impl<'t> Dashboard<'t> {
    /// Create the dashboard with startup control values and run the initial render.
    pub fn new(table: &'t SalesTable) -> Result<Self, AppError> {
        Self::with_controls(table, Controls::initial(table))
    }

    /// Create the dashboard with given control values and run every binding once.
    pub fn with_controls(table: &'t SalesTable, controls: Controls) -> Result<Self, AppError> {
        let mut dashboard = Self {
            table,
            controls,
            view: View::default(),
        };
        dashboard.run(BINDINGS.iter())?;
        Ok(dashboard)
    }

    pub fn table(&self) -> &'t SalesTable {
        self.table
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Apply a control change and run the bindings listening to it.
    ///
    /// Returns the outputs that were updated. If a binding fails, the other
    /// bindings still run and the first error is returned; the failed output
    /// keeps its previous value.
    pub fn change(&mut self, change: ControlChange) -> Result<Vec<ControlId>, AppError> {
        let control = change.control();
        match change {
            ControlChange::Statistics(value) => {
                self.controls.statistics = value.filter(|v| !v.trim().is_empty());
            }
            ControlChange::Year(year) => self.controls.year = year,
        }

        self.run(BINDINGS.iter().filter(|b| b.inputs.contains(&control)))
    }

    fn run<'b>(&mut self, bindings: impl Iterator<Item = &'b Binding>) -> Result<Vec<ControlId>, AppError> {
        let mut updated = Vec::new();
        let mut first_error = None;

        for binding in bindings {
            tracing::debug!(
                binding = binding.name,
                output = binding.output.as_str(),
                "dispatching binding"
            );
            match (binding.handler)(self.table, &self.controls, &mut self.view) {
                Ok(()) => updated.push(binding.output),
                Err(err) => {
                    tracing::error!(binding = binding.name, error = %err, "binding failed");
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(updated),
        }
    }
}
