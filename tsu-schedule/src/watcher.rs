use tracing::debug;

use crate::lesson::Variant;
use crate::pass::{render_pass, PassSummary};
use crate::query::{DocumentMut, Observable};

/// Owned subscription to document changes that re-renders the schedule.
///
/// Notifications are suspended while a pass runs, so the pass's own insertions never
/// trigger another one.
#[derive(Debug)]
pub struct ChangeWatcher {
  variant: Variant,
  running: bool,
}

impl ChangeWatcher {
  pub fn new(variant: Variant) -> Self {
    Self {
      variant,
      running: false,
    }
  }

  pub fn is_running(&self) -> bool {
    self.running
  }

  pub fn start<D: Observable>(&mut self, doc: &mut D) {
    doc.observe();
    self.running = true;
  }

  pub fn stop<D: Observable>(&mut self, doc: &mut D) {
    doc.disconnect();
    self.running = false;
  }

  /// Runs one render pass if the document changed since the last poll.
  pub fn poll<D: DocumentMut + Observable>(
    &mut self,
    doc: &mut D,
  ) -> anyhow::Result<Option<PassSummary>> {
    if !self.running {
      return Ok(None);
    }

    let records = doc.take_records();
    if records == 0 {
      return Ok(None);
    }

    debug!("Document changed ({} records), rendering", records);

    doc.disconnect();
    let result = render_pass(doc, self.variant);
    doc.observe();

    result
  }
}
