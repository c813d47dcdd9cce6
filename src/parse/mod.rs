//! Output parsing for the two solver output contracts
//!
//! Free-form run diagnostics get a tolerant marker scan; the structured
//! point-query response gets a strict deserializer. The split is deliberate:
//! format drift in log text should fail the test, while a malformed probe
//! response is a tool-contract violation worth failing loudly on.

pub mod metrics;
pub mod probe;

pub use metrics::RunSummary;
pub use probe::ProbeRecord;
