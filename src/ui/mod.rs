//! Terminal output for venbluez.
//!
//! Operator-facing diagnostics go to the terminal through this module; the
//! tracing log file is kept separate.

pub mod report;
