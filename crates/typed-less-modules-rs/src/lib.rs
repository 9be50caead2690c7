//! typed-less-modules-rs: TypeScript declarations for CSS/LESS modules.
//!
//! For every stylesheet matched by a pattern, the tool compiles it, collects
//! the class names it exports and writes `<file>.d.ts` plus a
//! `<file>.d.ts.map` pointing each declared name back at its rule. In check
//! mode the declarations are regenerated and compared with what is on disk.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod logging;
pub mod orchestrator;
pub mod output;

pub use config::Options;
pub use orchestrator::{run, Generator, WriteOutcome};
pub use output::{Alerts, CheckSummary, ConsoleAlerts};
