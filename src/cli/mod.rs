//! # Command-Line Interface
//!
//! ```text
//! cfgfile [OPTIONS] <FILE> <ACTION>
//! ```
//!
//! ## Actions
//!
//! | Action | Effect |
//! |--------|--------|
//! | `set KEY VALUE [KEY VALUE...]` | Set all pairs, save once |
//! | `get KEY [DEFAULT]` | Print the value, or DEFAULT if missing |
//! | `del KEY...` | Delete keys, save once |
//! | `keylist` | Print every key |
//!
//! ## Defaults
//!
//! Flags override environment variables (`CFGFILE_ESCAPE`,
//! `CFGFILE_SEPARATOR`, `CFGFILE_MODFLAG`), which override `config.toml`.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the action.

mod app;
mod edit;
mod modflag;
mod output;

pub use app::{run, Action, Cli};
pub use modflag::ModFlag;
pub use output::Output;
