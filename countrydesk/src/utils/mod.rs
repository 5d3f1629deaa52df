pub mod sanitize;
pub use sanitize::{DesiredType, FilterErrorNot, Sanitize};

pub mod terminal;
pub use terminal::{LineSource, ScriptedSource, StdinSource, Terminal, TerminalErrors};
