//! Screen implementations. The console is the only top-level screen.

pub mod console;
