//! Chart state: the current selection, loaded data and load status.

mod state;

pub use state::{ChartSettings, LoadTicket, SalesChart};
