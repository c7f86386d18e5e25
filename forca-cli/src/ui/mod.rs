// Terminal UI module using ratatui

mod app;
mod dashboard;
mod widgets;

pub use app::App;
pub use dashboard::{render, Dashboard};
