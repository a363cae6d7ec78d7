pub mod preview;
pub mod zoom;

pub use preview::log_preview;
pub use zoom::clamp_zoom;
