mod mode_button;

pub use mode_button::ModeButton;
