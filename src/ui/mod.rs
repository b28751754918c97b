mod alert;
mod app;
mod components;

pub use alert::ViewportAlert;
pub use app::ChatApp;
