pub mod app;
pub mod compare;
pub mod logging;
pub mod renderer;
pub mod session;
pub mod settings;
