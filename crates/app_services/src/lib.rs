mod logging;
mod services;
mod session;

pub use logging::init_local_logger;
pub use services::{AppServices, AppServicesBuilder, ServiceError, SettingsOutcome};
pub use session::NotebookSession;
