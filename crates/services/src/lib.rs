#![forbid(unsafe_code)]

pub mod app_services;
pub mod course_catalog;
pub mod error;
pub mod progress_service;

pub use course_core::Clock;
pub use course_core::engine::{ModulePercentPolicy, ProgressPolicy, UnlockPolicy};

pub use app_services::AppServices;
pub use course_catalog::builtin_catalog;
pub use error::AppServicesError;
pub use progress_service::{ProgressService, QuizAnswer};
