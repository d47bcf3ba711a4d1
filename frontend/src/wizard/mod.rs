//! Generic question/answer wizard shared by every product page.

pub mod api;
pub mod controller;
pub mod product;
pub mod progress;
pub mod session;
pub mod storage;

pub use api::{dispatch, HttpSessionApi};
pub use controller::{Phase, WizardController};
pub use product::{ProductConfig, ResultKind};
pub use storage::LocalStorage;
