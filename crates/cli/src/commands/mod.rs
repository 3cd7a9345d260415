//! CLI Commands

pub mod demo;
pub mod check;
pub mod invoke;
pub mod catalog;

pub use demo::DemoCommand;
pub use check::CheckCommand;
pub use invoke::InvokeCommand;
pub use catalog::CatalogCommand;
