pub mod configuration;
pub mod domain;
pub mod form;
pub mod page;
pub mod pages;
pub mod telemetry;
pub mod transport;
