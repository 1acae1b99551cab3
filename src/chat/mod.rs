pub mod commands;
pub mod draft;
pub mod model;
pub mod stepper;
