//! The tools the weather agent exposes to the model.

mod weather;

pub use weather::WeatherTool;
