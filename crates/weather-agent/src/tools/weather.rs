use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use weather_agent_client::tool::{Tool, ToolOutput, ToolResult};

#[derive(Deserialize, JsonSchema)]
pub struct WeatherToolParameters {
    #[schemars(description = "The location to report the weather for.")]
    location: Option<String>,
}

/// A dummy weather tool that always reports 69F.
///
/// Swap the body of `execute` for a real weather lookup to turn the
/// demo into a useful agent; the registration surface stays the same.
pub struct WeatherTool {
    parameter_schema: Value,
}

impl WeatherTool {
    /// Creates a new weather tool.
    #[inline]
    pub fn new() -> Self {
        WeatherTool {
            parameter_schema: schema_for!(WeatherToolParameters).to_value(),
        }
    }
}

impl Default for WeatherTool {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for WeatherTool {
    type Input = WeatherToolParameters;

    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get the current weather for a given location"
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: WeatherToolParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        async move {
            let location =
                input.location.unwrap_or_else(|| "unknown".to_owned());
            Ok(ToolOutput::text(format!(
                "The weather in {location} is 69F (nice and comfortable!)"
            )))
        }
    }
}
