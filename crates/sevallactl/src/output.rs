use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, clap::ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

pub fn print_output<T: Serialize>(data: T, format: OutputFormat) -> Result<()> {
    println!("{}", render(&data, format)?);
    Ok(())
}

fn render<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    let json_value = serde_json::to_value(data)?;

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&json_value)?,
        OutputFormat::Yaml => serde_yaml::to_string(&json_value)?
            .trim_end()
            .to_string(),
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_json() {
        let out = render(&json!({"id": "app_1"}), OutputFormat::Json).unwrap();
        assert_eq!(out, "{\n  \"id\": \"app_1\"\n}");
    }

    #[test]
    fn test_render_yaml() {
        let out = render(&json!({"id": "app_1", "tags": ["a"]}), OutputFormat::Yaml).unwrap();
        assert_eq!(out, "id: app_1\ntags:\n- a");
    }
}
