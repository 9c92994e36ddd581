//! Window command: shows the commitment window around a single start time.

use std::io::Write;

use anyhow::Result;
use ump_core::WindowPolicy;

use super::util::{parse_instant, write_json};
use crate::config::OutputFormat;

pub fn run<W: Write>(
    writer: &mut W,
    instant: &str,
    policy: &WindowPolicy,
    format: OutputFormat,
) -> Result<()> {
    let instant = parse_instant(instant)?;
    let window = policy.window_for(instant);
    tracing::debug!(%instant, ?window, "computed commitment window");

    match format {
        OutputFormat::Json => write_json(writer, &window)?,
        OutputFormat::Text => writeln!(writer, "{window}")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn render(instant: &str, format: OutputFormat) -> String {
        let mut output = Vec::new();
        run(&mut output, instant, &WindowPolicy::default(), format).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn window_text_output() {
        let output = render("2025-03-15T11:15:00Z", OutputFormat::Text);
        assert_snapshot!(output.trim_end(), @"2025-03-15 10:45 - 2025-03-15 12:45");
    }

    #[test]
    fn window_json_output() {
        let output = render("2025-03-15T10:44:00Z", OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["start"], "2025-03-15T10:00:00Z");
        assert_eq!(value["end"], "2025-03-15T12:00:00Z");
    }

    #[test]
    fn window_rejects_invalid_instant() {
        let mut output = Vec::new();
        let err = run(&mut output, "11:15", &WindowPolicy::default(), OutputFormat::Text)
            .unwrap_err();
        assert!(err.to_string().contains("Invalid instant"));
        assert!(output.is_empty());
    }
}
