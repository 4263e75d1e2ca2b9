use chrono::{DateTime, Local};
use console::style;

use crate::jenkins::types::{BuildResult, BuildStatus};

/// Renders an epoch-milliseconds timestamp in local time.
pub fn format_timestamp(epoch_ms: u64) -> String {
    match DateTime::from_timestamp_millis(epoch_ms as i64) {
        Some(dt) => dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "unknown".to_string(),
    }
}

fn styled_result(result: Option<BuildResult>) -> console::StyledObject<String> {
    let text = result
        .map(|r| r.to_string())
        .unwrap_or_else(|| "UNKNOWN".to_string());
    match result {
        Some(BuildResult::Success) => style(text).green().bold(),
        Some(BuildResult::Unstable) => style(text).yellow().bold(),
        Some(BuildResult::Failure) | Some(BuildResult::Aborted) => style(text).red().bold(),
        _ => style(text).dim(),
    }
}

/// Prints the completion summary for a finished build.
pub fn print_build_summary(status: &BuildStatus) {
    println!();
    println!("Build completed!");
    println!("Result: {}", styled_result(status.result));
    println!("Duration: {:.2}s", status.duration as f64 / 1000.0);
    println!("Finished at: {}", format_timestamp(status.timestamp));
    println!("URL: {}", status.url.as_deref().unwrap_or("N/A"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_known_instant() {
        // Only shape-check: the rendered zone is host-local.
        let rendered = format_timestamp(1720000000000);
        assert_eq!(rendered.len(), 19);
        assert!(rendered.starts_with("2024-07-0"));
    }

    #[test]
    fn test_format_timestamp_zero_is_epoch() {
        assert!(format_timestamp(0).starts_with("19"));
    }
}
