use chrono::{DateTime, Utc};

use crate::constants;
use crate::plss::PlssQueue;

const BOOTSTRAP_TEMPLATE: &str = include_str!("templates/bootstrap.sh");

/// Single-quote a value for bash
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Bare word when it only holds `[A-Za-z0-9_-]`, single-quoted otherwise
pub fn shell_word(value: &str) -> String {
    let bare = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        value.to_string()
    } else {
        shell_quote(value)
    }
}

/// Render the bootstrap script with the queue's tokens and county as defaults
pub fn render_bootstrap_script(queue: &PlssQueue) -> String {
    let preset = PlssQueue::piceance_preset();
    let header_row = format!(
        "[{}]",
        constants::OWNER_COLUMNS
            .iter()
            .map(|c| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(", ")
    );

    BOOTSTRAP_TEMPLATE
        .replace("{{DEFAULT_PLSS}}", &shell_quote(&queue.to_batch_string()))
        .replace(
            "{{DEFAULT_COUNTY}}",
            &shell_quote(queue.county().unwrap_or(constants::GARFIELD)),
        )
        .replace("{{BATCH_SIZE}}", &constants::SCRAPER_BATCH_SIZE.to_string())
        .replace("{{PRESET_NAME}}", constants::PRESET_NAME)
        .replace("{{PRESET_PLSS}}", &shell_quote(&preset.to_batch_string()))
        .replace("{{PRESET_COUNTY}}", &shell_quote(constants::PRESET_COUNTY))
        .replace("{{HEADER_ROW}}", &header_row)
}

/// `./piceance_agent_bootstrap.sh --plss "<tokens>" --county <county>`; empty for an empty queue
pub fn custom_command(queue: &PlssQueue) -> String {
    if queue.is_empty() {
        return String::new();
    }
    let county = queue.county().unwrap_or(constants::GARFIELD);
    let county_arg = shell_word(county);
    format!(
        "./{} --plss \"{}\" --county {}",
        constants::BOOTSTRAP_SCRIPT,
        queue.to_batch_string(),
        county_arg
    )
}

pub fn preset_command() -> String {
    format!("./{} --preset {}", constants::BOOTSTRAP_SCRIPT, constants::PRESET_NAME)
}

/// Timestamped download name so repeated downloads don't collide
pub fn script_file_name(at: DateTime<Utc>) -> String {
    format!("piceance_agent_bootstrap_{}.sh", at.timestamp_millis())
}
