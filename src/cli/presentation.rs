//! CLI presentation: text and JSON formatters for windows, routes and scenes.

use crate::error::ApiError;
use crate::navigation::SceneRoute;
use crate::queue::QueueState;
use crate::scene::SceneRecord;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use owo_colors::OwoColorize;

fn section_title(title: &str) -> String {
    format!("{}", title.bold().underline())
}

pub fn format_window_text(state: &QueueState) -> String {
    if state.is_empty() {
        return format!("{}\n  Queue is empty.", section_title("Queue window"));
    }

    let mut out = section_title("Queue window");
    out.push_str(&format!(
        "\n  Items {}-{} of {}{}\n",
        state.window_start,
        state.window_end(),
        state.total_count,
        if state.has_more() {
            " (more available)"
        } else {
            ""
        }
    ));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Id", "Title", "Path"]);
    for (offset, item) in state.items.iter().enumerate() {
        table.add_row(vec![
            (state.window_start + offset as u64).to_string(),
            item.id.to_string(),
            item.display_name().to_string(),
            item.path.clone(),
        ]);
    }
    out.push_str(&table.to_string());
    out
}

pub fn format_window_json(state: &QueueState) -> Result<String, ApiError> {
    let out = serde_json::json!({
        "total_count": state.total_count,
        "window_start": state.window_start,
        "window_end": state.window_end(),
        "has_more": state.has_more(),
        "items": state.items,
    });
    Ok(serde_json::to_string_pretty(&out)?)
}

/// One line per route visited, or the reason nothing happened.
pub fn format_navigation(routes: &[SceneRoute], empty_reason: &str) -> String {
    if routes.is_empty() {
        return format!("No navigation: {}", empty_reason);
    }
    routes
        .iter()
        .map(|route| format!("-> {}", route))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_scene(scene: &SceneRecord) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Id".to_string(), scene.id.to_string()]);
    table.add_row(vec![
        "Title".to_string(),
        scene.title.clone().unwrap_or_else(|| "-".to_string()),
    ]);
    table.add_row(vec!["Path".to_string(), scene.path.clone()]);
    table.add_row(vec!["O-counter".to_string(), scene.o_counter.to_string()]);
    table.add_row(vec!["Organized".to_string(), scene.organized.to_string()]);
    if let Some(duration) = scene.duration {
        table.add_row(vec!["Duration".to_string(), format!("{:.1}s", duration)]);
    }
    format!("{}\n{}", section_title("Scene"), table)
}
