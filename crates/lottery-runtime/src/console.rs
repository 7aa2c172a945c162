//! One-line renderings for the terminal.

use mk_04_display_gatekeeper::DisplayAction;
use mk_05_control_surface::DrawReport;

/// What the operator sees after a draw request.
#[must_use]
pub fn describe_report(player: u8, report: &DrawReport) -> String {
    match report {
        DrawReport::Capped => format!("{player}P has no draws left"),
        DrawReport::Spun(spin) => {
            let result = spin.result_value.as_deref().unwrap_or("MISS");
            let cycle = if spin.reset_occurred { " (new cycle)" } else { "" };
            format!("{} -> {result}{cycle}", spin.player_id)
        }
    }
}

/// What a display would render.
#[must_use]
pub fn describe_action(action: &DisplayAction) -> String {
    match action {
        DisplayAction::Render(spin) => {
            let result = spin.result.as_deref().unwrap_or("X");
            let note = if spin.downgraded { " (duplicate)" } else { "" };
            format!(
                "[display] {} #{} {result}{note} color={}",
                spin.player,
                spin.slot + 1,
                spin.color_index
            )
        }
        DisplayAction::Cleared => "[display] cleared".to_string(),
        DisplayAction::Relayout(layout) => format!(
            "[display] layout x={} y={} scale={}",
            layout.x, layout.y, layout.scale
        ),
        DisplayAction::Reload => "[display] reload".to_string(),
        DisplayAction::Ignored => String::new(),
    }
}
