use cluesheet_core::{Cell, PlayerId};
use cluesheet_engine::Sheet;

const COLUMN_WIDTH: usize = 7;

/// Formats the sheet as a plain-text table.
///
/// One row per card grouped by category, one column per active player.
/// Murder items are flagged with `*`, owned cards list the opponents they
/// were shown to.
pub fn render(sheet: &Sheet) -> String {
    let theme = sheet.config().theme;
    let name_width = theme
        .cards()
        .iter()
        .map(|card| card.name.chars().count())
        .max()
        .unwrap_or(0);
    let players: Vec<PlayerId> = sheet.players().collect();

    let mut out = format!("  {:name_width$} ", "");
    for player in &players {
        out.push_str(&pad(&format!("P{player}")));
    }
    out.push('\n');

    for category in theme.categories() {
        out.push_str(&format!("{category}\n"));
        for card in theme.cards_in(category) {
            let flag = if sheet.is_murder_item(card.id) {
                '*'
            } else {
                ' '
            };
            out.push_str(&format!("{flag} {:name_width$} ", card.name));
            for player in &players {
                let mark = sheet.mark(Cell::new(card.id, *player));
                out.push_str(&pad(&mark.to_string()));
            }
            let shown: Vec<String> = sheet.shown_to(card.id).map(|p| p.to_string()).collect();
            if !shown.is_empty() {
                out.push_str(" shown to ");
                out.push_str(&shown.join(", "));
            }
            out.push('\n');
        }
    }
    trim_line_ends(&out)
}

fn pad(cell: &str) -> String {
    format!("{cell:<COLUMN_WIDTH$}")
}

fn trim_line_ends(text: &str) -> String {
    text.lines().fold(String::new(), |mut out, line| {
        out.push_str(line.trim_end());
        out.push('\n');
        out
    })
}
