//! Boxed notice rendering.

/// Render a starred notice box: a title row, the body, and a blank
/// padding row, each framed to `width` columns. Tabs in the body are
/// expanded before framing.
pub fn boxed_notice(title: &str, body: &str, width: usize) -> String {
    let bar = "*".repeat(width);
    format!(
        "\n{bar}\n{}\n{bar}\n{}\n{}\n{bar}\n",
        box_line(title.trim(), width),
        box_line(&expand_tabs(body), width),
        box_line("", width),
    )
}

fn box_line(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(6 + text.chars().count());
    format!("*  {}{}  *", text, " ".repeat(pad))
}

/// Expand tabs to 8-column tab stops.
fn expand_tabs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut col = 0;
    for ch in text.chars() {
        if ch == '\t' {
            let spaces = 8 - col % 8;
            out.extend(std::iter::repeat_n(' ', spaces));
            col += spaces;
        } else {
            out.push(ch);
            col += 1;
        }
    }
    out
}
