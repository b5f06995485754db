use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

static ORDINAL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.(\s|$)").unwrap());

const BOLD_MARKER: &str = "**";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Html,
}

/// One display unit of a model answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBlock {
    /// Consecutive pipe-delimited lines. The first row is the header.
    Table(Vec<Vec<String>>),
    ListItem(String),
    Bold(String),
    Paragraph(String),
}

/// Classifies each line of a raw answer. Rules are tried in order and the
/// first match wins: table row, ordinal list item, bold, plain paragraph.
pub fn parse_blocks(raw: &str) -> Vec<ResponseBlock> {
    let mut blocks = Vec::new();
    let mut table_rows: Vec<Vec<String>> = Vec::new();
    let mut in_table = false;

    for line in raw.split('\n') {
        if line.contains('|') {
            in_table = true;
            if let Some(row) = parse_table_row(line) {
                table_rows.push(row);
            }
            continue;
        }

        if in_table {
            flush_table(&mut table_rows, &mut blocks);
            in_table = false;
        }

        blocks.push(classify_line(line));
    }

    if in_table {
        flush_table(&mut table_rows, &mut blocks);
    }

    blocks
}

pub fn format_response(raw: &str, format: OutputFormat) -> String {
    let blocks = parse_blocks(raw);
    match format {
        OutputFormat::Markdown => render_markdown(&blocks),
        OutputFormat::Html => render_html(&blocks),
    }
}

pub fn render_markdown(blocks: &[ResponseBlock]) -> String {
    let mut lines = Vec::with_capacity(blocks.len());

    for block in blocks {
        match block {
            ResponseBlock::Table(rows) => {
                let columns = column_count(rows);
                for (index, row) in rows.iter().enumerate() {
                    lines.push(markdown_row(row, columns));
                    if index == 0 {
                        lines.push(markdown_row(&vec!["---".to_string(); columns], columns));
                    }
                }
            }
            ResponseBlock::ListItem(text) => lines.push(format!("*{text}*")),
            ResponseBlock::Bold(text) => lines.push(format!("**{text}**")),
            ResponseBlock::Paragraph(text) => lines.push(text.clone()),
        }
    }

    lines.join("\n")
}

pub fn render_html(blocks: &[ResponseBlock]) -> String {
    let mut parts = Vec::with_capacity(blocks.len());

    for block in blocks {
        match block {
            ResponseBlock::Table(rows) => parts.push(html_table(rows)),
            ResponseBlock::ListItem(text) => {
                parts.push(format!("<p><em>{}</em></p>", escape_html(text)))
            }
            ResponseBlock::Bold(text) => {
                parts.push(format!("<p><strong>{}</strong></p>", escape_html(text)))
            }
            ResponseBlock::Paragraph(text) if text.is_empty() => {}
            ResponseBlock::Paragraph(text) => parts.push(format!("<p>{}</p>", escape_html(text))),
        }
    }

    parts.join("\n")
}

fn classify_line(line: &str) -> ResponseBlock {
    let trimmed = line.trim();

    if ORDINAL_PREFIX.is_match(trimmed) {
        // The item is already emphasized as a whole; nested bold would break it.
        let item = trimmed.replace(BOLD_MARKER, "");
        return ResponseBlock::ListItem(item.trim_end().to_string());
    }

    if trimmed.matches(BOLD_MARKER).count() >= 2 {
        let stripped = trimmed.replace(BOLD_MARKER, "");
        let stripped = stripped.trim();
        if !stripped.is_empty() {
            return ResponseBlock::Bold(stripped.to_string());
        }
    }

    ResponseBlock::Paragraph(trimmed.to_string())
}

/// Returns `None` for markdown alignment rows such as `|---|:--:|`.
fn parse_table_row(line: &str) -> Option<Vec<String>> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);

    let cells: Vec<String> = inner.split('|').map(|c| c.trim().to_string()).collect();

    let is_separator = cells.iter().all(|c| {
        !c.is_empty() && c.contains('-') && c.chars().all(|ch| matches!(ch, '-' | ':' | ' '))
    });

    if is_separator { None } else { Some(cells) }
}

fn flush_table(rows: &mut Vec<Vec<String>>, blocks: &mut Vec<ResponseBlock>) {
    if !rows.is_empty() {
        blocks.push(ResponseBlock::Table(std::mem::take(rows)));
    }
}

fn column_count(rows: &[Vec<String>]) -> usize {
    rows.iter().map(Vec::len).max().unwrap_or(0)
}

fn markdown_row(row: &[String], columns: usize) -> String {
    let mut cells: Vec<&str> = row.iter().map(String::as_str).collect();
    cells.resize(columns, "");
    format!("| {} |", cells.join(" | "))
}

fn html_table(rows: &[Vec<String>]) -> String {
    let mut html = String::from("<table>");

    if let Some((header, body)) = rows.split_first() {
        html.push_str("<thead><tr>");
        for cell in header {
            html.push_str(&format!("<th>{}</th>", escape_html(cell)));
        }
        html.push_str("</tr></thead><tbody>");
        for row in body {
            html.push_str("<tr>");
            for cell in row {
                html.push_str(&format!("<td>{}</td>", escape_html(cell)));
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody>");
    }

    html.push_str("</table>");
    html
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

