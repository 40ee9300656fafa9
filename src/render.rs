use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::assembler::RenderableRow;
use crate::data_models::SearchResult;

const UNAVAILABLE: &str = "unavailable";

/// Prints each hit as a title line followed by its page URL.
pub fn print_search_results<F>(results: &[SearchResult], url_for: F)
where
    F: Fn(&str) -> String,
{
    for result in results {
        println!("{} {}", "Title:".bold().cyan(), result.title.bold().cyan());
        println!("URL: {}", url_for(&result.title));
        println!();
    }
}

pub fn print_no_results(keywords: &[String]) {
    println!("{} {}", "No results for".yellow(), keywords.join(" ").yellow());
}

pub fn print_table(rows: &[RenderableRow]) {
    print!("{}", render_table(rows));
}

/// Plain text table of `#`, page id, title and URL, aligned by terminal display width.
pub fn render_table(rows: &[RenderableRow]) -> String {
    let header = ["#", "Page ID", "Title", "URL"];
    let cells: Vec<[String; 4]> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| match row {
            RenderableRow::Page {
                page_id,
                title,
                url,
            } => [
                (i + 1).to_string(),
                page_id.to_string(),
                title.clone(),
                url.clone(),
            ],
            RenderableRow::Unavailable { label, .. } => [
                (i + 1).to_string(),
                "-".to_string(),
                label.clone(),
                UNAVAILABLE.to_string(),
            ],
        })
        .collect();

    let mut widths = header.map(|h| h.width());
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.width());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &header.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(rule.join("-+-").as_str());
    out.push('\n');
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| {
            let pad = w - cell.width();
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}
