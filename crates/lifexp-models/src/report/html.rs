//! Single-page HTML dashboard rendered with maud.
use std::path::Path;

use anyhow::{Context, Result};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::Plot;

use crate::data_handling::DataTable;
use crate::stats::HeadlineMetric;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

const STYLE: &str = "body{font-family:sans-serif;margin:0 auto;max-width:1100px;padding:1em}\
nav a{margin-right:1em}\
section{border-top:1px solid #ddd;padding:1em 0}\
.metrics{display:flex;gap:2em}\
.metric .value{font-size:1.8em}\
.metric .delta{color:#2a7a2a}\
table{border-collapse:collapse;font-size:0.85em}\
td,th{border:1px solid #ccc;padding:2px 6px}";

/// One titled block of the dashboard.
pub struct ReportSection {
    pub id: String,
    pub title: String,
    content: Vec<Markup>,
    plots: usize,
}

impl ReportSection {
    pub fn new(id: &str, title: &str) -> Self {
        ReportSection {
            id: id.to_string(),
            title: title.to_string(),
            content: Vec::new(),
            plots: 0,
        }
    }

    pub fn add_content(&mut self, markup: Markup) {
        self.content.push(markup);
    }

    pub fn add_plot(&mut self, plot: &Plot) {
        let div_id = format!("{}-plot-{}", self.id, self.plots);
        self.plots += 1;
        self.content
            .push(PreEscaped(plot.to_inline_html(Some(div_id.as_str()))));
    }
}

pub struct DashboardReport {
    pub title: String,
    pub generated_at: String,
    sections: Vec<ReportSection>,
}

impl DashboardReport {
    pub fn new(title: &str) -> Self {
        DashboardReport {
            title: title.to_string(),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    pub fn render(&self) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src=(PLOTLY_CDN) {}
                    style { (PreEscaped(STYLE)) }
                }
                body {
                    h1 { (self.title) }
                    nav {
                        @for entry in &self.sections {
                            a href={ "#" (entry.id) } { (entry.title) }
                        }
                    }
                    @for entry in &self.sections {
                        section id=(entry.id) {
                            h2 { (entry.title) }
                            @for block in &entry.content {
                                (block)
                            }
                        }
                    }
                    footer {
                        p { "Generated " (self.generated_at) }
                    }
                }
            }
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(&path, self.render().into_string())
            .with_context(|| format!("Failed to write report: {}", path.as_ref().display()))?;
        log::info!("Wrote dashboard report to {}", path.as_ref().display());
        Ok(())
    }
}

pub fn metrics_markup(metrics: &[HeadlineMetric]) -> Markup {
    html! {
        div class="metrics" {
            @for metric in metrics {
                div class="metric" {
                    div class="label" { (metric.label) }
                    div class="value" { (metric.display_value()) }
                    div class="delta" { (metric.display_delta()) }
                }
            }
        }
    }
}

/// Render `table` as an HTML table (callers should `head` large tables first).
pub fn table_markup(table: &DataTable) -> Markup {
    html! {
        table {
            thead {
                tr {
                    @for name in table.column_names() {
                        th { (name) }
                    }
                }
            }
            tbody {
                @for row in 0..table.nrows() {
                    tr {
                        @for column in table.columns() {
                            td { (column.values.cell(row).unwrap_or_default()) }
                        }
                    }
                }
            }
        }
    }
}
