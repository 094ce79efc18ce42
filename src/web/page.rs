//! Server-rendered dashboard page.
//!
//! The page is a plain HTML form: changing a dropdown submits it, and the
//! server answers with the re-rendered page (one controller run per change).
//! Charts are inlined as SVG.

use crate::chart::ChartSpec;
use crate::dashboard::{Controls, DashboardLayout, Dropdown, View};
use crate::error::AppError;
use crate::plot::{palette, render_svg};
use crate::report::ReportOutput;

const CHART_WIDTH: u32 = 560;
const CHART_HEIGHT: u32 = 380;

const STYLE: &str = "body{font-family:sans-serif;width:80%;margin:0 auto}\
h1{text-align:center;font-size:30px}\
select{width:100%;padding:6px;margin:4px 0;text-align:center}\
.chart-item{display:flex;gap:12px;margin-top:12px}\
.chart-item>div{flex:1}\
.legend{list-style:none;padding:0;font-size:13px}\
.legend span{display:inline-block;width:10px;height:10px;margin-right:6px}";

/// Render the full page for the current controls and view.
pub fn render_page(layout: &DashboardLayout, controls: &Controls, view: &View) -> Result<String, AppError> {
    let mut html = String::new();
    html.push_str(&format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title><style>{STYLE}</style></head><body>",
        escape_html(&layout.title)
    ));
    html.push_str(&format!("<h1>{}</h1>", escape_html(&layout.heading)));
    html.push_str(&format!("<p>{}</p>", escape_html(&layout.prompt)));

    html.push_str("<form method=\"get\" action=\"/\">");

    let year = controls.year.to_string();
    html.push_str(&render_dropdown(
        &layout.statistics,
        controls.statistics.as_deref(),
        false,
    ));
    html.push_str(&render_dropdown(&layout.year, Some(year.as_str()), view.year_disabled));
    html.push_str("</form>");

    html.push_str(&format!(
        "<div><div id=\"{}\" class=\"chart-grid\" style=\"width:100%\">",
        layout.output_id.as_str()
    ));
    html.push_str(&render_output(&view.output)?);
    html.push_str("</div></div></body></html>");

    Ok(html)
}

fn render_dropdown(dropdown: &Dropdown, selected: Option<&str>, disabled: bool) -> String {
    let mut html = String::new();
    let id = dropdown.id.as_str();
    let disabled = if disabled { " disabled" } else { "" };
    html.push_str(&format!(
        "<div><select id=\"{id}\" name=\"{id}\" onchange=\"this.form.submit()\"{disabled}>"
    ));

    let placeholder_selected = if selected.is_none() { " selected" } else { "" };
    html.push_str(&format!(
        "<option value=\"\"{placeholder_selected}>{}</option>",
        escape_html(&dropdown.placeholder)
    ));

    for option in &dropdown.options {
        let is_selected = selected == Some(option.value.as_str());
        html.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>",
            escape_html(&option.value),
            if is_selected { " selected" } else { "" },
            escape_html(&option.label)
        ));
    }
    html.push_str("</select></div>");
    html
}

/// Inner HTML of the output container.
pub fn render_output(output: &ReportOutput) -> Result<String, AppError> {
    let mut html = String::new();
    match output {
        ReportOutput::Empty => {}
        ReportOutput::Alert(alert) => {
            html.push_str(&format!(
                "<p style=\"color:{};font-size:{}\">{}</p>",
                escape_html(&alert.color),
                escape_html(&alert.font_size),
                escape_html(&alert.message)
            ));
        }
        ReportOutput::Charts(rows) => {
            for row in rows {
                html.push_str(&format!("<div class=\"{}\">", escape_html(&row.class_name)));
                for chart in &row.charts {
                    html.push_str("<div>");
                    html.push_str(&render_svg(chart, CHART_WIDTH, CHART_HEIGHT)?);
                    html.push_str(&render_legend(chart));
                    html.push_str("</div>");
                }
                html.push_str("</div>");
            }
        }
    }
    Ok(html)
}

fn render_legend(chart: &ChartSpec) -> String {
    let entries = chart.legend();
    if entries.is_empty() {
        return String::new();
    }

    let mut html = String::from("<ul class=\"legend\">");
    for entry in entries {
        let c = palette(entry.color_index);
        html.push_str(&format!(
            "<li><span style=\"background:rgb({},{},{})\"></span>{}",
            c.0,
            c.1,
            c.2,
            escape_html(&entry.label)
        ));
        if let Some(share) = entry.share {
            html.push_str(&format!(" ({:.1}%)", share * 100.0));
        }
        html.push_str("</li>");
    }
    html.push_str("</ul>");
    html
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Dashboard;
    use crate::data::table::{record, table};

    fn sample() -> crate::data::SalesTable {
        table(vec![
            record(1980, "Jan", 1, "Sedan", 100.0, 10.0, 5.0),
            record(1980, "Feb", 1, "Truck", 200.0, 30.0, 6.0),
            record(1981, "Jan", 0, "Truck", 200.0, 30.0, 6.0),
        ])
    }

    #[test]
    fn initial_page_has_controls_and_disabled_year() {
        let t = sample();
        let layout = DashboardLayout::from_table(&t);
        let dashboard = Dashboard::new(&t).unwrap();

        let html = render_page(&layout, dashboard.controls(), dashboard.view()).unwrap();

        assert!(html.contains("<title>Automobile Statistics Dashboard</title>"));
        assert!(html.contains("id=\"dropdown-statistics\""));
        assert!(html.contains("<select id=\"select-year\" name=\"select-year\" onchange=\"this.form.submit()\" disabled>"));
        assert!(html.contains("id=\"output-container\""));
        assert!(html.contains("<option value=\"1980\" selected>1980</option>"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn recession_page_inlines_four_svgs() {
        let t = sample();
        let layout = DashboardLayout::from_table(&t);
        let dashboard = Dashboard::with_controls(
            &t,
            Controls {
                statistics: Some("Recession Statistics".to_string()),
                year: 1980,
            },
        )
        .unwrap();

        let html = render_page(&layout, dashboard.controls(), dashboard.view()).unwrap();

        assert_eq!(html.matches("<svg").count(), 4);
        assert_eq!(html.matches("class=\"chart-item\"").count(), 2);
        assert!(html.contains("<option value=\"Recession Statistics\" selected>"));
        assert!(!html.contains(" disabled>"));
    }

    #[test]
    fn alert_is_styled_red() {
        let t = sample();
        let dashboard = Dashboard::with_controls(
            &t,
            Controls {
                statistics: Some("Recession Statistics".to_string()),
                year: 1981,
            },
        )
        .unwrap();

        let html = render_output(&dashboard.view().output).unwrap();
        assert!(html.starts_with("<p style=\"color:red;font-size:18px\">Attention!"));
    }

    #[test]
    fn legends_list_shares_and_colors() {
        let t = sample();
        let dashboard = Dashboard::with_controls(
            &t,
            Controls {
                statistics: Some("Recession Statistics".to_string()),
                year: 1980,
            },
        )
        .unwrap();

        let html = render_output(&dashboard.view().output).unwrap();

        // Pie (spend shares 10/40 and 30/40) and grouped bar both carry legends.
        assert_eq!(html.matches("<ul class=\"legend\">").count(), 2);
        assert!(html.contains("</span>Sedan (25.0%)</li>"));
        assert!(html.contains("</span>Truck (75.0%)</li>"));
        assert!(html.contains("background:rgb(99,110,250)"));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
