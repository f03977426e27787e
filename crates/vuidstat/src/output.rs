//! Output formatting for statistics, queries and the exported database

use owo_colors::OwoColorize;
use vuidstat_core::{
    Analysis, CheckResult, ClassifiedIds, ConsistencyReport, DatabaseRow, Ratio, VuidStatus,
};

/// Exported database format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseFormat {
    Text,
    Csv,
    Html,
}

impl DatabaseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Csv => "csv",
            Self::Html => "html",
        }
    }
}

/// Render the exported database in the specified format
pub fn render_database(rows: &[DatabaseRow<'_>], format: DatabaseFormat) -> String {
    match format {
        DatabaseFormat::Text => render_txt(rows),
        DatabaseFormat::Csv => render_csv(rows),
        DatabaseFormat::Html => render_html(rows),
    }
}

fn colored_ratio(ratio: &Ratio) -> String {
    let text = ratio.to_string();
    match ratio.percent() {
        Some(percent) if percent >= 80.0 => text.green().to_string(),
        Some(percent) if percent >= 50.0 => text.yellow().to_string(),
        Some(_) => text.red().to_string(),
        None => text.dimmed().to_string(),
    }
}

/// Per-universe counts. The total includes unassigned identifiers.
fn universe_line(label: &str, ids: &ClassifiedIds) -> String {
    format!(
        "  VUIDs {:<24} {:04} explicit, {:04} implicit, {:04} total.\n",
        label,
        ids.explicit.len(),
        ids.implicit.len(),
        ids.len()
    )
}

/// Render the statistics summary
pub fn render_summary(analysis: &Analysis, verbose: bool) -> String {
    let mut output = String::new();
    let registry = analysis.registry();
    let implementation = analysis.implementation();
    let tests = analysis.tests();

    if verbose {
        output.push_str(&format!(
            "Found {} unique identifiers in the registry.\n",
            registry.len()
        ));
        output.push_str(&format!(
            "Found {} unique identifiers in layer source code.\n",
            implementation.len()
        ));
        output.push_str(&format!(
            "  {} unassigned\n",
            implementation.ids().unassigned.len()
        ));
        output.push_str(&format!(
            "  {} checks are implemented more than once\n",
            implementation.duplicate_count()
        ));
        output.push_str(&format!(
            "Found {} unique identifiers in layer tests.\n",
            tests.len()
        ));
        output.push_str(&format!("  {} unassigned\n", tests.ids().unassigned.len()));
    }

    output.push('\n');
    output.push_str(&format!(
        "{} (using validusage.json from API headers {})\n",
        "Validation Statistics".bold(),
        registry.api_version().cyan()
    ));
    output.push_str(&universe_line("defined in registry:", registry.ids()));
    output.push_str(&universe_line("checked in layer code:", implementation.ids()));
    output.push_str(&universe_line("tested in layer tests:", tests.ids()));

    let coverage = analysis.coverage();
    let checked = [
        ("Explicit VUIDs checked:", &coverage.checked_explicit),
        ("Implicit VUIDs checked:", &coverage.checked_implicit),
        ("Overall VUIDs checked: ", &coverage.checked_overall),
    ];
    output.push_str(&format!("\n{}\n", "VUID check coverage".bold()));
    for (label, ratio) in checked {
        output.push_str(&format!(
            "  {} {} ({} checked vs {} defined)\n",
            label,
            colored_ratio(ratio),
            ratio.numerator,
            ratio.denominator
        ));
    }

    let tested = [
        ("Explicit VUIDs tested:", &coverage.tested_explicit),
        ("Implicit VUIDs tested:", &coverage.tested_implicit),
        ("Overall VUIDs tested: ", &coverage.tested_overall),
    ];
    output.push_str(&format!("\n{}\n", "VUID test coverage".bold()));
    for (label, ratio) in tested {
        output.push_str(&format!(
            "  {} {} ({} tested vs {} checks)\n",
            label,
            colored_ratio(ratio),
            ratio.numerator,
            ratio.denominator
        ));
    }

    output
}

/// Render the point query for one identifier
pub fn render_status(id: &str, status: Option<VuidStatus<'_>>) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{} <{}>\n", "Checking status of".bold(), id.cyan()));

    let Some(status) = status else {
        output.push_str(&format!(
            "  {}\n",
            "Not found in registry, layer code or tests.".red()
        ));
        return output;
    };

    match status.entry {
        Some(entry) => output.push_str(&format!(
            "  Defined ({}, {} in {}).\n",
            entry.class,
            entry.api,
            entry.extension
        )),
        None => output.push_str(&format!("  {}\n", "Not defined in registry.".yellow())),
    }

    if status.implemented() {
        output.push_str(&format!("  {}\n", "Implemented!".green()));
        for site in &status.sites {
            output.push_str(&format!("    => {site}\n"));
        }
    } else {
        output.push_str(&format!("  {}\n", "Not implemented.".red()));
    }

    match &status.tests {
        Some(tests) if !tests.is_empty() => {
            output.push_str(&format!("  {}\n", "Has a test!".green()));
            for test in tests {
                output.push_str(&format!("    => {test}\n"));
            }
        }
        Some(_) => output.push_str(&format!(
            "  {}\n",
            "Referenced in test sources outside any test.".yellow()
        )),
        None => output.push_str(&format!("  {}\n", "Not tested.".red())),
    }

    output
}

/// Render the unimplemented explicit identifier list
pub fn render_unimplemented(ids: &[String]) -> String {
    let mut output = format!("\n{} explicit VUIDs remain unimplemented:\n", ids.len());
    for id in ids {
        output.push_str(&format!("  => {id}\n"));
    }
    output
}

fn render_check(check: &CheckResult) -> String {
    let mut output = format!(
        "\n{} Following VUIDs {} ({}):\n",
        "!".red().bold(),
        check.kind,
        check.offenders.len()
    );
    for id in &check.offenders {
        output.push_str(&format!("    {}\n", id.yellow()));
    }
    output
}

/// Render the consistency check results
pub fn render_consistency(report: &ConsistencyReport) -> String {
    let mut output = format!("\n{}\n", "Running consistency tests...".bold());
    for check in report.checks().filter(|check| !check.passed()) {
        output.push_str(&render_check(check));
    }
    if report.is_consistent() {
        output.push_str(&format!("  {} No inconsistencies found.\n", "OK!".green().bold()));
    }
    output
}

fn tests_cell(row: &DatabaseRow<'_>) -> String {
    match &row.tests {
        Some(tests) if !tests.is_empty() => {
            tests.iter().copied().collect::<Vec<_>>().join(", ")
        }
        _ => "None".to_string(),
    }
}

fn checked_cell(row: &DatabaseRow<'_>) -> &'static str {
    if row.checked { "Y" } else { "N" }
}

fn render_txt(rows: &[DatabaseRow<'_>]) -> String {
    let mut output = String::new();
    output.push_str("## VUID Database\n");
    output.push_str(
        "## Format: vuid_name ~^~ checked ~^~ test ~^~ type ~^~ api/struct ~^~ extension ~^~ vuid_text\n##\n",
    );
    for row in rows {
        output.push_str(&format!(
            "{}~^~{}~^~{}~^~{}~^~{}~^~{}~^~{}\n",
            row.id,
            checked_cell(row),
            tests_cell(row),
            row.entry.class,
            row.entry.api,
            row.entry.extension,
            row.entry.text
        ));
    }
    output
}

/// Quote a CSV field if it contains a delimiter, quote or line break
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn render_csv(rows: &[DatabaseRow<'_>]) -> String {
    let mut output = String::from("VUID_NAME,CHECKED,TEST,TYPE,API/STRUCT,EXTENSION,VUID_TEXT\n");
    for row in rows {
        let fields = [
            row.id.to_string(),
            checked_cell(row).to_string(),
            tests_cell(row),
            row.entry.class.to_string(),
            row.entry.api.clone(),
            row.entry.extension.clone(),
            row.entry.text.clone(),
        ];
        let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        output.push_str(&line.join(","));
        output.push('\n');
    }
    output
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_html(rows: &[DatabaseRow<'_>]) -> String {
    let mut html = String::new();

    html.push_str(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Valid Usage Database</title>
<style>
table, th, td { border: 1px solid black; border-collapse: collapse; }
body { font-family: Arial, sans-serif; font-size: small; }
</style>
</head>
<body>
<h2>Valid Usage Database</h2>
<table style="width:100%">
<tr><th>VUID NAME</th><th>CHECKED</th><th>TEST</th><th>TYPE</th><th>API/STRUCT</th><th>EXTENSION</th><th>VUID TEXT</th></tr>
"#,
    );

    for row in rows {
        let checked = if row.checked {
            r#"<span style="color:limegreen;">Y</span>"#
        } else {
            r#"<span style="color:red;">N</span>"#
        };
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            html_escape(row.id),
            checked,
            html_escape(&tests_cell(row)),
            row.entry.class,
            html_escape(&row.entry.api),
            html_escape(&row.entry.extension),
            html_escape(&row.entry.text)
        ));
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}
