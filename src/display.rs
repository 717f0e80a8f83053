//! Output Formatting and Display Management
//!
//! This module turns a [`UsageReport`] into the three shapes the outside
//! world consumes: HTML fragments spliced into the dashboard page, pretty
//! JSON, and a colored terminal summary.
//!
//! ## Dashboard Splicing
//!
//! The dashboard page is a hand-maintained HTML file. Recalculation replaces
//! the first occurrence of each anchor and leaves the rest of the page alone:
//!
//! - `<section class="stats">…</section>` - eight stat cards
//! - `<tbody>…</tbody>` - the year-to-date leaderboard
//! - `<section class="providers">…</section>` - all-time rows per provider
//!
//! A page without an anchor is returned unchanged for that anchor.

use crate::models::{ProviderRows, RangeTotals, UsageReport};
use colored::Colorize;
use regex::{NoExpand, Regex};
use std::fmt::Write;
use std::sync::OnceLock;

/// Thousands-separated integer, e.g. `1234567` -> `1,234,567`.
pub fn format_number(value: u64) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(ch);
    }
    formatted
}

fn stat_card(out: &mut String, label: &str, value: &str) {
    let _ = write!(
        out,
        "      <article class=\"stat\">\n        <div class=\"label\">{label}</div>\n        <div class=\"value\">{value}</div>\n      </article>\n"
    );
}

fn range_label(title: &str, range: &RangeTotals) -> String {
    format!(
        "{title} ({} to {}, {} sessions)",
        range.from, range.to, range.sessions
    )
}

pub fn render_stats_section(report: &UsageReport) -> String {
    let mut out = String::from("<section class=\"stats\">\n");
    stat_card(&mut out, "YTD Total Tokens", &format_number(report.ytd.total_tokens));
    stat_card(&mut out, "Days With Usage", &report.ytd.days_with_usage.to_string());
    stat_card(&mut out, "Total Sessions", &report.ytd.sessions.to_string());
    stat_card(
        &mut out,
        "Highest Single Day",
        &format_number(report.ytd.highest_single_day),
    );
    stat_card(
        &mut out,
        &format!("Today ({}, {} sessions)", report.today, report.today_range.sessions),
        &format_number(report.today_range.total_tokens),
    );
    stat_card(
        &mut out,
        &range_label("Current Week", &report.current_week),
        &format_number(report.current_week.total_tokens),
    );
    stat_card(
        &mut out,
        &range_label("Previous Week", &report.previous_week),
        &format_number(report.previous_week.total_tokens),
    );
    stat_card(
        &mut out,
        &range_label("2 Weeks Ago", &report.two_weeks_ago),
        &format_number(report.two_weeks_ago.total_tokens),
    );
    out.push_str("    </section>");
    out
}

pub fn render_leaderboard_body(report: &UsageReport) -> String {
    let rows: Vec<String> = report
        .leaderboard
        .iter()
        .map(|row| {
            let rank_class = if row.rank <= 3 { " top-3" } else { "" };
            format!(
                "            <tr><td><span class=\"rank{rank_class}\">{}</span></td><td>{}</td><td class=\"num\">{}</td><td class=\"num total-col\">{}</td></tr>",
                row.rank,
                row.date,
                row.sessions,
                format_number(row.total_tokens)
            )
        })
        .collect();
    format!("<tbody>\n{}\n          </tbody>", rows.join("\n"))
}

fn provider_table(out: &mut String, title: &str, provider: &ProviderRows) {
    let _ = writeln!(out, "      <article class=\"provider\">\n        <h2>{title}</h2>");
    if !provider.available {
        out.push_str("        <p class=\"unavailable\">No usage data found</p>\n      </article>\n");
        return;
    }
    out.push_str("        <table>\n          <thead><tr><th>Date</th><th class=\"num\">Sessions</th><th class=\"num\">Total Tokens</th></tr></thead>\n          <tbody class=\"provider-rows\">\n");
    for row in &provider.rows {
        let _ = writeln!(
            out,
            "            <tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
            row.date,
            row.sessions,
            format_number(row.total_tokens)
        );
    }
    out.push_str("          </tbody>\n        </table>\n      </article>\n");
}

pub fn render_provider_section(report: &UsageReport) -> String {
    let mut out = String::from("<section class=\"providers\">\n");
    provider_table(&mut out, "Codex", &report.codex);
    provider_table(&mut out, "Claude", &report.claude);
    provider_table(&mut out, "Combined", &report.combined);
    out.push_str("    </section>");
    out
}

fn stats_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?s)<section class="stats">.*?</section>"#).expect("valid stats pattern")
    })
}

// Provider tables carry their own tbody with a class attribute, so the
// leaderboard anchor only matches a bare <tbody>.
fn leaderboard_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)<tbody>\s*.*?\s*</tbody>").expect("valid leaderboard pattern")
    })
}

fn providers_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?s)<section class="providers">.*?</section>"#)
            .expect("valid providers pattern")
    })
}

/// Replace the dashboard anchors in `html` with freshly rendered sections.
pub fn splice_dashboard(html: &str, report: &UsageReport) -> String {
    let stats = render_stats_section(report);
    let tbody = render_leaderboard_body(report);
    let providers = render_provider_section(report);

    let html = stats_pattern().replacen(html, 1, NoExpand(&stats));
    let html = leaderboard_pattern().replacen(&html, 1, NoExpand(&tbody));
    let html = providers_pattern().replacen(&html, 1, NoExpand(&providers));
    html.into_owned()
}

fn print_range(title: &str, range: &RangeTotals) {
    println!(
        "   {} {} → {}: {} ({} sessions)",
        title.bright_cyan(),
        range.from.to_string().bright_white(),
        range.to.to_string().bright_white(),
        format_number(range.total_tokens).bright_green().bold(),
        range.sessions.to_string().bright_white()
    );
}

/// Print the report to stdout, as pretty JSON or a colored summary.
pub fn print_report(report: &UsageReport, json_output: bool) {
    if json_output {
        match serde_json::to_string_pretty(report) {
            Ok(json_str) => println!("{}", json_str),
            Err(e) => eprintln!("Error serializing usage report to JSON: {}", e),
        }
        return;
    }

    println!("\n{}", "=".repeat(80).bright_cyan());
    println!(
        "{}",
        format!("Token Usage Report - {} (Codex + Claude)", report.today)
            .bright_white()
            .bold()
    );
    println!("{}", "=".repeat(80).bright_cyan());

    println!(
        "\n{} {} tokens YTD • {} days • {} sessions • best day {}\n",
        "📊".bright_yellow(),
        format_number(report.ytd.total_tokens).bright_green().bold(),
        report.ytd.days_with_usage.to_string().bright_white().bold(),
        report.ytd.sessions.to_string().bright_white().bold(),
        format_number(report.ytd.highest_single_day).bright_green()
    );

    print_range("Today", &report.today_range);
    print_range("Current week", &report.current_week);
    print_range("Previous week", &report.previous_week);
    print_range("2 weeks ago", &report.two_weeks_ago);

    println!("\n{} Top days this year:", "📅".bright_blue());
    for row in report.leaderboard.iter().take(10) {
        println!(
            "   {:>3}. {} - {} ({} sessions)",
            row.rank,
            row.date.to_string().bright_white().bold(),
            format_number(row.total_tokens).bright_green(),
            row.sessions.to_string().bright_white()
        );
    }

    for (name, provider) in [("Codex", &report.codex), ("Claude", &report.claude)] {
        let status = if provider.available {
            format!("{} days", provider.rows.len()).bright_white()
        } else {
            "no data".yellow()
        };
        println!("\n{} {}: {}", "•".bright_cyan(), name.bright_white().bold(), status);
    }
    println!();
}
