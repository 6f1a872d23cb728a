use colored::*;
use std::fmt::Write;

use crate::{
    models::{Category, PlanSummary},
    organizer::ApplyReport,
};

fn format_confidence(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}

/// Plan overview: header, totals, category table and sample files.
pub fn render_plan_summary(plan: &PlanSummary) -> String {
    let mut out = String::new();
    let fallback = Category::FALLBACK.label();

    let _ = writeln!(
        out,
        "{}",
        format!("Proposed organization plan for: {}", plan.root_path.display()).bold()
    );
    let _ = writeln!(
        out,
        "Total files: {} | Total size: {:.2} MB | '{}' files: {}",
        plan.total_files, plan.total_size_mb, fallback, plan.num_uncertain
    );
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "{}",
        format!("{:<22} {:>7} {:>11} {:>15}", "Category", "Files", "Size (MB)", "Avg confidence").cyan()
    );
    let _ = writeln!(out, "{}", "-".repeat(58));
    for cat in &plan.categories {
        let _ = writeln!(
            out,
            "{:<22} {:>7} {:>11.2} {:>15}",
            cat.category.label(),
            cat.file_count,
            cat.total_size_mb,
            format_confidence(cat.avg_confidence)
        );
    }

    for cat in plan.categories.iter().filter(|c| !c.sample_files.is_empty()) {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", cat.category.label().bold());
        let _ = writeln!(out, "Sample files:");
        for name in &cat.sample_files {
            let _ = writeln!(out, " - {}", name);
        }
    }

    if plan.num_uncertain > 0 {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            format!(
                "Note: Files in the '{}' category have low classification confidence.",
                fallback
            )
            .yellow()
        );
    }

    out
}

/// End-of-run summary: counts, per-file failures and the log location.
pub fn render_apply_report(report: &ApplyReport) -> String {
    let mut out = String::new();

    for failure in report.failed() {
        let _ = writeln!(
            out,
            "{} failed to move '{}': {}",
            "Warning:".yellow().bold(),
            failure.source.display(),
            failure.status
        );
    }

    let uncertain: Vec<&str> = report
        .moves
        .iter()
        .filter(|m| m.category.is_fallback() && m.status.is_success())
        .map(|m| m.file_name.as_str())
        .collect();

    let failed = report.failed().count();
    let _ = writeln!(
        out,
        "Moved {} files into {} categories.",
        report.moved(),
        report.categories_used()
    );
    if report.skipped() > 0 {
        let _ = writeln!(out, "Skipped {} files already in place.", report.skipped());
    }
    if failed > 0 {
        let _ = writeln!(
            out,
            "{}",
            format!("Failed to move {} files (see warnings above).", failed).red()
        );
    }
    if !uncertain.is_empty() {
        let _ = writeln!(
            out,
            "{} files moved to '{}' due to low classification confidence:",
            uncertain.len(),
            Category::FALLBACK
        );
        for name in uncertain.iter().take(3) {
            let _ = writeln!(out, " - {}", name);
        }
    }

    if report.moves.is_empty() {
        let _ = writeln!(
            out,
            "Move log written to '{}' (no moves recorded).",
            report.log_path.display()
        );
    } else {
        let _ = writeln!(out, "Move log written to '{}'.", report.log_path.display());
    }

    out
}

pub fn print_error(message: &str) {
    eprintln!("{}: {}", "Error".red().bold(), message);
}

pub fn print_no_files_moved() {
    println!("No files were moved.");
}
