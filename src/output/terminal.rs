// Colored terminal output for version summaries, term rankings, and topics.

use colored::Colorize;

use super::truncate_chars;
use crate::issues::repository::IssueRepository;

/// One row per version with its issue count.
pub fn display_versions(repo: &IssueRepository) {
    if repo.is_empty() {
        println!("No issues with a recognized version were loaded.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Issues by version ({} records) ===", repo.len()).bold()
    );
    println!();
    println!("  {:<12} {:>8}", "Version".dimmed(), "Issues".dimmed());
    println!("  {}", "-".repeat(21).dimmed());

    for version in repo.sorted_versions() {
        println!(
            "  {:<12} {:>8}",
            version.bold(),
            repo.get_by_version(&version).len()
        );
    }
    println!();
}

/// Ranked terms for one version as a bar chart scaled to the top score.
pub fn display_ranked_terms(version: &str, metric: &str, ranked: &[(String, f64)]) {
    println!(
        "\n{}",
        format!("=== {version}: top {} terms by {metric} ===", ranked.len()).bold()
    );

    if ranked.is_empty() {
        println!("  {}", "(no terms survived filtering)".dimmed());
        return;
    }

    let bar_width: usize = 20;
    let top = ranked[0].1;

    for (i, (term, score)) in ranked.iter().enumerate() {
        let filled = if top > 0.0 {
            ((score / top) * bar_width as f64).round() as usize
        } else {
            0
        };
        let bar = format!(
            "[{}{}]",
            "=".repeat(filled),
            " ".repeat(bar_width.saturating_sub(filled))
        );
        println!(
            "  {:>2}. {:<30} {} {:.4}",
            i + 1,
            term.bold(),
            bar.bright_green(),
            score
        );
    }
}

/// Topic descriptions with document counts and an example summary each.
pub fn display_topics(version: &str, topics: &[(String, usize, Option<String>)], unassigned: usize) {
    println!(
        "\n{}",
        format!("=== {version}: {} topics ===", topics.len()).bold()
    );
    println!();

    for (i, (description, count, example)) in topics.iter().enumerate() {
        println!("  {:>2}. {} issues", i, count.to_string().bold());
        println!("      {}", description.bright_blue());
        if let Some(example) = example {
            println!("      e.g. {}", truncate_chars(example, 80).dimmed());
        }
        println!();
    }

    if unassigned > 0 {
        println!("  {} issues had no topic", unassigned.to_string().yellow());
    }
}

/// Coherence per candidate topic count, best marked.
pub fn display_coherence(version: &str, components: &[usize], scores: &[f64]) {
    println!(
        "\n{}",
        format!("=== {version}: u_mass coherence ===").bold()
    );

    let best = scores
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i);

    for (i, (n_topics, score)) in components.iter().zip(scores).enumerate() {
        let line = format!("  {:>3} topics  {:>9.4}", n_topics, score);
        if Some(i) == best {
            println!("{}  {}", line.bright_green(), "best".bold());
        } else {
            println!("{line}");
        }
    }
}
