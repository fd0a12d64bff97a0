//! Vertical card display for check results.
//!
//! Renders a verdict as a grouped, human-readable card: badge and
//! explanation, score bars, keyword chips, and one card per reference.
//! Sections with nothing to show are skipped.

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use newscheck_core::presentation::ANSI_RESET;
use newscheck_core::{CheckResponse, HealthStatus, Presentation, TrustedSources, present};

const MAX_KEYWORDS: usize = 20;
const MAX_TITLE_CHARS: usize = 60;
const BAR_WIDTH: usize = 20;

// ── Check result ──

/// A successful check rendered as a terminal card.
pub struct ResultCard<'a> {
    resp: &'a CheckResponse,
    color: bool,
}

impl<'a> ResultCard<'a> {
    pub fn new(resp: &'a CheckResponse, color: bool) -> Self {
        Self { resp, color }
    }

    fn presentation(&self) -> Presentation {
        present(self.resp.verdict.as_ref().map(|v| v.code))
    }
}

impl fmt::Display for ResultCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.presentation();
        let (on, off) = if self.color {
            (p.theme.ansi(), ANSI_RESET)
        } else {
            ("", "")
        };

        writeln!(f, "{on}=== {} {} ==={off}", p.icon, p.badge)?;
        if let Some(v) = &self.resp.verdict {
            if !v.label.is_empty() {
                writeln!(f, "{}", v.label)?;
            }
            if !v.explanation.is_empty() {
                writeln!(f, "{}", v.explanation)?;
            }
            writeln!(f)?;

            // Prefer the service's own colour hint over the local theme.
            let colour = v
                .color
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(p.theme.color_name());
            writeln!(f, "Scores")?;
            writeln!(f, "  {:<12} {} ({colour})", "verdict", v.code.as_str())?;
            writeln!(f, "  {:<12} {}", "similarity", bar(v.similarity()))?;
            writeln!(f, "  {:<12} {}", "confidence", bar(v.confidence()))?;
            writeln!(f)?;
        } else {
            writeln!(f)?;
        }

        let keywords = &self.resp.keywords;
        if !keywords.is_empty() {
            writeln!(f, "Keywords ({})", keywords.len())?;
            let chips: Vec<String> = keywords
                .iter()
                .take(MAX_KEYWORDS)
                .map(|k| format!("[{k}]"))
                .collect();
            write!(f, "  {}", chips.join(" "))?;
            if keywords.len() > MAX_KEYWORDS {
                write!(f, " ... and {} more", keywords.len() - MAX_KEYWORDS)?;
            }
            writeln!(f)?;
            writeln!(f)?;
        }

        let refs = &self.resp.references;
        if !refs.is_empty() {
            writeln!(f, "References ({})", refs.len())?;
            for (i, r) in refs.iter().enumerate() {
                write!(f, "  {:>2}. {:<30} {:>5.1}%", i + 1, r.domain, r.similarity())?;
                if let Some(src) = r.source.as_deref().filter(|s| !s.is_empty()) {
                    write!(f, "  via {src}")?;
                }
                writeln!(f)?;
                writeln!(f, "      {}", truncate(r.display_title(), MAX_TITLE_CHARS))?;
                writeln!(f, "      {}", r.url)?;
            }
            writeln!(f)?;
        }

        if let Some(ts) = &self.resp.timestamp {
            writeln!(f, "Checked at {}", format_timestamp(ts))?;
        }
        Ok(())
    }
}

// ── Service info ──

pub struct HealthCard<'a>(pub &'a HealthStatus);

impl fmt::Display for HealthCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.0;
        writeln!(f, "  {:<26} {}", "status", h.status)?;
        if let Some(init) = h.fact_checker_initialized {
            writeln!(
                f,
                "  {:<26} {}",
                "fact_checker_initialized",
                if init { "yes" } else { "no" }
            )?;
        }
        for (name, path) in &h.endpoints {
            writeln!(f, "  {:<26} {}", format!("endpoint.{name}"), path)?;
        }
        Ok(())
    }
}

pub struct SourceList<'a>(pub &'a TrustedSources);

impl fmt::Display for SourceList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let domains: Vec<&str> = self.0.domains().collect();
        writeln!(f, "Trusted sources ({})", domains.len())?;
        for d in domains {
            writeln!(f, "  {d}")?;
        }
        Ok(())
    }
}

/// One-line progress indicator, redrawn in place with `\r`.
pub fn progress_line(percent: u8) -> String {
    let pct = percent.min(100);
    let filled = usize::from(pct) * BAR_WIDTH / 100;
    format!(
        "\r  Checking [{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        pct
    )
}

// ── Helpers ──

fn bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!(
        "[{}{}] {:>5.1}%",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        percent
    )
}

/// Shorten to `max` characters, counting chars rather than bytes.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

/// The service stamps results with a naive local ISO time; show it without fractions.
fn format_timestamp(ts: &str) -> String {
    if let Ok(dt) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return dt.format("%Y-%m-%d %H:%M:%S %:z").to_string();
    }
    ts.to_string()
}
