use crate::core::{Axis, ClassificationRecord, Label};
use crate::report::{AnalysisReport, LabeledScore};
use crate::stats::{AnalysisEntry, Percentages, StatValue};
use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

/// Longest comment excerpt shown in terminal tables
const EXCERPT_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Terminal,
}

/// Result of a label lookup against the latest index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelLookup {
    pub axis: Axis,
    pub label: String,
    pub limit: usize,
    pub records: Vec<Arc<ClassificationRecord>>,
}

/// Everything one CLI invocation reports
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionReport {
    pub analyses: Vec<AnalysisReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup: Option<LabelLookup>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<AnalysisEntry>,
    pub platform_stats: BTreeMap<String, BTreeMap<String, StatValue>>,
}

pub trait OutputWriter {
    fn write_session(&mut self, session: &SessionReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_session(&mut self, session: &SessionReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(session)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_session(&mut self, session: &SessionReport) -> anyhow::Result<()> {
        self.write_header()?;
        for report in &session.analyses {
            self.write_analysis(report)?;
        }
        if let Some(lookup) = &session.lookup {
            self.write_lookup(lookup)?;
        }
        if !session.history.is_empty() {
            self.write_history(&session.history)?;
        }
        self.write_platform_stats(&session.platform_stats)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> TerminalWriter<W> {
    fn write_header(&mut self) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Sentimap Analysis Report".bold().blue())?;
        writeln!(self.writer, "{}", "========================".blue())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_analysis(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{} {} ({})",
            format!("Analysis #{}:", report.analysis_id).bold(),
            report.platform.cyan(),
            report.locator
        )?;
        writeln!(
            self.writer,
            "  Analyzed at: {}",
            report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer, "  Comments analyzed: {}", report.comments_analyzed)?;
        if report.comments_skipped > 0 {
            writeln!(
                self.writer,
                "  Comments skipped: {}",
                report.comments_skipped.to_string().yellow()
            )?;
            for failure in &report.skipped {
                writeln!(self.writer, "    - #{}: {}", failure.index, failure.reason)?;
            }
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "{}", percentage_table("Sentiment", &report.sentiment_stats))?;
        writeln!(self.writer, "{}", percentage_table("Emotion", &report.emotion_stats))?;

        if !report.sample_comments.is_empty() {
            let mut table = new_table(vec!["Comment", "Sentiment", "Emotion"]);
            for sample in &report.sample_comments {
                table.add_row(vec![
                    Cell::new(excerpt(&sample.text)),
                    Cell::new(scored(&sample.sentiment)),
                    Cell::new(scored(&sample.emotion)),
                ]);
            }
            writeln!(self.writer, "{}", "Sample comments".bold())?;
            writeln!(self.writer, "{table}")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_lookup(&mut self, lookup: &LabelLookup) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{} {} = {} (showing up to {})",
            "Lookup:".bold(),
            lookup.axis,
            lookup.label.cyan(),
            lookup.limit
        )?;
        if lookup.records.is_empty() {
            writeln!(self.writer, "  No comments carry this label.")?;
        }
        for (i, record) in lookup.records.iter().enumerate() {
            writeln!(
                self.writer,
                "  {}. {} [{} {:.4} / {} {:.4}]",
                i + 1,
                excerpt(&record.text),
                record.sentiment.label,
                record.sentiment.score,
                record.emotion.label,
                record.emotion.score
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_history(&mut self, history: &[AnalysisEntry]) -> anyhow::Result<()> {
        let mut table = new_table(vec!["When", "Platform", "Locator", "Comments"]);
        for entry in history {
            table.add_row(vec![
                Cell::new(entry.timestamp.format("%Y-%m-%d %H:%M:%S")),
                Cell::new(&entry.platform),
                Cell::new(excerpt(&entry.locator)),
                Cell::new(entry.stats.total_comments),
            ]);
        }
        writeln!(self.writer, "{}", "Recent analyses".bold())?;
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_platform_stats(
        &mut self,
        stats: &BTreeMap<String, BTreeMap<String, StatValue>>,
    ) -> anyhow::Result<()> {
        for (platform, values) in stats {
            let mut table = new_table(vec!["Statistic", "Value"]);
            for (key, value) in values {
                table.add_row(vec![Cell::new(key), Cell::new(format_stat(*value))]);
            }
            writeln!(self.writer, "{} {}", "Platform totals:".bold(), platform.cyan())?;
            writeln!(self.writer, "{table}")?;
        }
        Ok(())
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn percentage_table<L: Label>(axis: &str, stats: &Percentages<L>) -> Table {
    let mut table = new_table(vec![axis, "Share"]);
    for (label, share) in stats {
        table.add_row(vec![
            Cell::new(label.display_name()),
            Cell::new(format!("{share:.1}%")),
        ]);
    }
    table
}

fn scored<L: Label>(value: &LabeledScore<L>) -> String {
    format!(
        "{} {:.4} ({})",
        value.label.display_name(),
        value.score,
        value.confidence.as_str()
    )
}

fn format_stat(value: StatValue) -> String {
    match value {
        StatValue::Count(count) => count.to_string(),
        StatValue::Percent(share) => format!("{share:.1}%"),
    }
}

/// Shorten text to `EXCERPT_CHARS` characters on a char boundary
fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(EXCERPT_CHARS - 3).collect();
    format!("{cut}...")
}

/// Writer for `format`, targeting `output` or stdout
pub fn create_writer(
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<Box<dyn OutputWriter>> {
    let sink: Box<dyn Write> = match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    crate::io::ensure_dir(parent)?;
                }
            }
            Box::new(BufWriter::new(File::create(path)?))
        }
        None => Box::new(std::io::stdout()),
    };
    Ok(match format {
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(sink)),
    })
}
