use anyhow::Result;
use console::style;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::pipeline::AnalysisReport;
use crate::utils::format_duration;

/// Save an analysis report to file
pub async fn save_to_file(report: &AnalysisReport, path: &Path, format: &OutputFormat) -> Result<()> {
    let content = match format {
        OutputFormat::Table => format_as_table(report),
        OutputFormat::Json => format_as_json(report)?,
    };

    fs_err::write(path, content)?;
    Ok(())
}

/// Print an analysis report to the console
pub fn print_to_console(report: &AnalysisReport, format: &OutputFormat) -> Result<()> {
    let content = match format {
        OutputFormat::Table => format_as_table(report),
        OutputFormat::Json => format_as_json(report)?,
    };

    println!("{}", content);
    Ok(())
}

/// Save the transcript as JSON so `clip --captions` can consume it
pub async fn save_transcript(report: &AnalysisReport, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(&report.transcript)?;
    fs_err::write(path, content)?;

    tracing::info!("Transcript saved to: {}", path.display());
    Ok(())
}

fn format_as_table(report: &AnalysisReport) -> String {
    let mut out = String::new();

    if let Some(title) = &report.metadata.source_title {
        out.push_str(&format!("{}\n", style(title).bold()));
    }
    if let Some(duration) = report.metadata.source_duration {
        out.push_str(&format!("Duration: {}\n", format_duration(duration)));
    }
    out.push_str(&format!(
        "{} candidates from {} of {} chunks\n\n",
        report.candidates.len(),
        report.metadata.analyzed_chunks,
        report.metadata.chunk_count
    ));

    if report.candidates.is_empty() {
        out.push_str("No clip candidates found.\n");
        return out;
    }

    for (index, candidate) in report.candidates.iter().enumerate() {
        out.push_str(&format!(
            "{} {} {}\n   {}\n",
            style(format!("{}.", index + 1)).cyan(),
            style(format!("[{} - {}]", candidate.start_time, candidate.end_time)).green(),
            style(&candidate.title).bold(),
            candidate.reason
        ));
    }

    out
}

fn format_as_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::ClipCandidate;
    use crate::pipeline::AnalysisMetadata;

    fn report() -> AnalysisReport {
        AnalysisReport {
            candidates: vec![ClipCandidate {
                start_time: "00:10".to_string(),
                end_time: "00:45".to_string(),
                title: "Hook".to_string(),
                reason: "Strong opener".to_string(),
            }],
            transcript: Vec::new(),
            metadata: AnalysisMetadata {
                source_title: Some("Demo Video".to_string()),
                source_duration: Some(120.0),
                chunk_count: 2,
                analyzed_chunks: 2,
                completed_at: chrono::Utc::now(),
            },
        }
    }

    #[test]
    fn test_table_lists_candidates() {
        let table = format_as_table(&report());
        assert!(table.contains("Demo Video"));
        assert!(table.contains("00:10 - 00:45"));
        assert!(table.contains("Hook"));
        assert!(table.contains("Strong opener"));
    }

    #[test]
    fn test_table_shows_source_duration() {
        let table = format_as_table(&report());
        assert!(table.contains("Duration: 2m 0s"));

        let mut unknown = report();
        unknown.metadata.source_duration = None;
        assert!(!format_as_table(&unknown).contains("Duration:"));
    }

    #[test]
    fn test_table_reports_empty_analysis() {
        let mut empty = report();
        empty.candidates.clear();

        let table = format_as_table(&empty);
        assert!(table.contains("No clip candidates found"));
    }

    #[test]
    fn test_json_round_trips() {
        let json = format_as_json(&report()).unwrap();
        let parsed: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(parsed.metadata.chunk_count, 2);
    }
}
