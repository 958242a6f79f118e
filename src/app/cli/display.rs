//! Run summary output

use crate::app::cli::OutputFormat;
use crate::app::driver::DriverReport;
use colored::Colorize;

const PARTITION_COLUMN_WIDTH: usize = 9;
const COUNT_COLUMN_WIDTH: usize = 10;

/// Render the summary in the requested format
pub fn render_summary(
    report: &DriverReport,
    format: OutputFormat,
    use_color: bool,
) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("Failed to serialize summary: {}", e)),
        OutputFormat::Text => Ok(render_text(report, use_color)),
    }
}

/// Print the summary to stdout
pub fn print_summary(report: &DriverReport, format: OutputFormat, use_color: bool) -> Result<(), String> {
    let rendered = render_summary(report, format, use_color)?;
    println!("{}", rendered);
    Ok(())
}

fn render_text(report: &DriverReport, use_color: bool) -> String {
    let mut lines = Vec::new();

    let title = format!("Queue '{}'", report.queue.name);
    lines.push(paint(&title, use_color, |s| s.bold().cyan()));
    lines.push(format!(
        "{} partitions, {} lanes, capacity {}",
        report.queue.partition_count, report.queue.lane_count, report.queue.total_capacity
    ));
    lines.push(String::new());

    let header = format!(
        "{:<pw$} {:>cw$} {:>cw$} {:>cw$} {:>cw$}",
        "Partition",
        "Consumed",
        "Batches",
        "Capacity",
        "Reordered",
        pw = PARTITION_COLUMN_WIDTH,
        cw = COUNT_COLUMN_WIDTH
    );
    lines.push(paint(&header, use_color, |s| s.bold()));
    lines.push(format!(
        "{} {}",
        "-".repeat(PARTITION_COLUMN_WIDTH),
        "-".repeat(COUNT_COLUMN_WIDTH * 4 + 3)
    ));

    for tally in &report.partitions {
        let capacity = report
            .queue
            .partitions
            .get(tally.partition)
            .map(|p| p.capacity)
            .unwrap_or_default();
        let row = format!(
            "{:<pw$} {:>cw$} {:>cw$} {:>cw$} {:>cw$}",
            tally.partition,
            tally.consumed,
            tally.batches,
            capacity,
            tally.out_of_order,
            pw = PARTITION_COLUMN_WIDTH,
            cw = COUNT_COLUMN_WIDTH
        );
        if tally.out_of_order > 0 {
            lines.push(paint(&row, use_color, |s| s.red()));
        } else {
            lines.push(row);
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "produced {} of {}, consumed {} in {} ms ({:.0} records/s)",
        report.produced,
        report.expected,
        report.consumed(),
        report.elapsed_ms,
        report.records_per_second()
    ));

    if report.interrupted {
        lines.push(paint("run interrupted before all records were written", use_color, |s| {
            s.yellow()
        }));
    }

    lines.join("\n")
}

fn paint(text: &str, use_color: bool, style: impl Fn(&str) -> colored::ColoredString) -> String {
    if use_color {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::driver::PartitionTally;
    use crate::queue::MultiQueue;

    fn report(interrupted: bool) -> DriverReport {
        let queue = MultiQueue::<u8>::init("summary", 8, 2, 1).unwrap();
        DriverReport {
            produced: 6,
            expected: if interrupted { 10 } else { 6 },
            elapsed_ms: 3,
            interrupted,
            partitions: vec![
                PartitionTally {
                    partition: 0,
                    consumed: 4,
                    batches: 1,
                    out_of_order: 0,
                },
                PartitionTally {
                    partition: 1,
                    consumed: 2,
                    batches: 1,
                    out_of_order: 0,
                },
            ],
            queue: queue.stats(),
        }
    }

    #[test]
    fn test_text_summary_lists_partitions() {
        let text = render_summary(&report(false), OutputFormat::Text, false).unwrap();
        assert!(text.starts_with("Queue 'summary'"));
        assert!(text.contains("2 partitions, 1 lanes, capacity 8"));
        assert!(text.contains("produced 6 of 6, consumed 6"));
        assert!(!text.contains("interrupted"));
        assert_eq!(text.lines().filter(|l| l.starts_with('0') || l.starts_with('1')).count(), 2);
    }

    #[test]
    fn test_text_summary_flags_interruption() {
        let text = render_summary(&report(true), OutputFormat::Text, false).unwrap();
        assert!(text.contains("run interrupted"));
    }

    #[test]
    fn test_json_summary_round_trips_counts() {
        let json = render_summary(&report(false), OutputFormat::Json, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["produced"], 6);
        assert_eq!(value["queue"]["name"], "summary");
        assert_eq!(value["partitions"][1]["consumed"], 2);
    }
}
