//! Prints each committed day's report channels to standard output.

use campaign_core::{CampaignState, DayListener, TickSummary};

/// Day listener that prints the date and every non-empty report channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportPrinter;

impl DayListener for ReportPrinter {
    fn on_new_day(&mut self, state: &CampaignState, summary: &TickSummary) {
        println!("== {} ==", summary.date.format("%A, %Y-%m-%d"));
        for notice in &summary.celebrations {
            println!("  * {notice}");
        }
        for (category, entries) in state.reports().iter() {
            println!("  [{category}]");
            for entry in entries {
                println!("    {entry}");
            }
        }
        if summary.contained_failures > 0 {
            println!(
                "  ({} entities could not be processed)",
                summary.contained_failures
            );
        }
    }
}
