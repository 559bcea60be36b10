use clap::Subcommand;
use focusfalcon_core::Schedule;

use crate::runtime::{Now, Runtime};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Show the current schedule
    Show,
    /// Set the schedule from JSON
    Set {
        /// e.g. '{"enabled":true,"days":[1,2,3,4,5],"timeRanges":[{"start":"09:00","end":"17:00"}]}'
        json: String,
    },
    /// Turn schedule blocking on
    Enable,
    /// Turn schedule blocking off
    Disable,
    /// Restore the default (disabled, weekdays 09:00-17:00)
    Reset,
}

pub fn run(action: ScheduleAction, now: &Now) -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::open()?;
    let mut schedule = rt.controller.state().schedule();

    match action {
        ScheduleAction::Show => {
            println!("{}", serde_json::to_string_pretty(&schedule)?);
            return Ok(());
        }
        ScheduleAction::Set { json } => schedule = serde_json::from_str(&json)?,
        ScheduleAction::Enable => schedule.enabled = true,
        ScheduleAction::Disable => schedule.enabled = false,
        ScheduleAction::Reset => schedule = Schedule::default(),
    }

    let outcome = rt.controller.save_schedule(&schedule, now)?;
    if outcome.session_taken_over {
        println!("schedule is active now; focus session ended");
    }
    if outcome.pause_cleared {
        println!("pause cleared");
    }
    println!("schedule updated");
    Ok(())
}
