use clap::Subcommand;
use focusfalcon_core::session::{confirmation_prompt, RandomSelector};
use focusfalcon_core::{Confirmation, ConfirmationKind};

use crate::runtime::{Now, Runtime};

#[derive(Subcommand)]
pub enum FocusAction {
    /// Start a focus session
    Start {
        /// Duration in minutes
        minutes: u32,
    },
    /// End the running session early
    End {
        /// Confirm without prompting
        #[arg(long)]
        yes: bool,
    },
    /// Print the focus session state as JSON
    Status,
}

/// Without `--yes` the user sees the prompt and the action is declined.
fn confirmation(kind: ConfirmationKind, yes: bool) -> Confirmation {
    if yes {
        Confirmation::confirmed(kind)
    } else {
        eprintln!("{}", confirmation_prompt(kind, &RandomSelector));
        eprintln!("re-run with --yes to confirm");
        Confirmation::declined(kind)
    }
}

pub fn run(action: FocusAction, now: &Now) -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::open()?;
    match action {
        FocusAction::Start { minutes } => {
            let session = rt.controller.start_focus(minutes, now)?;
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        FocusAction::End { yes } => {
            rt.controller
                .end_focus(confirmation(ConfirmationKind::EndSession, yes), now)?;
            println!("focus session ended");
        }
        FocusAction::Status => {
            let status = rt.controller.status(now);
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }
    Ok(())
}

pub fn pause(yes: bool, now: &Now) -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::open()?;
    rt.controller
        .pause(confirmation(ConfirmationKind::Pause, yes), now)?;
    println!("blocking paused");
    Ok(())
}

pub fn resume(now: &Now) -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::open()?;
    rt.controller.resume(now)?;
    println!("blocking resumed");
    Ok(())
}
