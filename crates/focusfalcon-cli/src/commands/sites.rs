use std::io::Read;

use clap::Subcommand;
use focusfalcon_core::BlockedSiteSet;

use crate::runtime::{Now, Runtime};

#[derive(Subcommand)]
pub enum SitesAction {
    /// List blocked sites
    List {
        #[arg(long)]
        json: bool,
    },
    /// Block a site (URLs and www. prefixes are normalized)
    Add { site: String },
    /// Unblock a site
    Remove { site: String },
    /// Replace one blocked site with another
    Edit { old: String, new: String },
    /// Replace the list with newline-separated domains from a file ("-" for stdin)
    Import { file: String },
}

pub fn run(action: SitesAction, now: &Now) -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::open()?;
    let mut sites = rt.controller.state().blocked_sites();

    match action {
        SitesAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&sites)?);
            } else {
                for site in sites.iter() {
                    println!("{site}");
                }
            }
            return Ok(());
        }
        SitesAction::Add { site } => {
            let added = sites.add(&site)?;
            println!("blocked: {added}");
        }
        SitesAction::Remove { site } => {
            let removed = sites.remove(&site)?;
            println!("unblocked: {removed}");
        }
        SitesAction::Edit { old, new } => {
            let stored = sites.edit(&old, &new)?;
            println!("updated: {stored}");
        }
        SitesAction::Import { file } => {
            let text = if file == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                std::fs::read_to_string(&file)?
            };
            let (imported, rejected) = BlockedSiteSet::import_lines(&text);
            for (line, err) in &rejected {
                eprintln!("skipped '{line}': {err}");
            }
            println!("imported {} sites", imported.len());
            sites = imported;
        }
    }

    rt.controller.save_blocked_sites(&sites, now)?;
    Ok(())
}
