use focusfalcon_core::enforcement::generate_rules;
use focusfalcon_core::{MessageRouter, StateStore};
use serde_json::json;

use crate::runtime::{Now, Runtime};

pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::open()?;
    let written = StateStore::new(&rt.db).install_defaults()?;
    if written.is_empty() {
        println!("already initialized");
    } else {
        println!("initialized: {}", written.join(", "));
    }
    Ok(())
}

pub fn check(url: &str, as_json: bool, now: &Now) -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::open()?;
    let verdict = rt.coordinator.engine().evaluate(url, now);
    if as_json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        let action = if verdict.block { "blocked" } else { "allowed" };
        let rule = serde_json::to_value(verdict.rule)?;
        println!("{action} ({})", rule.as_str().unwrap_or_default());
    }
    Ok(())
}

pub fn status(now: &Now) -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::open()?;
    let state = rt.controller.state();
    let out = json!({
        "status": rt.controller.status(now),
        "blockedSites": state.blocked_sites(),
        "blockRules": state.schedule(),
        "avatar": state.avatar(),
        "focusStreak": state.focus_streak(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

pub fn rules(as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::open()?;
    let sites = rt.controller.state().blocked_sites();
    let rules = generate_rules(sites.as_slice(), rt.config.blocking.rule_id_start);
    if as_json {
        println!("{}", serde_json::to_string_pretty(&rules)?);
    } else {
        for rule in &rules {
            println!("{}  {}", rule.id, rule.site());
        }
    }
    Ok(())
}

pub fn message(raw: &str, now: &Now) -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::open()?;
    let router = MessageRouter::new(&rt.controller, rt.coordinator.as_ref());
    let response = router.handle_json(raw, now);
    println!("{}", serde_json::to_string(&response)?);
    if !response.ok {
        return Err(response.error.unwrap_or_default().into());
    }
    Ok(())
}
