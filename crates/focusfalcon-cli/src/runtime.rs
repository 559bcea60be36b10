//! Opening state and wiring the core pieces together for one command.

use std::path::PathBuf;
use std::rc::Rc;

use chrono::{DateTime, FixedOffset, Local};
use focusfalcon_core::enforcement::{BlockRule, BrowserHost, Tab, TabId};
use focusfalcon_core::storage::data_dir;
use focusfalcon_core::{
    Config, Database, EnforcementCoordinator, Event, HostError, SessionController,
};
use tracing::debug;

pub type Now = DateTime<FixedOffset>;
pub type Controller = SessionController<Rc<Database>>;
pub type Coordinator = EnforcementCoordinator<Rc<Database>, HeadlessHost>;

pub fn parse_now(at: Option<&str>) -> Result<Now, String> {
    match at {
        Some(raw) => DateTime::parse_from_rfc3339(raw).map_err(|e| format!("invalid --at '{raw}': {e}")),
        None => Ok(Local::now().fixed_offset()),
    }
}

/// Host for running without a browser: there are no tabs, and installed
/// network rules are kept in `<data_dir>/rules.json`.
pub struct HeadlessHost {
    rules_path: PathBuf,
}

impl HeadlessHost {
    pub fn new(rules_path: PathBuf) -> Self {
        Self { rules_path }
    }
}

impl BrowserHost for HeadlessHost {
    fn query_tabs(&self) -> Result<Vec<Tab>, HostError> {
        Ok(Vec::new())
    }

    fn reload_tab(&self, _tab: TabId) -> Result<(), HostError> {
        Err(HostError::Unsupported("tabs".into()))
    }

    fn redirect(&self, _tab: TabId, _target: &str) -> Result<(), HostError> {
        Err(HostError::Unsupported("tabs".into()))
    }

    fn dynamic_rules(&self) -> Result<Vec<BlockRule>, HostError> {
        match std::fs::read_to_string(&self.rules_path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| HostError::call_failed("dynamic_rules", e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(HostError::call_failed("dynamic_rules", e.to_string())),
        }
    }

    fn update_dynamic_rules(&self, remove_ids: &[u32], add: &[BlockRule]) -> Result<(), HostError> {
        let mut rules = self.dynamic_rules()?;
        rules.retain(|r| !remove_ids.contains(&r.id));
        rules.extend_from_slice(add);
        let text = serde_json::to_string_pretty(&rules)
            .map_err(|e| HostError::call_failed("update_dynamic_rules", e.to_string()))?;
        std::fs::write(&self.rules_path, text)
            .map_err(|e| HostError::call_failed("update_dynamic_rules", e.to_string()))
    }
}

/// Database, config and the wired controller/coordinator pair.
pub struct Runtime {
    pub db: Rc<Database>,
    pub config: Config,
    pub coordinator: Rc<Coordinator>,
    pub controller: Controller,
}

impl Runtime {
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let dir = data_dir()?;
        debug!(dir = %dir.display(), "using data directory");
        let config = Config::load_from(&dir.join("config.toml"))?;
        let db = Rc::new(Database::open_at(&dir.join("focusfalcon.db"))?);

        let host = HeadlessHost::new(dir.join("rules.json"));
        let coordinator = Rc::new(EnforcementCoordinator::new(Rc::clone(&db), host, &config));

        let mut controller = SessionController::new(Rc::clone(&db), config.session.clone());
        let listener = Rc::clone(&coordinator);
        controller.subscribe(Box::new(move |event: &Event| listener.handle_event(event)));

        Ok(Self {
            db,
            config,
            coordinator,
            controller,
        })
    }
}
