//! Network-level block rules in the browser's declarative rule shape.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleAction {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCondition {
    pub url_filter: String,
    pub resource_types: Vec<String>,
}

/// One dynamic rule, serialized exactly as the browser expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRule {
    pub id: u32,
    pub priority: u32,
    pub action: RuleAction,
    pub condition: RuleCondition,
}

impl BlockRule {
    /// Block top-level loads whose URL contains `site`.
    pub fn block_main_frame(id: u32, site: &str) -> Self {
        Self {
            id,
            priority: 1,
            action: RuleAction {
                kind: "block".into(),
            },
            condition: RuleCondition {
                url_filter: site.to_string(),
                resource_types: vec!["main_frame".into()],
            },
        }
    }

    /// The site this rule was generated for.
    pub fn site(&self) -> &str {
        &self.condition.url_filter
    }
}

/// One rule per site, ids contiguous from `start_id`.
pub fn generate_rules<S: AsRef<str>>(sites: &[S], start_id: u32) -> Vec<BlockRule> {
    sites
        .iter()
        .zip(start_id..)
        .map(|(site, id)| BlockRule::block_main_frame(id, site.as_ref()))
        .collect()
}
