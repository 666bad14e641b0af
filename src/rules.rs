/// Per-category rule sets
///
/// Everything the decision engine needs besides the custom sound map,
/// rebuilt from configuration whenever a relevant key changes.
use crate::audio_system::{CueCategory, Volume};
use crate::config::SwapperConfig;
use crate::ids::{parse_id_list, IdSet};

/// Positional id remap: the i-th source id maps to the i-th replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleSwapMap {
    sources: Vec<u32>,
    replacements: Vec<u32>,
}

impl SimpleSwapMap {
    pub fn new(sources: Vec<u32>, replacements: Vec<u32>) -> Self {
        if sources.len() > replacements.len() {
            tracing::debug!(
                "{} simple swap source ids have no replacement and will pass through",
                sources.len() - replacements.len()
            );
        }
        Self {
            sources,
            replacements,
        }
    }

    /// Parse both lists, keeping order and duplicates
    pub fn parse(source_text: &str, replacement_text: &str) -> Self {
        Self::new(parse_id_list(source_text), parse_id_list(replacement_text))
    }

    /// Replacement for `id`, looked up at the id's first source position
    pub fn replacement_for(&self, id: u32) -> Option<u32> {
        let index = self.sources.iter().position(|&source| source == id)?;
        self.replacements.get(index).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }
}

/// Rules for one cue category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleConfig {
    /// Custom clip replacement is switched on
    pub custom_enabled: bool,

    /// Ids that always play, even when consumed otherwise
    pub whitelist: IdSet,

    /// Ids that are consumed regardless of `consume_all`
    pub blacklist: IdSet,

    /// Consume every cue that is not replaced or whitelisted
    pub consume_all: bool,

    /// Gain for replacement clips; `None` plays at device default
    pub volume_override: Option<Volume>,

    pub simple_swap_enabled: bool,
    pub simple_swap: SimpleSwapMap,
}

impl RuleConfig {
    /// Build the rules for `category` from the current configuration
    pub fn from_config(config: &SwapperConfig, category: CueCategory) -> Self {
        Self {
            custom_enabled: config.custom_enabled(category),
            whitelist: IdSet::parse(config.whitelist(category)),
            blacklist: IdSet::parse(config.blacklist(category)),
            consume_all: config.consume_all(category),
            volume_override: config.volume_override(category),
            simple_swap_enabled: config.simple_id_swap_enabled,
            simple_swap: SimpleSwapMap::parse(
                &config.simple_source_ids,
                &config.simple_replacement_ids,
            ),
        }
    }
}
