//! Model name mapping between public OpenAI-style ids and upstream ids.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

/// Upstream model used when a public id is unknown.
pub const DEFAULT_UPSTREAM_MODEL: &str = "deepseek_v3";
/// Public id reported when an upstream id is unknown.
pub const DEFAULT_PUBLIC_MODEL: &str = "deepseek_v3";

/// Public → upstream table. Declaration order matters: when two public ids
/// share an upstream id, the first one wins the reverse lookup.
const MODEL_TABLE: &[(&str, &str)] = &[
    ("deepseek_r1", "deepseek_r1"),
    ("deepseek_v3", "deepseek_v3"),
    ("o3-mini-high", "openai_o3_mini_high"),
    ("o3-mini-medium", "openai_o3_mini_medium"),
    ("o1", "openai_o1"),
    ("o1-mini", "openai_o1_mini"),
    ("o1-preview", "openai_o1_preview"),
    ("gpt-4o", "gpt_4o"),
    ("gpt-4o-mini", "gpt_4o_mini"),
    ("gpt-4-turbo", "gpt_4_turbo"),
    ("gpt-4", "gpt_4"),
    ("gpt-4.5-preview", "gpt_4_5_preview"),
    ("claude-3-opus", "claude_3_opus"),
    ("claude-3-sonnet", "claude_3_sonnet"),
    ("claude-3.5-sonnet", "claude_3_5_sonnet"),
    ("claude-3.5-haiku", "claude_3_5_haiku"),
    ("claude-3-7-sonnet", "claude_3_7_sonnet"),
    ("claude-3-7-sonnet-think", "claude_3_7_sonnet_thinking"),
    ("gemini-1.5-pro", "gemini_1_5_pro"),
    ("gemini-1.5-flash", "gemini_1_5_flash"),
    ("gemini-2.5-pro", "gemini_2_5_pro_experimental"),
    ("gemini-2.0-flash", "gemini_2_0_flash"),
    ("llama-3.2-90b", "llama3_2_90b"),
    ("llama-3.1-405b", "llama3_1_405b"),
    ("mistral-large-2", "mistral_large_2"),
    ("qwen-2.5-72b", "qwen2p5_72b"),
    ("qwen-2.5-coder-32b", "qwen2p5_coder_32b"),
    ("qwq-32b", "qwq_32b"),
    ("command-r-plus", "command_r_plus"),
    ("Solar 1 Mini", "solar_1_mini"),
];

static PUBLIC_TO_UPSTREAM: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| MODEL_TABLE.iter().copied().collect());

static UPSTREAM_TO_PUBLIC: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut reverse = HashMap::with_capacity(MODEL_TABLE.len());
    for &(public, upstream) in MODEL_TABLE {
        reverse.entry(upstream).or_insert(public);
    }
    reverse
});

/// Maps a public model id to its upstream id, falling back to [`DEFAULT_UPSTREAM_MODEL`].
#[must_use]
pub fn to_upstream(public: &str) -> &'static str {
    PUBLIC_TO_UPSTREAM.get(public).copied().unwrap_or(DEFAULT_UPSTREAM_MODEL)
}

/// Maps an upstream id back to its public id, falling back to [`DEFAULT_PUBLIC_MODEL`].
#[must_use]
pub fn to_public(upstream: &str) -> &'static str {
    UPSTREAM_TO_PUBLIC.get(upstream).copied().unwrap_or(DEFAULT_PUBLIC_MODEL)
}

/// How the requested model is expressed to upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSelection {
    /// Agent id, sent verbatim as `selectedChatMode`.
    Agent(String),
    /// Mapped model, sent as `selectedAiModel` with `selectedChatMode=custom`.
    Model(&'static str),
}

impl ModelSelection {
    /// Value of `selectedChatMode`.
    pub fn chat_mode(&self) -> &str {
        match self {
            Self::Agent(id) => id,
            Self::Model(_) => "custom",
        }
    }

    /// Query pairs in the order upstream expects them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Agent(_) => vec![("selectedChatMode", self.chat_mode().to_string())],
            Self::Model(model) => vec![
                ("selectedAiModel", (*model).to_string()),
                ("selectedChatMode", self.chat_mode().to_string()),
            ],
        }
    }
}

/// Static table plus the configured agent-model set.
#[derive(Debug, Clone, Default)]
pub struct ModelMapper {
    agent_ids: Vec<String>,
}

impl ModelMapper {
    pub fn new<I, S>(agent_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let agent_ids = agent_ids
            .into_iter()
            .map(|id| id.as_ref().trim().to_string())
            .filter(|id| !id.is_empty() && seen.insert(id.clone()))
            .collect();
        Self { agent_ids }
    }

    pub fn is_agent(&self, model: &str) -> bool {
        self.agent_ids.iter().any(|id| id == model)
    }

    pub fn select(&self, model: &str) -> ModelSelection {
        if self.is_agent(model) {
            ModelSelection::Agent(model.to_string())
        } else {
            ModelSelection::Model(to_upstream(model))
        }
    }

    /// Model name stamped on response envelopes.
    ///
    /// Agent ids pass through verbatim; anything else is normalized through
    /// the table, so unknown ids report the default model.
    pub fn response_model(&self, requested: &str) -> String {
        if self.is_agent(requested) {
            requested.to_string()
        } else {
            to_public(to_upstream(requested)).to_string()
        }
    }

    /// Every static public id (sorted, unique), then agent ids not already listed.
    pub fn public_model_ids(&self) -> Vec<String> {
        let statics: BTreeSet<&str> = MODEL_TABLE.iter().map(|(public, _)| *public).collect();
        let mut ids: Vec<String> = statics.iter().map(|s| (*s).to_string()).collect();
        ids.extend(self.agent_ids.iter().filter(|id| !statics.contains(id.as_str())).cloned());
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_mapping() {
        assert_eq!(to_upstream("gpt-4o"), "gpt_4o");
        assert_eq!(to_upstream("claude-3-7-sonnet-think"), "claude_3_7_sonnet_thinking");
        assert_eq!(to_upstream("Solar 1 Mini"), "solar_1_mini");
        assert_eq!(to_upstream("gemini-2.5-pro"), "gemini_2_5_pro_experimental");
    }

    #[test]
    fn test_unknown_falls_back_to_default() {
        assert_eq!(to_upstream("gpt-9000"), DEFAULT_UPSTREAM_MODEL);
        assert_eq!(to_public("mystery_model"), DEFAULT_PUBLIC_MODEL);
        assert!(PUBLIC_TO_UPSTREAM.contains_key(DEFAULT_PUBLIC_MODEL));
        assert!(UPSTREAM_TO_PUBLIC.contains_key(DEFAULT_UPSTREAM_MODEL));
    }

    #[test]
    fn test_round_trip_for_every_entry() {
        for &(public, upstream) in MODEL_TABLE {
            assert_eq!(to_upstream(public), upstream);
            assert_eq!(to_public(to_upstream(public)), public, "public id {public}");
        }
    }

    #[test]
    fn test_agent_selection() {
        let mapper = ModelMapper::new(["research_agent"]);
        assert_eq!(
            mapper.select("research_agent").query_pairs(),
            vec![("selectedChatMode", "research_agent".to_string())]
        );
        assert_eq!(
            mapper.select("gpt-4o").query_pairs(),
            vec![
                ("selectedAiModel", "gpt_4o".to_string()),
                ("selectedChatMode", "custom".to_string()),
            ]
        );
    }

    #[test]
    fn test_response_model() {
        let mapper = ModelMapper::new(["research_agent"]);
        assert_eq!(mapper.response_model("research_agent"), "research_agent");
        assert_eq!(mapper.response_model("gpt-4o"), "gpt-4o");
        assert_eq!(mapper.response_model("not-a-model"), "deepseek_v3");
    }

    #[test]
    fn test_public_model_ids() {
        let mapper = ModelMapper::new(["research_agent", "gpt-4o", " ", "research_agent"]);
        let ids = mapper.public_model_ids();
        assert_eq!(ids.len(), MODEL_TABLE.len() + 1);
        assert_eq!(ids.last().map(String::as_str), Some("research_agent"));
        assert_eq!(ids.iter().filter(|id| *id == "gpt-4o").count(), 1);
        let statics = &ids[..MODEL_TABLE.len()];
        assert!(statics.windows(2).all(|w| w[0] < w[1]));
    }
}
