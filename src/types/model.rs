use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Represents a DeepSeek model identifier.
///
/// This can be a predefined model version or a custom string value
/// for models that may be added in the future.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier (for future models or private deployments)
    Custom(String),
}

/// Known DeepSeek model versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// The general-purpose chat model.
    #[serde(rename = "deepseek-chat")]
    DeepseekChat,

    /// The reasoning model.
    #[serde(rename = "deepseek-reasoner")]
    DeepseekReasoner,
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{}", known_model),
            Model::Custom(custom) => write!(f, "{}", custom),
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnownModel::DeepseekChat => write!(f, "deepseek-chat"),
            KnownModel::DeepseekReasoner => write!(f, "deepseek-reasoner"),
        }
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deepseek-chat" => Ok(Model::Known(KnownModel::DeepseekChat)),
            "deepseek-reasoner" => Ok(Model::Known(KnownModel::DeepseekReasoner)),
            other => Ok(Model::Custom(other.to_string())),
        }
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        model.parse().unwrap_or(Model::Custom(model))
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        model.parse().unwrap_or_else(|_| Model::Custom(model.to_string()))
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Known(KnownModel::DeepseekChat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_model_serialization() {
        let model = Model::Known(KnownModel::DeepseekChat);
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#""deepseek-chat""#);

        let model = Model::Known(KnownModel::DeepseekReasoner);
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#""deepseek-reasoner""#);
    }

    #[test]
    fn custom_model_serialization() {
        let model = Model::Custom("deepseek-coder".to_string());
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#""deepseek-coder""#);
    }

    #[test]
    fn model_from_str() {
        let model: Model = "deepseek-chat".parse().unwrap();
        assert_eq!(model, Model::Known(KnownModel::DeepseekChat));

        let model: Model = "some-future-model".parse().unwrap();
        assert_eq!(model, Model::Custom("some-future-model".to_string()));
    }

    #[test]
    fn display_round_trip() {
        for name in ["deepseek-chat", "deepseek-reasoner", "custom-model"] {
            let model: Model = name.parse().unwrap();
            assert_eq!(model.to_string(), name);
        }
    }

    #[test]
    fn default_model() {
        assert_eq!(Model::default(), Model::Known(KnownModel::DeepseekChat));
    }
}
