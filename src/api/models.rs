use std::fmt;
use std::str::FromStr;

/// Chat models the client is willing to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedModel {
    Gpt4,
    Gpt4_0314,
    Gpt4_32k,
    Gpt4_32k0314,
    Gpt35Turbo,
    Gpt35Turbo0301,
}

pub const DEFAULT_MODEL: SupportedModel = SupportedModel::Gpt4;

impl SupportedModel {
    pub const ALL: [SupportedModel; 6] = [
        SupportedModel::Gpt4,
        SupportedModel::Gpt4_0314,
        SupportedModel::Gpt4_32k,
        SupportedModel::Gpt4_32k0314,
        SupportedModel::Gpt35Turbo,
        SupportedModel::Gpt35Turbo0301,
    ];

    pub fn id(self) -> &'static str {
        match self {
            SupportedModel::Gpt4 => "gpt-4",
            SupportedModel::Gpt4_0314 => "gpt-4-0314",
            SupportedModel::Gpt4_32k => "gpt-4-32k",
            SupportedModel::Gpt4_32k0314 => "gpt-4-32k-0314",
            SupportedModel::Gpt35Turbo => "gpt-3.5-turbo",
            SupportedModel::Gpt35Turbo0301 => "gpt-3.5-turbo-0301",
        }
    }
}

impl fmt::Display for SupportedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModel(pub String);

impl fmt::Display for UnknownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported model: {}", self.0)
    }
}

impl std::error::Error for UnknownModel {}

impl FromStr for SupportedModel {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|model| model.id() == s)
            .ok_or_else(|| UnknownModel(s.to_string()))
    }
}

pub fn list_models() {
    println!("Supported models:");
    for model in SupportedModel::ALL {
        if model == DEFAULT_MODEL {
            println!("  • {model} (default)");
        } else {
            println!("  • {model}");
        }
    }
}
