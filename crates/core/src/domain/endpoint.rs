// Endpoint allow-list
//
// The set of backend operations a job may target. The enum is the single
// source of truth: submission validation parses against it and the dispatcher
// registers handlers keyed by it.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    GenerateText,
    GenerateImage,
    EditImage,
    GenerateVideo,
    VolcengineImage,
    VolcengineVideo,
    QianfanVideo,
    SpeechSynthesize,
    AnalyzeVideo,
    AnalyzeImage,
    SubtitleSubmit,
}

impl Endpoint {
    /// Every allow-listed endpoint, in declaration order.
    pub const ALL: [Endpoint; 11] = [
        Endpoint::GenerateText,
        Endpoint::GenerateImage,
        Endpoint::EditImage,
        Endpoint::GenerateVideo,
        Endpoint::VolcengineImage,
        Endpoint::VolcengineVideo,
        Endpoint::QianfanVideo,
        Endpoint::SpeechSynthesize,
        Endpoint::AnalyzeVideo,
        Endpoint::AnalyzeImage,
        Endpoint::SubtitleSubmit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::GenerateText => "generate-text",
            Endpoint::GenerateImage => "generate-image",
            Endpoint::EditImage => "edit-image",
            Endpoint::GenerateVideo => "generate-video",
            Endpoint::VolcengineImage => "volcengine-image",
            Endpoint::VolcengineVideo => "volcengine-video",
            Endpoint::QianfanVideo => "qianfan-video",
            Endpoint::SpeechSynthesize => "speech-synthesize",
            Endpoint::AnalyzeVideo => "analyze-video",
            Endpoint::AnalyzeImage => "analyze-image",
            Endpoint::SubtitleSubmit => "subtitle-submit",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Endpoint::ALL
            .iter()
            .find(|e| e.as_str() == s)
            .copied()
            .ok_or_else(|| DomainError::UnknownEndpoint(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_endpoint() {
        for endpoint in Endpoint::ALL {
            let parsed: Endpoint = endpoint.as_str().parse().unwrap();
            assert_eq!(parsed, endpoint);
        }
    }

    #[test]
    fn parse_rejects_unknown_names() {
        let err = "not-a-real-endpoint".parse::<Endpoint>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownEndpoint(_)));
    }

    #[test]
    fn serde_uses_allow_list_names() {
        let json = serde_json::to_string(&Endpoint::VolcengineImage).unwrap();
        assert_eq!(json, "\"volcengine-image\"");

        let back: Endpoint = serde_json::from_str("\"subtitle-submit\"").unwrap();
        assert_eq!(back, Endpoint::SubtitleSubmit);
    }
}
