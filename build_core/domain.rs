use serde::{Deserialize, Deserializer};

//==================================================================================MANIFEST
// Structures to deserialize `command_manifest.json`.
#[derive(Debug, Deserialize)]
/// Complete manifest: version, response codes, states and commands.
pub(crate) struct Manifest {
    pub(crate) protocol_version: VersionEntry,
    pub(crate) responses: Vec<NamedId>,
    pub(crate) states: Vec<NamedId>,
    pub(crate) commands: Vec<CommandEntry>,
}

#[derive(Debug, Deserialize)]
/// Protocol-compatibility version reported by `GetSoftwareVersionNumber`.
pub(crate) struct VersionEntry {
    pub(crate) major: u16,
    pub(crate) minor: u16,
    pub(crate) build: u16,
}

#[derive(Debug, Deserialize, Clone)]
/// Simple `{ name, id }` pair used for response codes and states.
pub(crate) struct NamedId {
    pub(crate) name: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub(crate) id: u16,
}

#[derive(Debug, Deserialize, Clone)]
/// Entry in the command catalogue.
pub(crate) struct CommandEntry {
    pub(crate) name: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub(crate) id: u16,
    #[serde(default)]
    pub(crate) action: ActionKind,
    /// Only meaningful for `ActionKind::Fixed`.
    #[serde(default)]
    pub(crate) parameters: Vec<u8>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
/// Manifest spelling of `crate::core::CommandAction`.
pub(crate) enum ActionKind {
    #[default]
    Acknowledge,
    Fixed,
    Start,
    StartJamming,
    StopJamming,
    Zeroise,
    ReportState,
    BuiltInTest,
    Capabilities,
    SoftwareVersion,
    FpgaVersion,
    PowerMonitorReading,
    Reboot,
}

impl ActionKind {
    /// Variant path emitted into the generated table.
    pub(crate) fn variant(&self) -> &'static str {
        match self {
            ActionKind::Acknowledge => "Acknowledge",
            ActionKind::Fixed => "Fixed",
            ActionKind::Start => "Start",
            ActionKind::StartJamming => "StartJamming",
            ActionKind::StopJamming => "StopJamming",
            ActionKind::Zeroise => "Zeroise",
            ActionKind::ReportState => "ReportState",
            ActionKind::BuiltInTest => "BuiltInTest",
            ActionKind::Capabilities => "Capabilities",
            ActionKind::SoftwareVersion => "SoftwareVersion",
            ActionKind::FpgaVersion => "FpgaVersion",
            ActionKind::PowerMonitorReading => "PowerMonitorReading",
            ActionKind::Reboot => "Reboot",
        }
    }
}

/// Ids are written either as JSON numbers or as `"0x…"` strings.
fn deserialize_id<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u16),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(value) => Ok(value),
        RawId::Text(text) => {
            let trimmed = text.trim();
            let parsed = match trimmed
                .strip_prefix("0x")
                .or_else(|| trimmed.strip_prefix("0X"))
            {
                Some(hex) => u16::from_str_radix(hex, 16),
                None => trimmed.parse::<u16>(),
            };
            parsed.map_err(|e| serde::de::Error::custom(format!("invalid id {text:?}: {e}")))
        }
    }
}
