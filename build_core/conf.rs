//! Paths and constants used during build-time code generation.
//==================================================================================CONF
/// Manifest describing response codes, ECM states and the command catalogue.
pub(crate) const COMMAND_MANIFEST_PATH: &str = "build_core/var/command_manifest.json";
/// Environment variable pointing at an alternate manifest.
pub(crate) const MANIFEST_PATH_ENV: &str = "BLACKSTAR_ECM_MANIFEST_PATH";
/// Generated file name (written to `OUT_DIR`).
pub(crate) const OUT_DIR_COMMAND_FILE_NAME: &str = "generated_commands.rs";
/// Response codes the session refers to by name.
pub(crate) const REQUIRED_RESPONSE_CODES: &[&str] = &["Ok", "NotRecognised"];
/// ECM states the state machine refers to by name.
pub(crate) const REQUIRED_STATES: &[&str] = &[
    "Unknown",
    "Started",
    "Initialised",
    "StandbyNoMission",
    "StandbyNoMissionWithError",
    "StandbyWithMission",
    "StandbyWithMissionWithError",
    "Jamming",
    "JammingWithError",
];
