//! Generate the response-code, state and command enums plus the sorted command table.
use super::conf::*;
use super::domain::*;
use super::errors::*;

use crate::core::MAX_PARAMETER_BYTES;

use std::collections::HashMap;
use std::fmt::Write;

/// Validate the manifest and emit the whole generated module.
pub(crate) fn run_commands_gen(manifest: &Manifest) -> Result<String, BuildError> {
    validate_section("responses", &manifest.responses)?;
    validate_section("states", &manifest.states)?;
    require_names("responses", &manifest.responses, REQUIRED_RESPONSE_CODES)?;
    require_names("states", &manifest.states, REQUIRED_STATES)?;

    let command_ids: Vec<NamedId> = manifest
        .commands
        .iter()
        .map(|c| NamedId {
            name: c.name.clone(),
            id: c.id,
        })
        .collect();
    validate_section("commands", &command_ids)?;
    for command in &manifest.commands {
        validate_parameters(command)?;
    }

    let mut buffer = String::new();
    writeln!(buffer, "// @generated by build.rs from the command manifest.")?;
    writeln!(buffer)?;

    generate_version(&manifest.protocol_version, &mut buffer)?;
    generate_id_enum(
        "ResponseCode",
        "Response code carried in the `response id` field.",
        &manifest.responses,
        &mut buffer,
    )?;
    generate_id_enum(
        "EcmState",
        "Composite operational state reported by `GetState`.",
        &manifest.states,
        &mut buffer,
    )?;
    generate_id_enum(
        "Command",
        "Command id understood by the node.",
        &command_ids,
        &mut buffer,
    )?;
    generate_table(&manifest.commands, &mut buffer)?;

    Ok(buffer)
}

//==================================================================================VALIDATION
/// Reject duplicate ids, duplicate names and names that are not identifiers.
fn validate_section(section: &'static str, entries: &[NamedId]) -> Result<(), BuildError> {
    let mut by_id: HashMap<u16, &str> = HashMap::new();
    let mut by_name: HashMap<&str, u16> = HashMap::new();

    for entry in entries {
        if !is_identifier(&entry.name) {
            return Err(BuildError::InvalidName {
                section,
                name: entry.name.clone(),
            });
        }
        if let Some(first) = by_id.insert(entry.id, &entry.name) {
            return Err(BuildError::DuplicateId {
                section,
                id: entry.id,
                first: first.to_string(),
                second: entry.name.clone(),
            });
        }
        if by_name.insert(&entry.name, entry.id).is_some() {
            return Err(BuildError::DuplicateName {
                section,
                name: entry.name.clone(),
            });
        }
    }
    Ok(())
}

fn require_names(
    section: &'static str,
    entries: &[NamedId],
    required: &[&'static str],
) -> Result<(), BuildError> {
    for name in required {
        if !entries.iter().any(|e| e.name == *name) {
            return Err(BuildError::MissingEntry { section, name });
        }
    }
    Ok(())
}

fn validate_parameters(command: &CommandEntry) -> Result<(), BuildError> {
    if command.action != ActionKind::Fixed && !command.parameters.is_empty() {
        return Err(BuildError::UnexpectedParameters {
            name: command.name.clone(),
        });
    }
    if command.parameters.len() > MAX_PARAMETER_BYTES {
        return Err(BuildError::ParametersTooLong {
            name: command.name.clone(),
            len: command.parameters.len(),
            max: MAX_PARAMETER_BYTES,
        });
    }
    Ok(())
}

/// PascalCase ASCII identifier, as every variant name must be.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

//==================================================================================GENERATION
fn generate_version(version: &VersionEntry, buffer: &mut String) -> Result<(), BuildError> {
    writeln!(buffer, "/// Version of the command/state catalogue.")?;
    writeln!(
        buffer,
        "pub const PROTOCOL_VERSION: ProtocolVersion = ProtocolVersion {{ major: {}, minor: {}, build: {} }};",
        version.major, version.minor, version.build
    )?;
    writeln!(buffer)?;
    Ok(())
}

/// `#[repr(u16)]` enum with `From`/`TryFrom` conversions and a `name()` helper.
fn generate_id_enum(
    enum_name: &str,
    doc: &str,
    entries: &[NamedId],
    buffer: &mut String,
) -> Result<(), BuildError> {
    //======================Enum generation
    writeln!(buffer, "/// {}", doc)?;
    writeln!(buffer, "#[repr(u16)]")?;
    writeln!(buffer, "#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]")?;
    writeln!(buffer, "#[cfg_attr(feature = \"defmt\", derive(defmt::Format))]")?;
    writeln!(buffer, "pub enum {} {{", enum_name)?;
    for entry in entries {
        writeln!(buffer, "\t{} = {:#06x},", entry.name, entry.id)?;
    }
    writeln!(buffer, "}}")?;
    writeln!(buffer)?;

    //======================Invalid value
    writeln!(buffer, "/// Raw value with no `{}` counterpart.", enum_name)?;
    writeln!(buffer, "#[derive(Debug, PartialEq, Eq, Copy, Clone)]")?;
    writeln!(buffer, "pub struct Invalid{}(pub u16);", enum_name)?;
    writeln!(buffer)?;

    //======================Conversions
    writeln!(buffer, "impl From<{}> for u16 {{", enum_name)?;
    writeln!(buffer, "\tfn from(value: {}) -> Self {{", enum_name)?;
    writeln!(buffer, "\t\tvalue as u16")?;
    writeln!(buffer, "\t}}")?;
    writeln!(buffer, "}}")?;
    writeln!(buffer)?;
    writeln!(buffer, "impl TryFrom<u16> for {} {{", enum_name)?;
    writeln!(buffer, "\ttype Error = Invalid{};", enum_name)?;
    writeln!(buffer, "\tfn try_from(value: u16) -> Result<Self, Self::Error> {{")?;
    writeln!(buffer, "\t\tmatch value {{")?;
    for entry in entries {
        writeln!(
            buffer,
            "\t\t\t{:#06x} => Ok({}::{}),",
            entry.id, enum_name, entry.name
        )?;
    }
    writeln!(buffer, "\t\t\tother => Err(Invalid{}(other)),", enum_name)?;
    writeln!(buffer, "\t\t}}")?;
    writeln!(buffer, "\t}}")?;
    writeln!(buffer, "}}")?;
    writeln!(buffer)?;

    //======================Helpers
    writeln!(buffer, "impl {} {{", enum_name)?;
    writeln!(buffer, "\t/// Manifest name of the variant.")?;
    writeln!(buffer, "\tpub const fn name(self) -> &'static str {{")?;
    writeln!(buffer, "\t\tmatch self {{")?;
    for entry in entries {
        writeln!(
            buffer,
            "\t\t\t{}::{} => \"{}\",",
            enum_name, entry.name, entry.name
        )?;
    }
    writeln!(buffer, "\t\t}}")?;
    writeln!(buffer, "\t}}")?;
    writeln!(buffer)?;
    writeln!(buffer, "\t/// Value carried on the wire.")?;
    writeln!(buffer, "\tpub const fn id(self) -> u16 {{")?;
    writeln!(buffer, "\t\tself as u16")?;
    writeln!(buffer, "\t}}")?;
    writeln!(buffer, "}}")?;
    writeln!(buffer)?;
    Ok(())
}

/// Static table sorted by id so the runtime can binary-search it.
fn generate_table(commands: &[CommandEntry], buffer: &mut String) -> Result<(), BuildError> {
    let mut sorted: Vec<&CommandEntry> = commands.iter().collect();
    sorted.sort_by_key(|c| c.id);

    writeln!(buffer, "/// Command catalogue, sorted by ascending id.")?;
    writeln!(
        buffer,
        "pub static COMMAND_TABLE: [CommandDescriptor; {}] = [",
        sorted.len()
    )?;
    for command in sorted {
        let action = match command.action {
            ActionKind::Fixed => {
                let bytes: Vec<String> = command
                    .parameters
                    .iter()
                    .map(|b| format!("{:#04x}", b))
                    .collect();
                format!("CommandAction::Fixed(&[{}])", bytes.join(", "))
            }
            other => format!("CommandAction::{}", other.variant()),
        };
        writeln!(buffer, "\tCommandDescriptor {{")?;
        writeln!(buffer, "\t\tid: {:#06x},", command.id)?;
        writeln!(buffer, "\t\tname: \"{}\",", command.name)?;
        writeln!(buffer, "\t\taction: {},", action)?;
        writeln!(buffer, "\t}},")?;
    }
    writeln!(buffer, "];")?;
    writeln!(buffer)?;
    Ok(())
}
