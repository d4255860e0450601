//! Engine-level write commands.
//!
//! A serializable envelope over the [`CustomerService`] write operations, so
//! callers (the CLI, a future HTTP layer) can dispatch through one entry point.

use crate::commands::customer_service::CustomerService;
use custrack_core::model::{ConfigValues, CustomerFull, CustomerPatch, PacketValues, PluginValues};
use custrack_store::errors::Result;
use custrack_store::identity::Resolution;
use serde::{Deserialize, Serialize};

/// Engine-level commands that write to the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EngineCommand {
    ResolveCustomer {
        site_url: String,
        licensed_to: String,
    },
    UpdateCustomer {
        customer_id: String,
        actor: String,
        patch: CustomerPatch,
    },
    UpdatePacket {
        customer_id: String,
        actor: String,
        packet: PacketValues,
    },
    UpdateConfig {
        customer_id: String,
        actor: String,
        config: ConfigValues,
    },
    UpdatePlugins {
        customer_id: String,
        actor: String,
        plugins: PluginValues,
    },
}

/// Result of applying an engine command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EngineCommandResult {
    Resolved(Resolution),
    Customer(Box<CustomerFull>),
}

/// Apply an engine command through the service
///
/// # Errors
///
/// Whatever the underlying service operation returns.
pub fn apply_engine_command(
    cmd: EngineCommand,
    service: &CustomerService,
) -> Result<EngineCommandResult> {
    let full = match cmd {
        EngineCommand::ResolveCustomer {
            site_url,
            licensed_to,
        } => {
            return service
                .resolve_customer(&site_url, &licensed_to)
                .map(EngineCommandResult::Resolved);
        }
        EngineCommand::UpdateCustomer {
            customer_id,
            actor,
            patch,
        } => service.update_customer(&customer_id, &actor, &patch)?,
        EngineCommand::UpdatePacket {
            customer_id,
            actor,
            packet,
        } => service.update_packet(&customer_id, &actor, &packet)?,
        EngineCommand::UpdateConfig {
            customer_id,
            actor,
            config,
        } => service.update_config(&customer_id, &actor, &config)?,
        EngineCommand::UpdatePlugins {
            customer_id,
            actor,
            plugins,
        } => service.update_plugins(&customer_id, &actor, &plugins)?,
    };
    Ok(EngineCommandResult::Customer(Box::new(full)))
}
