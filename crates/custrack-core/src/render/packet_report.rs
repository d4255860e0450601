//! Support packet summary posted back to the upload thread.

use crate::model::{ConfigValues, PacketValues, PluginValues};

/// Rows of the configuration table: label and JSON pointer
const CONFIG_FLAGS: &[(&str, &str)] = &[
    ("High Availability", "/ClusterSettings/Enable"),
    ("SAML", "/SamlSettings/Enable"),
    ("LDAP", "/LdapSettings/Enable"),
    ("LDAP Groups", "/LdapSettings/GroupFilter"),
    ("Elasticsearch Search", "/ElasticsearchSettings/EnableSearching"),
    (
        "Elasticsearch Autocomplete",
        "/ElasticsearchSettings/EnableAutocomplete",
    ),
];

/// Render the report for whichever documents the archive contained
///
/// Sections for absent documents are omitted entirely.
pub fn render_packet_report(
    packet: Option<&PacketValues>,
    config: Option<&ConfigValues>,
    plugins: Option<&PluginValues>,
) -> String {
    let mut sections = Vec::new();

    if let Some(packet) = packet {
        sections.push(render_packet(packet));
    }
    if let Some(config) = config {
        sections.push(render_config(config));
    }
    if let Some(plugins) = plugins {
        sections.push(render_plugins(plugins));
    }

    if sections.is_empty() {
        return "_No support packet documents were found in this archive._\n".to_string();
    }
    sections.join("\n")
}

fn render_packet(packet: &PacketValues) -> String {
    let rows: [(&str, String); 9] = [
        ("Licensed To", packet.licensed_to.clone()),
        ("Active Users", packet.active_users.to_string()),
        ("Daily Active Users", packet.daily_active_users.to_string()),
        ("Monthly Active Users", packet.monthly_active_users.to_string()),
        ("Server Arch", packet.server_arch.clone()),
        ("Server OS", packet.server_os.clone()),
        ("Server Version", packet.version.clone()),
        ("Database Type", packet.database_type.clone()),
        ("Database Version", packet.database_version.clone()),
    ];

    let mut out = String::from("## Support Packet Values\n");
    out.push_str("| Key | Value |\n| --- | --- |\n");
    for (key, value) in rows {
        out.push_str(&format!("| {} | {} |\n", key, cell(&value)));
    }
    out
}

fn render_config(config: &ConfigValues) -> String {
    let mut out = String::from("## Config Values\n");
    out.push_str("| Key | Value |\n| --- | --- |\n");
    for (label, pointer) in CONFIG_FLAGS {
        let value = match config.as_value().pointer(pointer) {
            Some(serde_json::Value::Bool(b)) => b.to_string(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => "-".to_string(),
            Some(other) => other.to_string(),
        };
        out.push_str(&format!("| {} | {} |\n", label, cell(&value)));
    }
    out
}

fn render_plugins(plugins: &PluginValues) -> String {
    let mut out = String::from("## Plugin Info\n");

    out.push_str("### Active\n");
    plugin_table(&mut out, plugins.active().collect());

    out.push_str("\n### Inactive\n");
    plugin_table(&mut out, plugins.inactive().collect());
    out
}

fn plugin_table(out: &mut String, plugins: Vec<&crate::model::PluginValue>) {
    if plugins.is_empty() {
        out.push_str("_None_\n");
        return;
    }
    out.push_str("| Plugin Name | Plugin ID | Version |\n| --- | --- | --- |\n");
    for plugin in plugins {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            cell(&plugin.name),
            cell(&plugin.plugin_id),
            cell(&plugin.version)
        ));
    }
}

/// Keep table cells on one line and stop `|` from opening a new column
fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace(&['\r', '\n'][..], " ")
}
