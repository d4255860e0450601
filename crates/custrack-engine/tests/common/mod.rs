#![allow(dead_code)]

use custrack_core::errors::ExError;
use custrack_engine::ingest::platform::external_service_error;
use custrack_engine::ingest::{AttachmentInfo, InboundMessage, MessagePlatform};
use custrack_engine::{CustomerService, EngineSettings};
use custrack_store::Database;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Write};
use std::sync::Mutex;
use zip::write::SimpleFileOptions;

pub const BOT_USER: &str = "bot-user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPost {
    pub channel_id: String,
    /// None for standalone posts
    pub root_id: Option<String>,
    pub message: String,
}

/// In-memory platform that records every post
#[derive(Default)]
pub struct RecordingPlatform {
    files: HashMap<String, (AttachmentInfo, Vec<u8>)>,
    broken_info: HashSet<String>,
    deleted_roots: HashSet<String>,
    posts: Mutex<Vec<RecordedPost>>,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, id: &str, name: &str, mime_type: &str, bytes: Vec<u8>) -> Self {
        let info = AttachmentInfo {
            id: id.to_string(),
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            size: bytes.len() as u64,
        };
        self.files.insert(id.to_string(), (info, bytes));
        self
    }

    pub fn with_broken_info(mut self, id: &str) -> Self {
        self.broken_info.insert(id.to_string());
        self
    }

    pub fn with_deleted_root(mut self, root_id: &str) -> Self {
        self.deleted_roots.insert(root_id.to_string());
        self
    }

    pub fn posts(&self) -> Vec<RecordedPost> {
        self.posts.lock().unwrap().clone()
    }
}

impl MessagePlatform for RecordingPlatform {
    fn attachment_info(&self, file_id: &str) -> Result<AttachmentInfo, ExError> {
        if self.broken_info.contains(file_id) {
            return Err(external_service_error("attachment_info", "lookup failed"));
        }
        self.files
            .get(file_id)
            .map(|(info, _)| info.clone())
            .ok_or_else(|| external_service_error("attachment_info", "no such file"))
    }

    fn attachment_bytes(&self, file_id: &str) -> Result<Vec<u8>, ExError> {
        self.files
            .get(file_id)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| external_service_error("attachment_bytes", "no such file"))
    }

    fn post_reply(&self, channel_id: &str, root_id: &str, message: &str) -> Result<(), ExError> {
        let root_id = if self.deleted_roots.contains(root_id) {
            None
        } else {
            Some(root_id.to_string())
        };
        self.posts.lock().unwrap().push(RecordedPost {
            channel_id: channel_id.to_string(),
            root_id,
            message: message.to_string(),
        });
        Ok(())
    }

    fn post_message(&self, channel_id: &str, message: &str) -> Result<(), ExError> {
        self.posts.lock().unwrap().push(RecordedPost {
            channel_id: channel_id.to_string(),
            root_id: None,
            message: message.to_string(),
        });
        Ok(())
    }

    fn is_self_authored(&self, message: &InboundMessage) -> bool {
        message.user_id == BOT_USER
    }
}

pub fn build_zip(files: &[(&str, String)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in files {
        writer
            .start_file(name.to_string(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn packet_yaml(licensed_to: &str, site_url: &str, active_users: i64) -> String {
    format!(
        "license_to: {licensed_to}\nsite_url: {site_url}\nserver_os: linux\n\
         server_architecture: amd64\nserver_version: 9.5.0\ndatabase_type: postgres\n\
         database_version: \"14.2\"\nactive_users: {active_users}\n"
    )
}

pub fn config_json(site_url: &str) -> String {
    json!({
        "ServiceSettings": {"SiteURL": site_url},
        "ClusterSettings": {"Enable": false},
        "SamlSettings": {"Enable": true},
        "LdapSettings": {"Enable": false, "GroupFilter": ""}
    })
    .to_string()
}

pub fn plugins_json() -> String {
    json!({
        "active": [{"id": "jira", "name": "Jira", "version": "4.0.0"}],
        "inactive": [{"id": "zoom", "name": "Zoom", "version": "1.6.0"}]
    })
    .to_string()
}

pub fn full_packet_zip(licensed_to: &str, site_url: &str, active_users: i64) -> Vec<u8> {
    build_zip(&[
        (
            "support_packet/support_packet.yaml",
            packet_yaml(licensed_to, site_url, active_users),
        ),
        ("support_packet/sanitized_config.json", config_json(site_url)),
        ("support_packet/plugins.json", plugins_json()),
    ])
}

pub fn message(id: &str, file_ids: &[&str]) -> InboundMessage {
    InboundMessage {
        id: id.to_string(),
        channel_id: "channel-1".to_string(),
        user_id: "user-1".to_string(),
        root_id: String::new(),
        file_ids: file_ids.iter().map(|f| f.to_string()).collect(),
    }
}

pub fn service() -> CustomerService {
    CustomerService::new(Database::open_in_memory().unwrap())
}

pub fn settings() -> EngineSettings {
    EngineSettings::default()
}
