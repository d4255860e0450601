//! Per-message ingestion state machine
//!
//! ```text
//! Idle -> Detecting -> Extracting -> Parsing -> Resolving -> Persisting -> Reporting -> Done
//!            \-> Ignored
//! ```
//!
//! Detection runs once per message; every candidate attachment then walks the
//! remaining states on its own, so one bad archive does not stop its siblings.

use super::archive::ExtractedArchive;
use super::payload::ParsedPacket;
use super::platform::{AttachmentInfo, InboundMessage, MessagePlatform};
use crate::commands::customer_service::CustomerService;
use crate::settings::EngineSettings;
use custrack_core::errors::{CustrackError, ExError};
use custrack_core::model::SubRecordKind;
use custrack_core::render::render_packet_report;
use custrack_core::{log_op_end, log_op_start};
use custrack_core_types::RequestContext;
use custrack_store::identity::Resolution;
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestionState {
    Idle,
    Detecting,
    Extracting,
    Parsing,
    Resolving,
    Persisting,
    Reporting,
    Done,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    SelfAuthored,
    ThreadReply,
    NoAttachments,
    /// Attachments present but none looked like a zip archive
    NoArchive,
}

/// What happened to one candidate attachment
#[derive(Debug, Clone)]
pub struct AttachmentOutcome {
    pub file_id: String,
    pub name: String,
    /// `Done` on success, otherwise the state the failure happened in
    pub state: IngestionState,
    pub resolution: Option<Resolution>,
    /// Sub-records written, in write order
    pub persisted: Vec<SubRecordKind>,
    pub error: Option<ExError>,
}

impl AttachmentOutcome {
    fn new(info: &AttachmentInfo) -> Self {
        Self {
            file_id: info.id.clone(),
            name: info.name.clone(),
            state: IngestionState::Detecting,
            resolution: None,
            persisted: Vec::new(),
            error: None,
        }
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.resolution.as_ref().map(|r| r.customer_id.as_str())
    }

    pub fn succeeded(&self) -> bool {
        self.state == IngestionState::Done && self.error.is_none()
    }

    fn advance(&mut self, next: IngestionState) {
        tracing::debug!(
            file_id = %self.file_id,
            from = ?self.state,
            to = ?next,
            "ingestion state"
        );
        self.state = next;
    }
}

#[derive(Debug, Clone)]
pub enum IngestionOutcome {
    Ignored(IgnoreReason),
    Processed(Vec<AttachmentOutcome>),
}

impl IngestionOutcome {
    pub fn attachments(&self) -> &[AttachmentOutcome] {
        match self {
            IngestionOutcome::Ignored(_) => &[],
            IngestionOutcome::Processed(outcomes) => outcomes,
        }
    }
}

/// Acknowledgement posted before any archive is processed
pub fn acknowledgement_message(names: &[&str]) -> String {
    format!("Uploading support packet for {}", names.join(", "))
}

/// Turns support packet uploads into customer snapshot updates
pub struct PacketIngestor<P: MessagePlatform> {
    platform: P,
    service: CustomerService,
    settings: EngineSettings,
}

impl<P: MessagePlatform> PacketIngestor<P> {
    pub fn new(platform: P, service: CustomerService, settings: EngineSettings) -> Self {
        Self {
            platform,
            service,
            settings,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Process one inbound message
    ///
    /// Never fails: per-attachment errors are logged and carried in the
    /// returned outcome.
    pub fn handle_message(&self, message: &InboundMessage) -> IngestionOutcome {
        let ctx = RequestContext::for_message(&message.id);
        log_op_start!(
            "ingest_message",
            message_id = message.id.as_str(),
            request_id = ctx.request_id.as_str(),
            trace_id = ctx.trace_str()
        );
        let start = Instant::now();

        let outcome = match self.ignore_reason(message) {
            Some(reason) => IngestionOutcome::Ignored(reason),
            None => {
                let candidates = self.detect(message);
                if candidates.is_empty() {
                    IngestionOutcome::Ignored(IgnoreReason::NoArchive)
                } else {
                    self.acknowledge(message, &candidates);
                    IngestionOutcome::Processed(
                        candidates
                            .iter()
                            .map(|info| self.process_attachment(message, info))
                            .collect(),
                    )
                }
            }
        };

        match &outcome {
            IngestionOutcome::Ignored(reason) => {
                tracing::debug!(message_id = %message.id, reason = ?reason, "message ignored");
                log_op_end!(
                    "ingest_message",
                    duration_ms = start.elapsed().as_millis() as u64,
                    message_id = message.id.as_str(),
                    request_id = ctx.request_id.as_str(),
                    ignored = true
                );
            }
            IngestionOutcome::Processed(outcomes) => {
                let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
                log_op_end!(
                    "ingest_message",
                    duration_ms = start.elapsed().as_millis() as u64,
                    message_id = message.id.as_str(),
                    request_id = ctx.request_id.as_str(),
                    attachment_count = outcomes.len(),
                    failed_count = failed
                );
            }
        }
        outcome
    }

    fn ignore_reason(&self, message: &InboundMessage) -> Option<IgnoreReason> {
        if self.platform.is_self_authored(message) {
            Some(IgnoreReason::SelfAuthored)
        } else if message.is_reply() {
            Some(IgnoreReason::ThreadReply)
        } else if message.file_ids.is_empty() {
            Some(IgnoreReason::NoAttachments)
        } else {
            None
        }
    }

    fn detect(&self, message: &InboundMessage) -> Vec<AttachmentInfo> {
        tracing::debug!(
            message_id = %message.id,
            from = ?IngestionState::Idle,
            to = ?IngestionState::Detecting,
            "ingestion state"
        );
        message
            .file_ids
            .iter()
            .filter_map(|file_id| match self.platform.attachment_info(file_id) {
                Ok(info) => Some(info),
                Err(e) => {
                    tracing::warn!(
                        file_id = %file_id,
                        error = %e,
                        "attachment lookup failed, skipping"
                    );
                    None
                }
            })
            .filter(|info| self.is_archive(info))
            .collect()
    }

    fn is_archive(&self, info: &AttachmentInfo) -> bool {
        info.name.to_ascii_lowercase().ends_with(".zip")
            || self.settings.is_archive_mime(&info.mime_type)
    }

    fn acknowledge(&self, message: &InboundMessage, candidates: &[AttachmentInfo]) {
        let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
        if let Err(e) = self.platform.post_reply(
            &message.channel_id,
            &message.id,
            &acknowledgement_message(&names),
        ) {
            tracing::warn!(message_id = %message.id, error = %e, "acknowledgement failed");
        }
    }

    fn process_attachment(
        &self,
        message: &InboundMessage,
        info: &AttachmentInfo,
    ) -> AttachmentOutcome {
        let mut outcome = AttachmentOutcome::new(info);
        match self.run_attachment(message, info, &mut outcome) {
            Ok(()) => outcome.advance(IngestionState::Done),
            Err(e) => {
                tracing::warn!(
                    file_id = %info.id,
                    state = ?outcome.state,
                    err_code = e.code(),
                    error = %e,
                    "attachment failed"
                );
                outcome.error = Some(e);
            }
        }
        outcome
    }

    fn run_attachment(
        &self,
        message: &InboundMessage,
        info: &AttachmentInfo,
        outcome: &mut AttachmentOutcome,
    ) -> Result<(), ExError> {
        outcome.advance(IngestionState::Extracting);
        let limit = self.settings.max_archive_bytes;
        if info.size > limit {
            return Err(CustrackError::ArchiveTooLarge {
                name: info.name.clone(),
                size: info.size,
                limit,
            }
            .into());
        }
        let bytes = self.platform.attachment_bytes(&info.id)?;
        let archive = ExtractedArchive::extract(&info.name, &bytes, limit)?;

        outcome.advance(IngestionState::Parsing);
        let parsed = ParsedPacket::from_archive(&archive)?;

        if let Some((site_url, licensed_to)) = parsed.match_keys() {
            outcome.advance(IngestionState::Resolving);
            let resolution = self.service.resolve_customer(&site_url, &licensed_to)?;
            let customer_id = resolution.customer_id.clone();
            outcome.resolution = Some(resolution);

            outcome.advance(IngestionState::Persisting);
            if let Some(packet) = &parsed.packet {
                self.service.update_packet(&customer_id, "", packet)?;
                outcome.persisted.push(SubRecordKind::Packet);
            }
            if let Some(config) = &parsed.config {
                self.service.update_config(&customer_id, "", config)?;
                outcome.persisted.push(SubRecordKind::Config);
            }
            if let Some(plugins) = &parsed.plugins {
                self.service.update_plugins(&customer_id, "", plugins)?;
                outcome.persisted.push(SubRecordKind::Plugins);
            }
        } else {
            tracing::debug!(file_id = %info.id, "no telemetry in archive, nothing persisted");
        }

        outcome.advance(IngestionState::Reporting);
        let report = render_packet_report(
            parsed.packet.as_ref(),
            parsed.config.as_ref(),
            parsed.plugins.as_ref(),
        );
        self.platform
            .post_reply(&message.channel_id, &message.id, &report)
    }
}
