//! Local support packet ingestion
//!
//! Runs an archive from disk through the same pipeline chat uploads use. The
//! "channel" is stdout: acknowledgements and reports are printed as posts.

use super::{CliResult, Context};
use clap::Args;
use custrack_core::ExError;
use custrack_engine::ingest::platform::external_service_error;
use custrack_engine::ingest::{
    AttachmentInfo, InboundMessage, IngestionOutcome, MessagePlatform, PacketIngestor,
};
use std::path::PathBuf;

const LOCAL_USER: &str = "local";
const SELF_USER: &str = "custrack";
const FILE_ID: &str = "local-file";

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Support packet archive (.zip)
    pub archive: PathBuf,

    /// Channel name used in printed posts
    #[arg(long, default_value = "local")]
    pub channel: String,
}

/// Platform backed by a single file on disk
pub struct LocalFilePlatform {
    path: PathBuf,
}

impl LocalFilePlatform {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn check_id(&self, op: &str, file_id: &str) -> Result<(), ExError> {
        if file_id == FILE_ID {
            Ok(())
        } else {
            Err(external_service_error(op, format!("unknown file {}", file_id)))
        }
    }
}

impl MessagePlatform for LocalFilePlatform {
    fn attachment_info(&self, file_id: &str) -> Result<AttachmentInfo, ExError> {
        self.check_id("attachment_info", file_id)?;
        let meta = std::fs::metadata(&self.path)
            .map_err(|e| external_service_error("attachment_info", e.to_string()))?;
        let name = self.file_name();
        let mime_type = if name.to_ascii_lowercase().ends_with(".zip") {
            "application/zip"
        } else {
            "application/octet-stream"
        };
        Ok(AttachmentInfo {
            id: FILE_ID.to_string(),
            name,
            mime_type: mime_type.to_string(),
            size: meta.len(),
        })
    }

    fn attachment_bytes(&self, file_id: &str) -> Result<Vec<u8>, ExError> {
        self.check_id("attachment_bytes", file_id)?;
        std::fs::read(&self.path)
            .map_err(|e| external_service_error("attachment_bytes", e.to_string()))
    }

    // There is no thread on stdout, so replies and posts print the same way
    fn post_reply(&self, channel_id: &str, _root_id: &str, message: &str) -> Result<(), ExError> {
        self.post_message(channel_id, message)
    }

    fn post_message(&self, channel_id: &str, message: &str) -> Result<(), ExError> {
        println!("[{}] {}", channel_id, message);
        Ok(())
    }

    fn is_self_authored(&self, message: &InboundMessage) -> bool {
        message.user_id == SELF_USER
    }
}

pub fn execute(ctx: &Context, args: IngestArgs) -> CliResult {
    if !args.archive.is_file() {
        return Err(format!("archive not found: {}", args.archive.display()).into());
    }

    let service = ctx.service()?;
    let ingestor = PacketIngestor::new(
        LocalFilePlatform::new(args.archive),
        service,
        ctx.settings.clone(),
    );
    let message = InboundMessage {
        id: "local-message".to_string(),
        channel_id: args.channel,
        user_id: LOCAL_USER.to_string(),
        root_id: String::new(),
        file_ids: vec![FILE_ID.to_string()],
    };

    match ingestor.handle_message(&message) {
        IngestionOutcome::Ignored(reason) => {
            Err(format!("archive ignored: {:?}", reason).into())
        }
        IngestionOutcome::Processed(outcomes) => {
            let mut failed = 0;
            for outcome in &outcomes {
                match (&outcome.error, outcome.customer_id()) {
                    (Some(err), _) => {
                        failed += 1;
                        eprintln!("{}: failed while {:?}: {}", outcome.name, outcome.state, err);
                    }
                    (None, Some(customer_id)) => {
                        let written: Vec<&str> =
                            outcome.persisted.iter().map(|k| k.as_str()).collect();
                        println!(
                            "{}: customer {} ({})",
                            outcome.name,
                            customer_id,
                            written.join(", ")
                        );
                    }
                    (None, None) => println!("{}: no matching keys, nothing stored", outcome.name),
                }
            }
            if failed > 0 {
                return Err(format!("{} attachment(s) failed", failed).into());
            }
            Ok(())
        }
    }
}
