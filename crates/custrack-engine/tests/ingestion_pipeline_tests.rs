// Integration tests for the support packet ingestion pipeline

mod common;

use common::*;
use custrack_core::model::{CustomerFilter, SubRecordKind};
use custrack_core::ExErrorKind;
use custrack_engine::ingest::{IgnoreReason, IngestionOutcome, IngestionState, PacketIngestor};
use custrack_engine::EngineSettings;
use custrack_store::identity::ResolutionOutcome;

fn processed(outcome: IngestionOutcome) -> Vec<custrack_engine::ingest::AttachmentOutcome> {
    match outcome {
        IngestionOutcome::Processed(outcomes) => outcomes,
        IngestionOutcome::Ignored(reason) => panic!("message unexpectedly ignored: {:?}", reason),
    }
}

#[test]
fn test_full_packet_creates_customer_and_replies() {
    // Given: a post with one complete support packet
    let platform = RecordingPlatform::new().with_file(
        "f1",
        "packet.zip",
        "application/zip",
        full_packet_zip("Acme Corp", "https://acme.example", 120),
    );
    let service = service();
    let ingestor = PacketIngestor::new(platform, service.clone(), settings());

    // When: the message is handled
    let outcomes = processed(ingestor.handle_message(&message("post-1", &["f1"])));

    // Then: the attachment went all the way through
    assert_eq!(outcomes.len(), 1);
    let outcome = &outcomes[0];
    assert!(outcome.succeeded(), "error: {:?}", outcome.error);
    assert_eq!(outcome.state, IngestionState::Done);
    assert_eq!(
        outcome.persisted,
        vec![SubRecordKind::Packet, SubRecordKind::Config, SubRecordKind::Plugins]
    );
    assert_eq!(
        outcome.resolution.as_ref().map(|r| r.outcome.clone()),
        Some(ResolutionOutcome::Created)
    );

    // And: the customer carries every snapshot
    let full = service.get_customer(outcome.customer_id().unwrap()).unwrap();
    assert_eq!(full.customer.licensed_to, "Acme Corp");
    assert_eq!(full.customer.site_url, "https://acme.example");
    assert_eq!(full.packet.active_users, 120);
    assert_eq!(full.config.site_url(), Some("https://acme.example"));
    assert_eq!(full.plugins.len(), 2);

    // And: an acknowledgement then a report were posted in the thread
    let posts = ingestor.platform().posts();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].message, "Uploading support packet for packet.zip");
    assert!(posts.iter().all(|p| p.root_id.as_deref() == Some("post-1")));
    assert!(posts[1].message.contains("## Support Packet Values"));
    assert!(posts[1].message.contains("| Active Users | 120 |"));
    assert!(posts[1].message.contains("## Plugin Info"));
}

#[test]
fn test_reupload_updates_same_customer() {
    let platform = RecordingPlatform::new()
        .with_file("f1", "a.zip", "", full_packet_zip("Acme", "https://acme.example", 10))
        .with_file("f2", "b.zip", "", full_packet_zip("Acme", "https://acme.example", 15));
    let service = service();
    let ingestor = PacketIngestor::new(platform, service.clone(), settings());

    let first = processed(ingestor.handle_message(&message("post-1", &["f1"])));
    let second = processed(ingestor.handle_message(&message("post-2", &["f2"])));

    assert_eq!(first[0].customer_id(), second[0].customer_id());
    let id = second[0].customer_id().unwrap();
    assert_eq!(service.get_customer(id).unwrap().packet.active_users, 15);

    let history = service.customer_history(id).unwrap();
    assert_eq!(history.packets.len(), 2);
    let packet_audits: Vec<_> = history
        .audit
        .iter()
        .filter(|a| a.sub_record == SubRecordKind::Packet)
        .collect();
    assert_eq!(packet_audits.len(), 2);
    assert_eq!(packet_audits[0].diff.len(), 1);
    assert!(packet_audits[0].diff.find("activeUsers").is_some());
    assert!(packet_audits.iter().all(|a| a.updated_by.is_empty()));
}

#[test]
fn test_telemetry_only_archive_persists_packet() {
    let zip = build_zip(&[(
        "support_packet.yaml",
        packet_yaml("Solo", "https://solo.example", 3),
    )]);
    let platform = RecordingPlatform::new().with_file("f1", "solo.zip", "", zip);
    let service = service();
    let ingestor = PacketIngestor::new(platform, service.clone(), settings());

    let outcomes = processed(ingestor.handle_message(&message("post-1", &["f1"])));

    assert!(outcomes[0].succeeded());
    assert_eq!(outcomes[0].persisted, vec![SubRecordKind::Packet]);
    let full = service.get_customer(outcomes[0].customer_id().unwrap()).unwrap();
    assert!(full.config.is_empty());
    assert!(full.plugins.is_empty());

    let report = &ingestor.platform().posts()[1].message;
    assert!(report.contains("## Support Packet Values"));
    assert!(!report.contains("## Config Values"));
    assert!(!report.contains("## Plugin Info"));
}

#[test]
fn test_archive_without_telemetry_only_reports() {
    let zip = build_zip(&[("plugins.json", plugins_json())]);
    let platform = RecordingPlatform::new().with_file("f1", "plugins.zip", "", zip);
    let service = service();
    let ingestor = PacketIngestor::new(platform, service.clone(), settings());

    let outcomes = processed(ingestor.handle_message(&message("post-1", &["f1"])));

    assert!(outcomes[0].succeeded());
    assert!(outcomes[0].resolution.is_none());
    assert!(outcomes[0].persisted.is_empty());
    assert_eq!(
        service
            .list_customers(&CustomerFilter::default())
            .unwrap()
            .total_count,
        0
    );
    assert!(ingestor.platform().posts()[1].message.contains("## Plugin Info"));
}

#[test]
fn test_config_site_url_drives_resolution() {
    let zip = build_zip(&[
        ("support_packet.yaml", packet_yaml("Acme", "https://stale.example", 1)),
        ("sanitized_config.json", config_json("https://current.example")),
    ]);
    let platform = RecordingPlatform::new().with_file("f1", "p.zip", "", zip);
    let service = service();
    let ingestor = PacketIngestor::new(platform, service.clone(), settings());

    let outcomes = processed(ingestor.handle_message(&message("post-1", &["f1"])));

    let full = service.get_customer(outcomes[0].customer_id().unwrap()).unwrap();
    assert_eq!(full.customer.site_url, "https://current.example");
}

#[test]
fn test_bad_archive_does_not_block_sibling() {
    let platform = RecordingPlatform::new()
        .with_file("bad", "broken.zip", "application/zip", b"definitely not a zip".to_vec())
        .with_file("good", "good.zip", "", full_packet_zip("Acme", "https://acme.example", 7));
    let ingestor = PacketIngestor::new(platform, service(), settings());

    let outcomes = processed(ingestor.handle_message(&message("post-1", &["bad", "good"])));

    assert_eq!(outcomes.len(), 2);
    let bad = &outcomes[0];
    assert_eq!(bad.state, IngestionState::Extracting);
    assert_eq!(bad.error.as_ref().map(|e| e.kind()), Some(ExErrorKind::Parse));
    assert!(outcomes[1].succeeded());

    // Acknowledgement names both; only the good archive gets a report
    let posts = ingestor.platform().posts();
    assert_eq!(posts[0].message, "Uploading support packet for broken.zip, good.zip");
    assert_eq!(posts.len(), 2);
}

#[test]
fn test_malformed_member_fails_in_parsing() {
    let zip = build_zip(&[
        ("support_packet.yaml", packet_yaml("Acme", "https://acme.example", 1)),
        ("plugins.json", "{ not json".to_string()),
    ]);
    let platform = RecordingPlatform::new().with_file("f1", "p.zip", "", zip);
    let service = service();
    let ingestor = PacketIngestor::new(platform, service.clone(), settings());

    let outcomes = processed(ingestor.handle_message(&message("post-1", &["f1"])));

    assert_eq!(outcomes[0].state, IngestionState::Parsing);
    assert_eq!(
        outcomes[0].error.as_ref().map(|e| e.kind()),
        Some(ExErrorKind::Parse)
    );
    // Nothing persisted when any document fails to decode
    assert_eq!(
        service
            .list_customers(&CustomerFilter::default())
            .unwrap()
            .total_count,
        0
    );
}

#[test]
fn test_oversized_attachment_rejected_before_download() {
    let platform = RecordingPlatform::new().with_file(
        "f1",
        "big.zip",
        "",
        full_packet_zip("Acme", "https://acme.example", 1),
    );
    let settings = EngineSettings {
        max_archive_bytes: 16,
        ..EngineSettings::default()
    };
    let ingestor = PacketIngestor::new(platform, service(), settings);

    let outcomes = processed(ingestor.handle_message(&message("post-1", &["f1"])));

    assert_eq!(
        outcomes[0].error.as_ref().map(|e| e.kind()),
        Some(ExErrorKind::InvalidArgument)
    );
}

#[test]
fn test_zip_detected_by_mime_type() {
    let platform = RecordingPlatform::new().with_file(
        "f1",
        "upload.bin",
        "application/x-zip-compressed",
        full_packet_zip("Acme", "https://acme.example", 1),
    );
    let ingestor = PacketIngestor::new(platform, service(), settings());

    let outcomes = processed(ingestor.handle_message(&message("post-1", &["f1"])));
    assert!(outcomes[0].succeeded());
}

#[test]
fn test_failed_lookup_is_skipped() {
    let platform = RecordingPlatform::new()
        .with_file("f1", "p.zip", "", full_packet_zip("Acme", "https://acme.example", 1))
        .with_broken_info("f0");
    let ingestor = PacketIngestor::new(platform, service(), settings());

    let outcomes = processed(ingestor.handle_message(&message("post-1", &["f0", "f1"])));
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].file_id, "f1");
}

#[test]
fn test_ignored_messages() {
    let platform = RecordingPlatform::new()
        .with_file("f1", "p.zip", "", full_packet_zip("Acme", "https://acme.example", 1))
        .with_file("txt", "notes.txt", "text/plain", b"hello".to_vec());
    let ingestor = PacketIngestor::new(platform, service(), settings());

    let mut own = message("post-1", &["f1"]);
    own.user_id = BOT_USER.to_string();
    let mut reply = message("post-2", &["f1"]);
    reply.root_id = "post-0".to_string();

    let cases = [
        (own, IgnoreReason::SelfAuthored),
        (reply, IgnoreReason::ThreadReply),
        (message("post-3", &[]), IgnoreReason::NoAttachments),
        (message("post-4", &["txt"]), IgnoreReason::NoArchive),
    ];
    for (msg, expected) in cases {
        match ingestor.handle_message(&msg) {
            IngestionOutcome::Ignored(reason) => assert_eq!(reason, expected),
            other => panic!("expected {:?}, got {:?}", expected, other),
        }
    }
    assert!(ingestor.platform().posts().is_empty());
}

#[test]
fn test_reply_to_deleted_root_becomes_standalone() {
    let platform = RecordingPlatform::new()
        .with_file("f1", "p.zip", "", full_packet_zip("Acme", "https://acme.example", 1))
        .with_deleted_root("post-1");
    let ingestor = PacketIngestor::new(platform, service(), settings());

    processed(ingestor.handle_message(&message("post-1", &["f1"])));

    let posts = ingestor.platform().posts();
    assert_eq!(posts.len(), 2);
    assert!(posts.iter().all(|p| p.root_id.is_none()));
}
