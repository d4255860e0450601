//! Markdown rendering for chat replies.

pub mod packet_report;

pub use packet_report::render_packet_report;
