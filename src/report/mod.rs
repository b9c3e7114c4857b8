//! Report rendering.

mod generator;

pub use generator::{generate_json_report, generate_markdown_issue_list, generate_markdown_report};
