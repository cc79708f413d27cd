use crate::import::ImportReport;
use owo_colors::OwoColorize;
use std::path::Path;

pub struct ImportSummary {
    pub prefix: String,
    pub message: String,
    /// キャッシュとステートファイルの位置
    pub detail: String,
}

impl ImportSummary {
    /// `root` からの相対パスで成功メッセージを組み立てる
    pub fn from_report(report: &ImportReport, root: &Path) -> Self {
        let relative = |path: &Path| {
            path.strip_prefix(root)
                .unwrap_or(path)
                .display()
                .to_string()
        };
        let commit: String = report.record.commit.chars().take(7).collect();

        Self {
            prefix: "✓".green().to_string(),
            message: format!(
                "Imported {} -> {} ({} bytes, commit {})",
                report.source.display_ref(),
                relative(&report.link.link_path).cyan(),
                report.fetched.bytes,
                commit
            ),
            detail: format!(
                "  link target {}, state {}",
                report.link.target.display(),
                relative(&report.layout.state_record_path)
            )
            .dimmed()
            .to_string(),
        }
    }
}
