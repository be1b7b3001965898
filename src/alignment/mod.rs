/*!
 * Alignment verification and repair.
 *
 * The verifier compares source and translation paragraph counts for every
 * stored chapter and scans the first and last paragraph of each side for
 * contamination signatures. Repair overrides one translation paragraph and
 * only writes when the counts match afterwards.
 */

pub mod contamination;
pub mod repair;
pub mod verifier;

pub use repair::{apply_repair, repair_translation};
pub use verifier::{verify_chapter, verify_records, verify_store, AlignmentIssue, IssueKind, TextSummary};

/// Human-readable verification report
pub fn render_verification(summaries: &[TextSummary], issues: &[AlignmentIssue]) -> String {
    let mut out = String::from("=== TEXT SUMMARY ===\n\n");
    for summary in summaries {
        out.push_str(&format!("{}\n", summary));
    }

    if issues.is_empty() {
        out.push_str("\n✅ NO ISSUES FOUND - All texts are clean and aligned!\n");
    } else {
        out.push_str("\n=== ISSUES FOUND ===\n\n");
        for issue in issues {
            out.push_str(&format!("{}\n", issue));
        }
    }

    out.push_str("\n=== VERIFICATION COMPLETE ===\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_verification_withoutIssues_shouldPrintBanner() {
        let summaries = vec![TextSummary {
            slug: "demo".to_string(),
            chapters: 2,
            aligned: 2,
            issues: 0,
        }];
        let report = render_verification(&summaries, &[]);
        assert!(report.contains("✅ demo: 2 chapters, 2 aligned, 0 issues"));
        assert!(report.contains("NO ISSUES FOUND"));
        assert!(report.ends_with("=== VERIFICATION COMPLETE ===\n"));
    }

    #[test]
    fn test_render_verification_withIssues_shouldListThem() {
        let issue = AlignmentIssue {
            text: "demo".to_string(),
            chapter: 4,
            kind: IssueKind::Alignment,
            details: "Source: 12, Translation: 11".to_string(),
        };
        let report = render_verification(&[], &[issue]);
        assert!(report.contains("=== ISSUES FOUND ==="));
        assert!(report.contains("demo/chapter-004 [alignment]: Source: 12, Translation: 11"));
    }
}
