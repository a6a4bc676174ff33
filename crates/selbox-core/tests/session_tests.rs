//! Integration tests for the host session.

use selbox_core::{DEFAULT_SAMPLE, SandboxConfig, Session};
use selbox_dom::{DomTree, NodeId};
use selbox_html::{HtmlRenderer, Isolation};
use selbox_select::GenerateError;

/// Helper to collect each line's selector strings
fn selectors_per_line<R, G>(session: &Session<R, G>) -> Vec<Vec<String>>
where
    R: selbox_html::Renderer,
    G: selbox_select::SelectorGenerator,
{
    session
        .lines()
        .map(|line| line.selectors.iter().map(|t| t.selector.clone()).collect())
        .collect()
}

#[test]
fn test_new_session_is_empty() {
    let session = Session::new(SandboxConfig::default());
    assert_eq!(session.text(), "");
    assert_eq!(session.line_count(), 0);
    assert_eq!(session.lines().count(), 0);
    assert!(session.result().selectors_by_line.is_empty());
    assert_eq!(session.rendered().element_count(), 0);
}

#[test]
fn test_sample_session() {
    let session = Session::with_sample(SandboxConfig::default());
    assert_eq!(session.text(), DEFAULT_SAMPLE);
    assert_eq!(session.line_count(), 9);

    let lines: Vec<_> = session.lines().collect();
    assert_eq!(lines.len(), 9);
    assert_eq!(lines[0].text, "<div class=\"container\">");
    assert_eq!(lines[2].selectors[0].selector, "h1");
    assert!(lines[3].selectors.is_empty());
    assert_eq!(session.result().stats.mapped, 6);
}

#[test]
fn test_set_text_replaces_everything() {
    let mut session = Session::with_sample(SandboxConfig::default());
    let result = session.set_text("<em>a</em>\n<em>b</em>");
    assert_eq!(result.stats.mapped, 2);
    assert_eq!(
        selectors_per_line(&session),
        vec![vec![":nth-child(1)".to_string()], vec![":nth-child(2)".to_string()]]
    );
    assert_eq!(session.rendered().element_count(), 2);
}

#[test]
fn test_reformat_remaps_lines() {
    let mut session = Session::with_sample(SandboxConfig::default());
    let _ = session.reformat();
    assert_eq!(session.line_count(), 15);
    let lines: Vec<_> = session.lines().collect();
    assert_eq!(lines[6].text, "  <main>");
    assert_eq!(lines[6].selectors[0].selector, "main");
    assert_eq!(lines[7].selectors[0].selector, "p:nth-child(1)");
    assert_eq!(lines[10].selectors[0].selector, ":nth-of-type(2)");

    // Formatting is idempotent, so a second reformat changes nothing
    let before = session.text().to_string();
    let _ = session.reformat();
    assert_eq!(session.text(), before);
}

#[test]
fn test_reformat_uses_configured_indent() {
    let config = SandboxConfig {
        indent_size: 4,
        ..SandboxConfig::default()
    };
    let mut session = Session::new(config);
    let _ = session.set_text("<ul><li>x</li></ul>");
    let _ = session.reformat();
    assert_eq!(session.text(), "<ul>\n    <li>\n        x\n    </li>\n</ul>");
    assert_eq!(
        selectors_per_line(&session),
        vec![
            vec!["ul".to_string()],
            vec!["li".to_string()],
            vec![],
            vec![],
            vec![]
        ]
    );
}

#[test]
fn test_isolated_session() {
    let config = SandboxConfig {
        isolation: Isolation::Isolated,
        ..SandboxConfig::default()
    };
    let mut session = Session::new(config);
    let result = session.set_text("<p>x</p>");
    assert_eq!(result.stats.mapped, 1);
    assert_eq!(result.stats.unmapped, 3);
    assert_eq!(session.rendered().root, NodeId::ROOT);
}

#[test]
fn test_custom_generator_failures_are_counted() {
    let refuse = |_: &DomTree, element: NodeId, _: NodeId| -> Result<String, GenerateError> {
        Err(GenerateError::NotAnElement(element))
    };
    let mut session = Session::with_parts(
        HtmlRenderer::default(),
        refuse,
        SandboxConfig::default(),
    );
    let result = session.set_text("<p>a</p><p>b</p>");
    assert_eq!(result.stats.skipped, 2);
    assert!(result.selectors_by_line.is_empty());
    assert_eq!(session.lines().count(), 1);
}
