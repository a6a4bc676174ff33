//! The host session: raw text in, per-line selectors out.
//!
//! A session owns the text being edited and everything derived from it.
//! Every change runs one complete fresh pass (render, map, time); nothing is
//! carried over from the previous pass except the configuration.

use selbox_common::line_count;
use selbox_common::warning::{clear_warnings, warn_once};
use selbox_html::{HtmlRenderer, RenderedFragment, Renderer};
use selbox_markup::format;
use selbox_select::{SelectorGenerator, UniqueSelectorGenerator};

use crate::config::SandboxConfig;
use crate::pass::{MapResult, map_observed};
use crate::timer::{ElementOutcome, SelectorTiming};

/// Markup a fresh session starts with.
pub const DEFAULT_SAMPLE: &str = r#"<div class="container">
  <header>
    <h1>Hello World</h1>
  </header>
  <main>
    <p>First paragraph</p>
    <p>Second paragraph</p>
  </main>
</div>"#;

/// One source line with the selectors generated for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineView<'a> {
    /// Zero-based line number.
    pub number: usize,
    /// The line's text, without its newline.
    pub text: &'a str,
    /// Selectors for elements whose opening tag starts on this line.
    pub selectors: &'a [SelectorTiming],
}

/// Raw text plus the rendered tree and mapping derived from it.
///
/// Passes take `&mut self`, so two passes can never overlap.
#[derive(Debug)]
pub struct Session<R = HtmlRenderer, G = UniqueSelectorGenerator> {
    text: String,
    renderer: R,
    generator: G,
    config: SandboxConfig,
    rendered: RenderedFragment,
    result: MapResult,
}

impl Session {
    /// An empty session using the built-in renderer and generator.
    #[must_use]
    pub fn new(config: SandboxConfig) -> Self {
        let renderer = HtmlRenderer::new(config.isolation);
        let generator = UniqueSelectorGenerator::new(config.generator.clone());
        Self::with_parts(renderer, generator, config)
    }

    /// A session already holding [`DEFAULT_SAMPLE`].
    #[must_use]
    pub fn with_sample(config: SandboxConfig) -> Self {
        let mut session = Self::new(config);
        let _ = session.set_text(DEFAULT_SAMPLE);
        session
    }
}

impl<R: Renderer, G: SelectorGenerator> Session<R, G> {
    /// An empty session with a custom renderer and generator.
    #[must_use]
    pub fn with_parts(renderer: R, generator: G, config: SandboxConfig) -> Self {
        let rendered = renderer.render("");
        Self {
            text: String::new(),
            renderer,
            generator,
            config,
            rendered,
            result: MapResult::default(),
        }
    }

    /// Replace the text and run a fresh pass.
    pub fn set_text(&mut self, text: impl Into<String>) -> &MapResult {
        self.text = text.into();
        self.run_pass()
    }

    /// Format the text with the configured indent, then run a fresh pass.
    pub fn reformat(&mut self) -> &MapResult {
        self.text = format(&self.text, self.config.indent_size);
        self.run_pass()
    }

    fn run_pass(&mut self) -> &MapResult {
        clear_warnings();
        self.rendered = self.renderer.render(&self.text);
        self.result = map_observed(
            &self.text,
            &self.rendered,
            &self.generator,
            self.config.scan_options(),
            |_, outcome| {
                if let ElementOutcome::Skipped { line, error } = outcome {
                    warn_once("SELECT", &format!("line {}: {error}", line + 1));
                }
            },
        );
        &self.result
    }

    /// The current raw text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines in the current text.
    #[must_use]
    pub fn line_count(&self) -> usize {
        line_count(&self.text)
    }

    /// The last pass's result.
    #[must_use]
    pub const fn result(&self) -> &MapResult {
        &self.result
    }

    /// The tree the last pass rendered.
    #[must_use]
    pub const fn rendered(&self) -> &RenderedFragment {
        &self.rendered
    }

    /// The session's configuration.
    #[must_use]
    pub const fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Every line of the text, in order, with its (possibly empty)
    /// selector list.
    pub fn lines(&self) -> impl Iterator<Item = LineView<'_>> {
        let count = self.line_count();
        self.text
            .split('\n')
            .take(count)
            .enumerate()
            .map(|(number, text)| LineView {
                number,
                text,
                selectors: self.result.selectors_by_line.get(number),
            })
    }
}
