//! Selector Timer.
//!
//! Wraps a [`SelectorGenerator`] and measures each call with a monotonic
//! clock. Failures are handed back as values; the pass decides what to do
//! with them.

use std::time::{Duration, Instant};

use selbox_dom::{DomTree, NodeId};
use selbox_select::{GenerateError, SelectorGenerator};
use serde::{Deserialize, Serialize};

/// One generated selector and how long generating it took.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorTiming {
    /// The generated selector.
    pub selector: String,
    /// Wall-clock duration of the single generation call. Serialized as
    /// fractional milliseconds under `time_ms`.
    #[serde(rename = "time_ms", with = "millis")]
    pub elapsed: Duration,
}

impl SelectorTiming {
    /// Duration in fractional milliseconds.
    #[must_use]
    pub fn time_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// `Duration` as a fractional millisecond count.
pub(crate) mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64() * 1000.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let ms = f64::deserialize(d)?;
        Duration::try_from_secs_f64(ms / 1000.0).map_err(D::Error::custom)
    }
}

/// What happened to one walked element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementOutcome {
    /// Resolved to a line and a selector was generated.
    Mapped {
        /// Source line of the element's opening tag.
        line: usize,
        /// The generated selector and its timing.
        timing: SelectorTiming,
    },
    /// More rendered elements of this tag name than source occurrences.
    Unmapped,
    /// Resolved to a line, but selector generation failed.
    Skipped {
        /// Source line of the element's opening tag.
        line: usize,
        /// Why generation failed.
        error: GenerateError,
    },
}

/// Times calls to a selector generator.
#[derive(Debug)]
pub struct SelectorTimer<'g, G: ?Sized> {
    generator: &'g G,
}

impl<'g, G: SelectorGenerator + ?Sized> SelectorTimer<'g, G> {
    /// Wrap `generator`.
    #[must_use]
    pub const fn new(generator: &'g G) -> Self {
        Self { generator }
    }

    /// Generate a selector for `element` under `root`, timing the call.
    ///
    /// # Errors
    ///
    /// Returns the generator's error unchanged; the time spent on a failed
    /// call is not reported.
    pub fn time(
        &self,
        tree: &DomTree,
        element: NodeId,
        root: NodeId,
    ) -> Result<SelectorTiming, GenerateError> {
        let start = Instant::now();
        let selector = self.generator.generate(tree, element, root)?;
        Ok(SelectorTiming {
            selector,
            elapsed: start.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_ms_is_fractional() {
        let timing = SelectorTiming {
            selector: "p".to_string(),
            elapsed: Duration::from_micros(1500),
        };
        assert!((timing.time_ms() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_timer_passes_errors_through() {
        let tree = DomTree::new();
        let failing = |_: &DomTree, id: NodeId, _: NodeId| -> Result<String, GenerateError> {
            Err(GenerateError::NotAnElement(id))
        };
        let timer = SelectorTimer::new(&failing);
        assert_eq!(
            timer.time(&tree, NodeId::ROOT, NodeId::ROOT),
            Err(GenerateError::NotAnElement(NodeId::ROOT))
        );
    }

    #[test]
    fn test_timer_measures_the_call() {
        let tree = DomTree::new();
        let slow = |_: &DomTree, _: NodeId, _: NodeId| -> Result<String, GenerateError> {
            std::thread::sleep(Duration::from_millis(2));
            Ok("x".to_string())
        };
        let timing = SelectorTimer::new(&slow)
            .time(&tree, NodeId::ROOT, NodeId::ROOT)
            .expect("generation succeeds");
        assert_eq!(timing.selector, "x");
        assert!(timing.elapsed >= Duration::from_millis(2));
    }
}
