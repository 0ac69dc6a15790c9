//! Self-describing match results.

use std::fmt;
use std::rc::Rc;

const MATCHED: &str = "\u{2713} ";
const NOT_MATCHED: &str = "\u{2717} ";
const INDENT: &str = "    ";

/// Lazily evaluated description of the value a matcher saw.
pub type ActualFn<'a> = Rc<dyn Fn() -> String + 'a>;

/// Explanation tree produced by evaluating a matcher.
///
/// Created fresh on every evaluation and never mutated afterwards, apart
/// from parents replacing a failed child's `actual` with richer context.
#[derive(Clone)]
pub struct DescribedMatch<'a> {
    /// What the matcher actually saw; only evaluated when rendered.
    pub actual: ActualFn<'a>,
    /// What the matcher checks, e.g. `equal to 'x'`.
    pub description: String,
    /// Whether the match succeeded.
    pub matched: bool,
    /// Results of delegate matchers, in evaluation order.
    pub sub_results: Vec<DescribedMatch<'a>>,
    /// Marks a polarity flip (`not`) for rendering.
    pub inversion: bool,
}

impl<'a> DescribedMatch<'a> {
    /// A leaf result.
    pub fn leaf<F>(actual: F, description: impl Into<String>, matched: bool) -> Self
    where
        F: Fn() -> String + 'a,
    {
        Self {
            actual: Rc::new(actual),
            description: description.into(),
            matched,
            sub_results: Vec::new(),
            inversion: false,
        }
    }

    /// A result wrapping delegate results.
    pub fn composite<F>(
        actual: F,
        description: impl Into<String>,
        matched: bool,
        sub_results: Vec<DescribedMatch<'a>>,
    ) -> Self
    where
        F: Fn() -> String + 'a,
    {
        Self {
            actual: Rc::new(actual),
            description: description.into(),
            matched,
            sub_results,
            inversion: false,
        }
    }

    /// Mark this result as a polarity inversion.
    pub fn inverted(mut self) -> Self {
        self.inversion = true;
        self
    }

    /// Evaluate the actual-value description.
    pub fn actual_text(&self) -> String {
        (self.actual)()
    }

    /// Render the tree as indented text.
    ///
    /// With `only_matches`, nodes that did not match (after applying the
    /// inherited inversion) are pruned, except inversion nodes themselves,
    /// which always render so the inner detail of a `not` stays visible.
    /// Trailing whitespace is trimmed.
    pub fn render(&self, only_matches: bool, indent: &str) -> String {
        let mut out = String::new();
        self.render_into(&mut out, only_matches, indent, false);
        out.truncate(out.trim_end().len());
        out
    }

    fn render_into(&self, out: &mut String, only_matches: bool, indent: &str, invert: bool) {
        let matched = self.matched != invert;
        if !(matched || !only_matches || self.inversion) {
            return;
        }

        let indicator = if self.matched { MATCHED } else { NOT_MATCHED };
        out.push_str(indent);
        out.push_str(indicator);
        out.push_str(&self.description);

        if self.sub_results.is_empty() {
            if !matched {
                out.push_str(" (was: ");
                out.push_str(&self.actual_text());
                out.push(')');
            }
            out.push('\n');
        } else {
            out.push_str(":\n");
            let child_indent = format!("{}{}", indent, INDENT);
            for sub in &self.sub_results {
                sub.render_into(out, only_matches, &child_indent, invert != self.inversion);
            }
        }
    }
}

impl fmt::Debug for DescribedMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescribedMatch")
            .field("description", &self.description)
            .field("matched", &self.matched)
            .field("inversion", &self.inversion)
            .field("sub_results", &self.sub_results)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for DescribedMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(false, ""))
    }
}
