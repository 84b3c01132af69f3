//! Route id tokenizer.
//!
//! A route id such as `posts.$slug.(edit)` is split into URL segments by a
//! small state machine. Each character is fed to [`advance_segment_state`],
//! which returns the next state and what to do with the character; the
//! tokenizer applies those actions to the in-progress segment.

use crate::config::DEFAULT_PARAM_PREFIX_CHAR;
use crate::error::RouteError;

const ESCAPE_START: char = '[';
const ESCAPE_END: char = ']';
const OPTIONAL_START: char = '(';
const OPTIONAL_END: char = ')';

/// Characters the router reserves; they may never appear in a raw segment.
const RESERVED_CHARS: [char; 3] = ['*', ':', '/'];

/// Tokenizer states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentState {
    /// Outside any bracketed region.
    #[default]
    Normal,
    /// Inside `[...]`; characters are literal.
    Escape,
    /// Inside `(...)`; the segment becomes optional.
    Optional,
    /// Inside `[...]` nested in `(...)`.
    OptionalEscape,
}

/// What to do with the character just consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentAction {
    /// Finish the in-progress segment.
    Flush,
    /// Append the character to both the segment and the raw segment.
    Literal,
    /// Append the character to the raw segment only.
    Delimiter,
    /// Append the given character to the segment and the original to the raw segment.
    Mapped(char),
}

/// Result of feeding one character to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentStep {
    /// State to carry into the next character.
    pub next_state: SegmentState,
    /// Effect on the in-progress segment.
    pub action: SegmentAction,
}

impl SegmentStep {
    fn new(next_state: SegmentState, action: SegmentAction) -> Self {
        Self { next_state, action }
    }
}

/// Facts about the surrounding input needed to classify a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharContext {
    /// The in-progress segment has no semantic characters yet.
    pub segment_empty: bool,
    /// This is the final character of the route id.
    pub is_last: bool,
    /// Character that introduces dynamic segments.
    pub param_prefix_char: char,
}

/// Returns true for characters that end a segment outside brackets.
pub fn is_segment_separator(ch: char) -> bool {
    ch == '/' || ch == '.' || ch == '\\' || ch == std::path::MAIN_SEPARATOR
}

/// Advance the tokenizer by one character.
pub fn advance_segment_state(state: SegmentState, ch: char, ctx: &CharContext) -> SegmentStep {
    use SegmentAction::*;
    use SegmentState::*;

    match state {
        Normal => {
            if is_segment_separator(ch) {
                SegmentStep::new(Normal, Flush)
            } else if ch == ESCAPE_START {
                SegmentStep::new(Escape, Delimiter)
            } else if ch == OPTIONAL_START {
                SegmentStep::new(Optional, Delimiter)
            } else if ctx.segment_empty && ch == ctx.param_prefix_char {
                SegmentStep::new(Normal, Mapped(param_marker(ctx.is_last)))
            } else {
                SegmentStep::new(Normal, Literal)
            }
        }
        Escape => {
            if ch == ESCAPE_END {
                SegmentStep::new(Normal, Delimiter)
            } else {
                SegmentStep::new(Escape, Literal)
            }
        }
        Optional => {
            if ch == OPTIONAL_END {
                SegmentStep::new(Normal, Mapped('?'))
            } else if ch == ESCAPE_START {
                SegmentStep::new(OptionalEscape, Delimiter)
            } else if ctx.segment_empty && ch == ctx.param_prefix_char {
                SegmentStep::new(Optional, Mapped(param_marker(ctx.is_last)))
            } else {
                SegmentStep::new(Optional, Literal)
            }
        }
        OptionalEscape => {
            if ch == ESCAPE_END {
                SegmentStep::new(Optional, Delimiter)
            } else {
                SegmentStep::new(OptionalEscape, Literal)
            }
        }
    }
}

/// Splat when the prefix closes the id, named param otherwise.
fn param_marker(is_last: bool) -> char {
    if is_last { '*' } else { ':' }
}

/// Parsed segments of a route id, co-indexed with their raw spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteSegments {
    /// Semantic segments (`:param`, `*`, `name?`).
    pub segments: Vec<String>,
    /// Segments exactly as written in the id.
    pub raw_segments: Vec<String>,
}

impl RouteSegments {
    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when the id produced no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterate `(segment, raw_segment)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.segments
            .iter()
            .map(String::as_str)
            .zip(self.raw_segments.iter().map(String::as_str))
    }
}

struct SegmentBuffer<'a> {
    route_id: &'a str,
    segment: String,
    raw: String,
    out: RouteSegments,
}

impl<'a> SegmentBuffer<'a> {
    fn new(route_id: &'a str) -> Self {
        Self {
            route_id,
            segment: String::new(),
            raw: String::new(),
            out: RouteSegments::default(),
        }
    }

    fn apply(&mut self, ch: char, action: SegmentAction) -> Result<(), RouteError> {
        match action {
            SegmentAction::Flush => return self.flush(),
            SegmentAction::Literal => self.segment.push(ch),
            SegmentAction::Delimiter => {}
            SegmentAction::Mapped(mapped) => self.segment.push(mapped),
        }
        self.raw.push(ch);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), RouteError> {
        let segment = std::mem::take(&mut self.segment);
        let raw = std::mem::take(&mut self.raw);
        if segment.is_empty() {
            return Ok(());
        }
        for reserved in RESERVED_CHARS {
            if raw.contains(reserved) {
                let reported = if reserved == '/' { segment } else { raw };
                return Err(RouteError::reserved_character(
                    reported,
                    self.route_id,
                    reserved,
                ));
            }
        }
        self.out.segments.push(segment);
        self.out.raw_segments.push(raw);
        Ok(())
    }

    fn finish(mut self) -> Result<RouteSegments, RouteError> {
        self.flush()?;
        Ok(self.out)
    }
}

/// Split a route id into segments using the default `$` param prefix.
///
/// ```
/// use routex_core::get_route_segments;
///
/// let parsed = get_route_segments("posts.$slug").unwrap();
/// assert_eq!(parsed.segments, ["posts", ":slug"]);
/// assert_eq!(parsed.raw_segments, ["posts", "$slug"]);
/// ```
pub fn get_route_segments(route_id: &str) -> Result<RouteSegments, RouteError> {
    get_route_segments_with(route_id, DEFAULT_PARAM_PREFIX_CHAR)
}

/// Split a route id into segments with a custom param prefix character.
pub fn get_route_segments_with(
    route_id: &str,
    param_prefix_char: char,
) -> Result<RouteSegments, RouteError> {
    let mut buffer = SegmentBuffer::new(route_id);
    let mut state = SegmentState::Normal;
    let mut chars = route_id.chars().peekable();

    while let Some(ch) = chars.next() {
        let ctx = CharContext {
            segment_empty: buffer.segment.is_empty(),
            is_last: chars.peek().is_none(),
            param_prefix_char,
        };
        let step = advance_segment_state(state, ch, &ctx);
        buffer.apply(ch, step.action)?;
        state = step.next_state;
    }

    buffer.finish()
}
