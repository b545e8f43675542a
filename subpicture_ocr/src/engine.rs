//! The stateful recognition walk over frames and pieces.

use crate::dict::GlyphDict;
use crate::document::{RichText, SubtitleLine, SubtitleSink};
use crate::errors::OcrError;
use crate::frame::{Frame, SubPicture};
use crate::geom::Rect;
use crate::piece::{run_fingerprint, StyledText};
use crate::segment::GapStats;
use crate::Result;

/// Where the recognition walk currently stands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EngineState {
    /// The next frame needs to be pulled from the decoder and segmented.
    AwaitingFrame,
    /// The walk is parked on a run the dictionary could not resolve; the
    /// operator must confirm its text.
    AwaitingPiece,
    /// The current run is committed and the walk is advancing.
    Resolved,
    /// Every piece of the current frame is consumed; its text awaits
    /// commit.
    FrameComplete,
    /// No frames remain.
    Done,
}

/// What the host should do after driving the engine one step.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Step {
    /// Progress was made; call [`Session::advance`] again.  Each step is a
    /// discrete unit of work, so a UI can repaint between calls.
    Working,
    /// Render [`Session::pending`] to the operator, then call
    /// [`Session::resolve`] (optionally after
    /// [`Session::set_symbol_count`]).
    NeedInput,
    /// Every frame is processed.
    Finished,
}

/// The separator inserted before a run's text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Separator {
    None,
    Space,
    LineBreak,
}

/// One committed run: the unit of forward progress and of undo.
#[derive(Debug)]
struct RunRecord {
    /// Piece index of the run head within the frame's ordered sequence.
    head: usize,
    /// The separator that preceded the run's text.
    sep: Separator,
    /// Union bounding box of every piece in the run.
    rect: Rect,
}

/// A frame together with how far recognition has walked through it.
struct FrameProgress {
    frame: Frame,
    /// Index of the next unconsumed piece.
    cursor: usize,
    /// Runs committed so far, in order.
    runs: Vec<RunRecord>,
    /// Text accumulated from the committed runs.
    text: RichText,
    /// Has this frame's line been pushed to the sink?
    committed: bool,
}

impl FrameProgress {
    fn new(frame: Frame) -> FrameProgress {
        FrameProgress {
            frame,
            cursor: 0,
            runs: vec![],
            text: RichText::new(),
            committed: false,
        }
    }
}

/// The run currently awaiting manual resolution, with everything a host
/// needs to render it.
pub struct PendingRun<'a> {
    /// The frame that owns the run.
    pub frame: &'a Frame,
    /// Piece index of the run head.
    pub head: usize,
    /// How many pieces the run currently absorbs.
    pub symbol_count: usize,
    /// Union bounding box of the run, for highlighting.
    pub rect: Rect,
    /// Text previously confirmed for this head, if the operator stepped
    /// back onto it.  Hosts usually prefill their input box with it.
    pub text: Option<&'a StyledText>,
}

/// A recognition session: the walk over every decoded subpicture of one
/// stream, resolving pieces against the dictionary and collecting finished
/// subtitle lines into the sink.
///
/// All session state lives here (current frame, piece cursor, accumulated
/// text, the dictionary handle), so the walk can be driven and tested
/// without any UI attached.  The walk is strictly sequential; the only
/// cooperation expected from the host is to keep calling
/// [`Session::advance`] and to answer [`Step::NeedInput`] requests.
///
/// Dropping a session mid-walk is the abort path: lines already committed
/// to the sink stay, everything else is discarded, and nothing needs to be
/// unwound.
pub struct Session<D, S>
where
    D: Iterator<Item = SubPicture>,
    S: SubtitleSink,
{
    decoder: D,
    sink: S,
    dict: GlyphDict,
    stats: GapStats,
    frames: Vec<FrameProgress>,
    /// Index of the open frame in `frames`, if any.
    current: Option<usize>,
    state: EngineState,
    /// `start_pts` of the most recent packet, for skipping continuation
    /// packets of a subtitle assembled from several MPEG packets.
    last_start_pts: Option<u64>,
    /// Index handed to the next frame that yields pieces.
    next_index: usize,
}

impl<D, S> Session<D, S>
where
    D: Iterator<Item = SubPicture>,
    S: SubtitleSink,
{
    /// Start a session over a stream of decoded subpictures.
    pub fn new(decoder: D, dict: GlyphDict, sink: S) -> Session<D, S> {
        Session {
            decoder,
            sink,
            dict,
            stats: GapStats::default(),
            frames: vec![],
            current: None,
            state: EngineState::AwaitingFrame,
            last_start_pts: None,
            next_index: 0,
        }
    }

    /// Where the walk currently stands.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The dictionary, including everything confirmed so far this session.
    pub fn dict(&self) -> &GlyphDict {
        &self.dict
    }

    /// The sink holding the lines committed so far.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The frame the walk is currently inside, if any.
    pub fn current_frame(&self) -> Option<&Frame> {
        self.current.map(|c| &self.frames[c].frame)
    }

    /// End the session, handing back the dictionary (persist it!) and the
    /// sink with every committed line.  Unconsumed frames are discarded.
    pub fn into_parts(self) -> (GlyphDict, S) {
        (self.dict, self.sink)
    }

    /// Drive the walk one step.
    pub fn advance(&mut self) -> Step {
        match self.state {
            EngineState::Done => Step::Finished,
            EngineState::AwaitingPiece => Step::NeedInput,
            EngineState::AwaitingFrame => {
                // A frame may already be waiting if the operator stepped
                // backward earlier; otherwise pull one from the decoder.
                let next = self.current.map(|c| c + 1).unwrap_or(0);
                if next < self.frames.len() {
                    self.current = Some(next);
                    self.state = EngineState::Resolved;
                    return Step::Working;
                }
                match self.pull_frame() {
                    Some(frame) => {
                        self.frames.push(FrameProgress::new(frame));
                        self.current = Some(next);
                        self.state = EngineState::Resolved;
                        Step::Working
                    }
                    None => {
                        self.state = EngineState::Done;
                        Step::Finished
                    }
                }
            }
            EngineState::FrameComplete => {
                self.commit_frame();
                self.state = EngineState::AwaitingFrame;
                Step::Working
            }
            EngineState::Resolved => {
                let cur = match self.current {
                    Some(c) => c,
                    None => {
                        self.state = EngineState::AwaitingFrame;
                        return Step::Working;
                    }
                };
                let exhausted = {
                    let progress = &self.frames[cur];
                    progress.cursor >= progress.frame.pieces().len()
                };
                if exhausted {
                    self.state = EngineState::FrameComplete;
                    return Step::Working;
                }
                if self.try_auto(cur) {
                    Step::Working
                } else {
                    self.state = EngineState::AwaitingPiece;
                    Step::NeedInput
                }
            }
        }
    }

    /// The run awaiting manual resolution, if the walk is parked on one.
    pub fn pending(&self) -> Option<PendingRun> {
        if self.state != EngineState::AwaitingPiece {
            return None;
        }
        let cur = self.current?;
        let progress = &self.frames[cur];
        let pieces = progress.frame.pieces();
        let head = progress.cursor;
        let remaining = pieces.len() - head;
        let symbol_count = pieces[head].symbol_count().max(1).min(remaining);
        let mut rect = pieces[head].rect().clone();
        for piece in &pieces[head + 1..head + symbol_count] {
            rect = rect.union(piece.rect());
        }
        Some(PendingRun {
            frame: &progress.frame,
            head,
            symbol_count,
            rect,
            text: pieces[head].text(),
        })
    }

    /// Change how many pieces the pending run absorbs.  The head piece is
    /// stamped with the new count, absorbed followers with zero, and
    /// followers released by a contraction revert to standalone pieces.
    /// The count is clamped to the pieces remaining in the frame.
    pub fn set_symbol_count(&mut self, symbol_count: usize) -> Result<()> {
        let cur = self.pending_frame()?;
        let progress = &mut self.frames[cur];
        let cursor = progress.cursor;
        let pieces = progress.frame.pieces_mut();
        let remaining = pieces.len() - cursor;
        let new = symbol_count.max(1).min(remaining);
        let old = pieces[cursor].symbol_count().max(1).min(remaining);
        for piece in &mut pieces[cursor + 1..cursor + old] {
            piece.set_symbol_count(1);
        }
        pieces[cursor].set_symbol_count(new);
        for piece in &mut pieces[cursor + 1..cursor + new] {
            piece.set_symbol_count(0);
        }
        Ok(())
    }

    /// Confirm the operator's text for the pending run.  The run's shape is
    /// recorded in the dictionary, its text is appended to the frame, and
    /// the walk advances.
    pub fn resolve(&mut self, text: StyledText) -> Result<()> {
        let cur = self.pending_frame()?;
        let (len, fingerprint) = {
            let progress = &self.frames[cur];
            let pieces = progress.frame.pieces();
            let cursor = progress.cursor;
            let remaining = pieces.len() - cursor;
            let len = pieces[cursor].symbol_count().max(1).min(remaining);
            (len, run_fingerprint(&pieces[cursor..cursor + len]))
        };
        self.dict.insert(fingerprint, text.clone());
        let stats = self.stats;
        Self::commit_run(&mut self.frames[cur], &stats, len, text);
        self.state = EngineState::Resolved;
        Ok(())
    }

    /// Step the walk backward by one run.
    ///
    /// Mid-frame this pops the last committed run and parks on its head for
    /// re-resolution, without touching the sink.  At the first piece of a
    /// frame it steps across the boundary: the previously committed
    /// subtitle line is removed from the sink and that frame's last run is
    /// re-opened.  Returns `false` when there is nothing left to undo.
    pub fn step_back(&mut self) -> bool {
        let cur = match self.current {
            Some(c) => c,
            None => return false,
        };
        if !self.frames[cur].runs.is_empty() {
            self.reopen_last_run(cur);
            true
        } else if cur == 0 {
            false
        } else {
            self.current = Some(cur - 1);
            self.reopen_last_run(cur - 1);
            true
        }
    }

    /// Look up the open frame, requiring a pending manual run.
    fn pending_frame(&self) -> Result<usize> {
        match (self.state, self.current) {
            (EngineState::AwaitingPiece, Some(c)) => Ok(c),
            _ => Err(OcrError::NoPendingRun.into()),
        }
    }

    /// Pull decoder packets until one yields a frame with pieces.  Returns
    /// `None` when the decoder is exhausted.
    fn pull_frame(&mut self) -> Option<Frame> {
        while let Some(sub) = self.decoder.next() {
            if self.last_start_pts == Some(sub.start_pts) {
                trace!(
                    "skipping continuation packet at pts {}",
                    sub.start_pts
                );
                continue;
            }
            self.last_start_pts = Some(sub.start_pts);
            if sub.packet_pts != sub.start_pts {
                warn!(
                    "subtitle {}: packet time stamp ({}) does not match \
                     presentation time stamp ({})",
                    self.next_index, sub.packet_pts, sub.start_pts
                );
            }
            match Frame::segment(self.next_index, sub, &mut self.stats) {
                Ok(Some(frame)) => {
                    self.next_index += 1;
                    return Some(frame);
                }
                Ok(None) => {
                    debug!(
                        "subtitle {}: nothing above the ink threshold, skipping",
                        self.next_index
                    );
                }
                Err(err) => {
                    warn!(
                        "subtitle {}: skipping undecodable image: {}",
                        self.next_index, err
                    );
                }
            }
        }
        None
    }

    /// Try to resolve the run at the cursor from the dictionary, longest
    /// merge first.  Returns whether a run was committed.
    fn try_auto(&mut self, cur: usize) -> bool {
        let (len, text) = {
            let progress = &self.frames[cur];
            let pieces = progress.frame.pieces();
            let cursor = progress.cursor;
            let remaining = pieces.len() - cursor;
            let longest = self.dict.max_known_run().min(remaining);
            let mut found = None;
            for len in (1..=longest).rev() {
                let fingerprint = run_fingerprint(&pieces[cursor..cursor + len]);
                if let Some(text) = self.dict.lookup(&fingerprint) {
                    found = Some((len, text.clone()));
                    break;
                }
            }
            match found {
                Some(hit) => hit,
                None => return false,
            }
        };
        let stats = self.stats;
        Self::commit_run(&mut self.frames[cur], &stats, len, text);
        true
    }

    /// Stamp a resolved run onto the frame, append its text (with the
    /// appropriate separator) and move the cursor past it.
    fn commit_run(progress: &mut FrameProgress, stats: &GapStats, len: usize, text: StyledText) {
        let cursor = progress.cursor;
        let rect = {
            let pieces = progress.frame.pieces();
            let mut rect = pieces[cursor].rect().clone();
            for piece in &pieces[cursor + 1..cursor + len] {
                rect = rect.union(piece.rect());
            }
            rect
        };
        let sep = match progress.runs.last() {
            None => Separator::None,
            Some(prev) => {
                let pieces = progress.frame.pieces();
                let lines = progress.frame.lines();
                let prev_line = lines[pieces[prev.head].line()];
                let this_line = lines[pieces[cursor].line()];
                if !prev_line.intersects(&this_line) {
                    Separator::LineBreak
                } else if horizontal_gap(&prev.rect, &rect) > stats.space_threshold() {
                    Separator::Space
                } else {
                    Separator::None
                }
            }
        };
        {
            let pieces = progress.frame.pieces_mut();
            pieces[cursor].set_symbol_count(len);
            pieces[cursor].set_text(text.clone());
            for piece in &mut pieces[cursor + 1..cursor + len] {
                piece.set_symbol_count(0);
            }
        }
        match sep {
            Separator::None => {}
            Separator::Space => progress.text.push_plain(" "),
            Separator::LineBreak => progress.text.push_plain("\n"),
        }
        progress.text.push_span(text);
        progress.runs.push(RunRecord {
            head: cursor,
            sep,
            rect,
        });
        progress.cursor = cursor + len;
    }

    /// Commit the open frame's accumulated text as a subtitle line, unless
    /// nothing but whitespace was recognized.
    fn commit_frame(&mut self) {
        let cur = match self.current {
            Some(c) => c,
            None => return,
        };
        let line = {
            let progress = &self.frames[cur];
            if progress.text.is_blank() {
                debug!(
                    "subtitle {}: no text recognized, not emitting a line",
                    progress.frame.index()
                );
                None
            } else {
                Some(SubtitleLine {
                    show_ms: progress.frame.show_ms(),
                    hide_ms: progress.frame.hide_ms(),
                    text: progress.text.clone(),
                })
            }
        };
        if let Some(line) = line {
            self.sink.push_line(line);
            self.frames[cur].committed = true;
        }
    }

    /// Re-open the last run of frame `index` for manual re-resolution,
    /// removing the frame's committed line from the sink first if there is
    /// one.
    fn reopen_last_run(&mut self, index: usize) {
        if self.frames[index].committed {
            self.sink.pop_line();
            self.frames[index].committed = false;
        }
        let progress = &mut self.frames[index];
        match progress.runs.pop() {
            Some(run) => progress.cursor = run.head,
            None => progress.cursor = 0,
        }
        // Replay the remaining runs; the pieces keep their stamped text, so
        // the re-opened head is prefilled for the operator.
        let mut text = RichText::new();
        for run in &progress.runs {
            match run.sep {
                Separator::None => {}
                Separator::Space => text.push_plain(" "),
                Separator::LineBreak => text.push_plain("\n"),
            }
            if let Some(confirmed) = progress.frame.pieces()[run.head].text() {
                text.push_span(confirmed.clone());
            }
        }
        progress.text = text;
        self.state = EngineState::AwaitingPiece;
    }
}

/// The horizontal gap between two runs, measuring from the previous run's
/// rightmost pixel column (inclusive) to the next run's leftmost, the way
/// the space heuristic expects.  Overlapping runs have gap zero.
fn horizontal_gap(prev: &Rect, next: &Rect) -> usize {
    (next.left() + 1).saturating_sub(prev.right())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::document::SubtitleBuffer;
    use crate::piece::{Fingerprint, Style};
    use crate::test_util::subpicture;

    /// Run a throwaway segmentation of `rows` and return the fingerprint of
    /// the run spanning `range`, for seeding dictionaries.
    fn fingerprint_of(rows: &[&str], range: std::ops::Range<usize>) -> Fingerprint {
        let mut stats = GapStats::default();
        let frame = Frame::segment(0, subpicture(rows, 0, 90), &mut stats)
            .unwrap()
            .unwrap();
        run_fingerprint(&frame.pieces()[range])
    }

    /// Drive the session until it needs input or finishes.
    fn drive<D, S>(session: &mut Session<D, S>) -> Step
    where
        D: Iterator<Item = SubPicture>,
        S: SubtitleSink,
    {
        loop {
            match session.advance() {
                Step::Working => continue,
                other => return other,
            }
        }
    }

    /// Three glyphs of width 4 with distinct shapes, one column apart.  The
    /// space threshold works out to 2 and the inter-glyph gaps to exactly
    /// 2, so the glyphs concatenate without separators.
    const WORD: &[&str] = &[
        "#### #### ####",
        "#### #  #  ## ",
        "#### ####  ## ",
    ];

    #[test]
    fn known_run_resolves_automatically_and_manual_glyph_completes_the_word() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut dict = GlyphDict::new();
        dict.insert(fingerprint_of(WORD, 0..2), StyledText::plain("AB"));

        let subs = vec![
            subpicture(WORD, 90_000, 180_000),
            subpicture(&["    "], 270_000, 360_000),
        ];
        let mut session = Session::new(subs.into_iter(), dict, SubtitleBuffer::new());

        assert_eq!(drive(&mut session), Step::NeedInput);
        {
            let pending = session.pending().unwrap();
            assert_eq!(pending.head, 2);
            assert_eq!(pending.symbol_count, 1);
        }
        session.resolve(StyledText::plain("C")).unwrap();
        assert_eq!(drive(&mut session), Step::Finished);

        let (dict, buffer) = session.into_parts();
        assert_eq!(buffer.lines().len(), 1);
        let line = &buffer.lines()[0];
        assert_eq!(line.text.plain(), "ABC");
        assert_eq!((line.show_ms, line.hide_ms), (1000, 2000));
        // The manual confirmation went into the dictionary.
        assert_eq!(
            dict.lookup(&fingerprint_of(WORD, 2..3)),
            Some(&StyledText::plain("C"))
        );
        assert_eq!(dict.max_known_run(), 2);
    }

    #[test]
    fn longest_known_merge_wins() {
        let mut dict = GlyphDict::new();
        dict.insert(fingerprint_of(WORD, 0..1), StyledText::plain("short"));
        dict.insert(fingerprint_of(WORD, 0..2), StyledText::plain("long"));

        let subs = vec![subpicture(WORD, 0, 90)];
        let mut session = Session::new(subs.into_iter(), dict, SubtitleBuffer::new());

        // The first unresolved piece is the third one: the first two were
        // taken together by the length-2 entry.
        assert_eq!(drive(&mut session), Step::NeedInput);
        let pending = session.pending().unwrap();
        assert_eq!(pending.head, 2);
        assert_eq!(session.frames[0].text.plain(), "long");
    }

    #[test]
    fn separators_follow_line_and_gap_geometry() {
        // Two glyphs close together, a third far to the right on the same
        // text line, and a fourth on a line of its own.  All four shapes
        // are distinct so every one goes through manual resolution.
        // Average piece width is 4, so the space threshold is 2.
        let art: &[&str] = &[
            "#### ####         ####",
            "#### #  #         ##  ",
            "                      ",
            "####                  ",
            "  ##                  ",
        ];
        let subs = vec![subpicture(art, 0, 90)];
        let mut session =
            Session::new(subs.into_iter(), GlyphDict::new(), SubtitleBuffer::new());

        for text in ["A", "B", "C", "D"] {
            assert_eq!(drive(&mut session), Step::NeedInput);
            session.resolve(StyledText::plain(text)).unwrap();
        }
        assert_eq!(drive(&mut session), Step::Finished);

        let (_, buffer) = session.into_parts();
        assert_eq!(buffer.lines()[0].text.plain(), "AB C\nD");
    }

    #[test]
    fn stepping_back_mid_frame_reopens_the_last_run() {
        let subs = vec![subpicture(WORD, 0, 90)];
        let mut session =
            Session::new(subs.into_iter(), GlyphDict::new(), SubtitleBuffer::new());

        assert_eq!(drive(&mut session), Step::NeedInput);
        session.resolve(StyledText::plain("X")).unwrap();

        assert!(session.step_back());
        let pending = session.pending().unwrap();
        assert_eq!(pending.head, 0);
        assert_eq!(pending.text, Some(&StyledText::plain("X")));

        // Confirming a different text overwrites the dictionary entry.
        session.resolve(StyledText::plain("Y")).unwrap();
        assert_eq!(drive(&mut session), Step::NeedInput);
        session.resolve(StyledText::plain("Z")).unwrap();
        assert_eq!(drive(&mut session), Step::NeedInput);
        session.resolve(StyledText::plain("!")).unwrap();
        assert_eq!(drive(&mut session), Step::Finished);

        let (dict, buffer) = session.into_parts();
        assert_eq!(buffer.lines()[0].text.plain(), "YZ!");
        assert_eq!(
            dict.lookup(&fingerprint_of(WORD, 0..1)),
            Some(&StyledText::plain("Y"))
        );
    }

    #[test]
    fn stepping_back_across_a_frame_boundary_recalls_the_committed_line() {
        let first: &[&str] = &["####", "####"];
        let second: &[&str] = &["##", "##"];
        let subs = vec![subpicture(first, 0, 90), subpicture(second, 900, 990)];
        let mut session =
            Session::new(subs.into_iter(), GlyphDict::new(), SubtitleBuffer::new());

        assert_eq!(drive(&mut session), Step::NeedInput);
        session.resolve(StyledText::plain("A")).unwrap();
        assert_eq!(drive(&mut session), Step::NeedInput);
        assert_eq!(session.sink().lines().len(), 1);

        // We're parked on the second frame's first piece; stepping back
        // recalls frame one's line and re-opens its run.
        assert!(session.step_back());
        assert_eq!(session.sink().lines().len(), 0);
        assert_eq!(session.pending().unwrap().text, Some(&StyledText::plain("A")));

        session.resolve(StyledText::plain("B")).unwrap();
        assert_eq!(drive(&mut session), Step::NeedInput);
        session.resolve(StyledText::plain("C")).unwrap();
        assert_eq!(drive(&mut session), Step::Finished);

        let (_, buffer) = session.into_parts();
        let texts: Vec<String> =
            buffer.lines().iter().map(|l| l.text.plain()).collect();
        assert_eq!(texts, vec!["B", "C"]);
    }

    #[test]
    fn stepping_back_with_nothing_done_is_a_no_op() {
        let subs: Vec<SubPicture> = vec![];
        let mut session =
            Session::new(subs.into_iter(), GlyphDict::new(), SubtitleBuffer::new());
        assert!(!session.step_back());
        assert_eq!(session.advance(), Step::Finished);
        assert!(!session.step_back());
    }

    #[test]
    fn symbol_count_can_grow_and_shrink_before_confirmation() {
        let subs = vec![subpicture(WORD, 0, 90)];
        let mut session =
            Session::new(subs.into_iter(), GlyphDict::new(), SubtitleBuffer::new());

        assert_eq!(drive(&mut session), Step::NeedInput);
        session.set_symbol_count(3).unwrap();
        assert_eq!(session.pending().unwrap().symbol_count, 3);
        session.set_symbol_count(1).unwrap();
        assert_eq!(session.pending().unwrap().symbol_count, 1);
        // Contraction released the absorbed pieces.
        assert_eq!(session.frames[0].frame.pieces()[1].symbol_count(), 1);
        assert_eq!(session.frames[0].frame.pieces()[2].symbol_count(), 1);

        session.set_symbol_count(2).unwrap();
        session.resolve(StyledText::plain("AB")).unwrap();
        assert_eq!(drive(&mut session), Step::NeedInput);
        assert_eq!(session.pending().unwrap().head, 2);
        session.resolve(StyledText::plain("C")).unwrap();
        assert_eq!(drive(&mut session), Step::Finished);

        let (dict, buffer) = session.into_parts();
        assert_eq!(buffer.lines()[0].text.plain(), "ABC");
        assert_eq!(dict.max_known_run(), 2);
    }

    #[test]
    fn symbol_count_is_clamped_to_the_frame() {
        let subs = vec![subpicture(WORD, 0, 90)];
        let mut session =
            Session::new(subs.into_iter(), GlyphDict::new(), SubtitleBuffer::new());
        assert_eq!(drive(&mut session), Step::NeedInput);
        session.set_symbol_count(99).unwrap();
        assert_eq!(session.pending().unwrap().symbol_count, 3);
        session.set_symbol_count(0).unwrap();
        assert_eq!(session.pending().unwrap().symbol_count, 1);
    }

    #[test]
    fn continuation_packets_with_the_same_start_pts_are_skipped() {
        let subs = vec![
            subpicture(&["##", "##"], 1000, 2000),
            subpicture(&["####", "####"], 1000, 2000),
        ];
        let mut session =
            Session::new(subs.into_iter(), GlyphDict::new(), SubtitleBuffer::new());
        assert_eq!(drive(&mut session), Step::NeedInput);
        session.resolve(StyledText::plain("A")).unwrap();
        assert_eq!(drive(&mut session), Step::Finished);
        let (_, buffer) = session.into_parts();
        assert_eq!(buffer.lines().len(), 1);
        assert_eq!(buffer.lines()[0].text.plain(), "A");
    }

    #[test]
    fn undecodable_packets_are_skipped() {
        let mut bad = subpicture(&["##", "##"], 0, 90);
        bad.data.pop();
        let subs = vec![bad, subpicture(&["##", "##"], 900, 990)];
        let mut session =
            Session::new(subs.into_iter(), GlyphDict::new(), SubtitleBuffer::new());
        assert_eq!(drive(&mut session), Step::NeedInput);
        session.resolve(StyledText::plain("A")).unwrap();
        assert_eq!(drive(&mut session), Step::Finished);
        let (_, buffer) = session.into_parts();
        assert_eq!(buffer.lines().len(), 1);
        assert_eq!(buffer.lines()[0].show_ms, 10);
    }

    #[test]
    fn whitespace_only_frames_emit_no_line() {
        let subs = vec![subpicture(&["##", "##"], 0, 90)];
        let mut session =
            Session::new(subs.into_iter(), GlyphDict::new(), SubtitleBuffer::new());
        assert_eq!(drive(&mut session), Step::NeedInput);
        session.resolve(StyledText::plain(" ")).unwrap();
        assert_eq!(drive(&mut session), Step::Finished);
        let (_, buffer) = session.into_parts();
        assert!(buffer.lines().is_empty());
    }

    #[test]
    fn resolve_outside_a_pending_run_is_an_error() {
        let subs: Vec<SubPicture> = vec![];
        let mut session =
            Session::new(subs.into_iter(), GlyphDict::new(), SubtitleBuffer::new());
        assert!(session.resolve(StyledText::plain("A")).is_err());
        assert!(session.set_symbol_count(2).is_err());
    }

    #[test]
    fn styled_confirmations_carry_their_style_into_the_line() {
        let subs = vec![subpicture(&["##", "##"], 0, 90)];
        let mut session =
            Session::new(subs.into_iter(), GlyphDict::new(), SubtitleBuffer::new());
        assert_eq!(drive(&mut session), Step::NeedInput);
        let italic = Style {
            italic: true,
            ..Style::default()
        };
        session.resolve(StyledText::new("Si", italic)).unwrap();
        assert_eq!(drive(&mut session), Step::Finished);
        let (_, buffer) = session.into_parts();
        assert_eq!(buffer.lines()[0].text.tagged(), "<i>Si</i>");
    }
}
