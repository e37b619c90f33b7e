//! Quiz session controller
//!
//! Owns all progression state for one sitting: which round and question are
//! showing, the round countdown, and the running score. Every transition is a
//! method taking the [`PresentationSink`] that should render its effect.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    error::{SessionError, NO_SELECTION_MESSAGE},
    scoring::QuizOutcome,
};
use crate::{
    presentation::PresentationSink,
    quiz::{Question, QuizDefinition, Round},
    state::timer_state::{Tick, TimerState},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for a definition
    Idle,
    RoundActive,
    /// Terminal
    Ended,
}

/// Progression counters of a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub round_index: usize,
    pub question_index: usize,
    pub accumulated_score: f64,
    pub total_possible_marks: f64,
    pub timer: TimerState,
}

impl SessionState {
    pub fn remaining_seconds(&self) -> u64 {
        self.timer.remaining_seconds
    }
}

/// How a submitted answer was scored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub credit: f64,
}

#[derive(Debug)]
pub struct QuizSession {
    definition: QuizDefinition,
    phase: Phase,
    state: SessionState,
    outcome: Option<QuizOutcome>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            definition: QuizDefinition::default(),
            phase: Phase::Idle,
            state: SessionState::default(),
            outcome: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn timer(&self) -> &TimerState {
        &self.state.timer
    }

    /// Final result, once the session has ended
    pub fn outcome(&self) -> Option<&QuizOutcome> {
        self.outcome.as_ref()
    }

    pub fn current_round(&self) -> Option<&Round> {
        match self.phase {
            Phase::RoundActive => self.definition.rounds.get(self.state.round_index),
            _ => None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_round()
            .and_then(|round| round.questions.get(self.state.question_index))
    }

    /// Take a loaded definition and start round 0
    pub fn load(
        &mut self,
        definition: QuizDefinition,
        sink: &mut dyn PresentationSink,
    ) -> Result<(), SessionError> {
        if self.phase != Phase::Idle {
            return Err(SessionError::AlreadyLoaded);
        }

        self.state.total_possible_marks = definition.total_marks();
        info!(
            "Quiz loaded: {} rounds, {} marks available",
            definition.round_count(),
            self.state.total_possible_marks
        );
        self.definition = definition;
        self.phase = Phase::RoundActive;
        self.start_round(0, sink);
        Ok(())
    }

    /// Deliver one elapsed second to countdown `generation`
    pub fn tick(&mut self, generation: u64, sink: &mut dyn PresentationSink) -> Tick {
        if self.phase != Phase::RoundActive {
            return Tick::Ignored;
        }

        let tick = self.state.timer.tick(generation);
        match tick {
            Tick::Ignored => debug!("Ignoring tick for retired countdown {}", generation),
            Tick::Running(remaining) => {
                sink.show_timer(self.state.timer.clock());
                debug!("Round {} countdown: {}s left", self.state.round_index, remaining);
            }
            Tick::Expired => {
                sink.show_timer(self.state.timer.clock());
                info!(
                    "Time is up for round {} after {} answered questions",
                    self.state.round_index, self.state.question_index
                );
                self.advance_to_next_round(sink);
            }
        }
        tick
    }

    /// Score the selected choice for the current question and move on.
    ///
    /// `None` means nothing was selected; the user is prompted and nothing
    /// changes.
    pub fn submit_answer(
        &mut self,
        selection: Option<&str>,
        sink: &mut dyn PresentationSink,
    ) -> Result<AnswerOutcome, SessionError> {
        let round = self.current_round().ok_or(SessionError::NotActive)?;
        let question = round
            .questions
            .get(self.state.question_index)
            .ok_or(SessionError::NotActive)?;

        let Some(choice) = selection else {
            sink.show_prompt(NO_SELECTION_MESSAGE);
            return Err(SessionError::NoSelection);
        };
        if !question.offers(choice) {
            return Err(SessionError::UnknownChoice(choice.to_string()));
        }

        let credit = round.per_question_credit().unwrap_or_default();
        let correct = question.is_correct(choice);
        let question_count = round.questions.len();

        let awarded = if correct { credit } else { 0.0 };
        self.state.accumulated_score += awarded;
        self.state.question_index += 1;
        debug!(
            "Round {} question {} answered {} ({}), score now {}",
            self.state.round_index,
            self.state.question_index,
            choice,
            if correct { "correct" } else { "wrong" },
            self.state.accumulated_score
        );

        if self.state.question_index < question_count {
            self.show_current_question(sink);
        } else {
            self.advance_to_next_round(sink);
        }

        Ok(AnswerOutcome { correct, credit: awarded })
    }

    /// End the current round early and start the next one
    pub fn advance_round(&mut self, sink: &mut dyn PresentationSink) -> Result<(), SessionError> {
        if self.phase != Phase::RoundActive {
            return Err(SessionError::NotActive);
        }
        self.advance_to_next_round(sink);
        Ok(())
    }

    fn advance_to_next_round(&mut self, sink: &mut dyn PresentationSink) {
        self.state.timer.stop();
        self.start_round(self.state.round_index + 1, sink);
    }

    /// Start round `index`, or finish when there is none.
    ///
    /// Rounds without questions are passed straight through.
    fn start_round(&mut self, mut index: usize, sink: &mut dyn PresentationSink) {
        loop {
            let Some(round) = self.definition.rounds.get(index) else {
                self.finish(sink);
                return;
            };

            self.state.round_index = index;
            self.state.question_index = 0;
            self.state.timer.start(round.time_limit_seconds);
            info!(
                "Starting round {} \"{}\": {} questions, {}s",
                index,
                round.title,
                round.questions.len(),
                round.time_limit_seconds
            );
            sink.show_round(index, round, self.state.timer.clock());

            if let Some(question) = round.questions.first() {
                sink.show_question(0, question);
                return;
            }

            debug!("Round {} has no questions, moving on", index);
            self.state.timer.stop();
            index += 1;
        }
    }

    fn show_current_question(&self, sink: &mut dyn PresentationSink) {
        if let Some(question) = self.current_question() {
            sink.show_question(self.state.question_index, question);
        }
    }

    fn finish(&mut self, sink: &mut dyn PresentationSink) {
        self.state.timer.stop();
        self.phase = Phase::Ended;

        let outcome = QuizOutcome::from_scores(
            self.state.accumulated_score,
            self.state.total_possible_marks,
        );
        info!(
            "Quiz finished: {:.2}/10 ({} of {} marks), {}",
            outcome.normalized_score,
            outcome.accumulated_score,
            outcome.total_possible_marks,
            outcome.tier
        );
        sink.show_result(&outcome);
        self.outcome = Some(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        quiz::AnswerOption,
        session::AdmissionTier,
        state::timer_state::Clock,
    };

    /// Records every render request in order
    #[derive(Debug, Default)]
    struct RecordingSink {
        rounds: Vec<usize>,
        questions: Vec<(usize, usize)>,
        timers: Vec<String>,
        prompts: Vec<String>,
        results: Vec<QuizOutcome>,
        current_round: usize,
    }

    impl PresentationSink for RecordingSink {
        fn show_login_error(&mut self, _message: &str) {}

        fn show_round(&mut self, index: usize, _round: &Round, clock: Clock) {
            self.current_round = index;
            self.rounds.push(index);
            self.timers.push(clock.to_string());
        }

        fn show_question(&mut self, index: usize, _question: &Question) {
            self.questions.push((self.current_round, index));
        }

        fn show_timer(&mut self, clock: Clock) {
            self.timers.push(clock.to_string());
        }

        fn show_result(&mut self, outcome: &QuizOutcome) {
            self.results.push(outcome.clone());
        }

        fn show_prompt(&mut self, message: &str) {
            self.prompts.push(message.to_string());
        }

        fn show_load_error(&mut self, _message: &str) {}
    }

    fn question(correct: &str) -> Question {
        Question {
            text: format!("answer is {correct}"),
            options: ["A. alpha", "B. beta", "C. gamma", "D. delta"]
                .iter()
                .filter_map(|label| AnswerOption::from_label(label))
                .collect(),
            correct_choice: correct.to_string(),
        }
    }

    fn round(title: &str, minutes: u64, marks: f64, answers: &[&str]) -> Round {
        Round {
            title: title.to_string(),
            time_limit_seconds: minutes * 60,
            marks,
            questions: answers.iter().map(|answer| question(answer)).collect(),
        }
    }

    fn started(rounds: Vec<Round>) -> (QuizSession, RecordingSink) {
        let mut session = QuizSession::new();
        let mut sink = RecordingSink::default();
        session.load(QuizDefinition::new(rounds), &mut sink).unwrap();
        (session, sink)
    }

    fn expire_round(session: &mut QuizSession, sink: &mut RecordingSink) -> usize {
        let generation = session.timer().generation;
        let mut expiries = 0;
        while session.timer().generation == generation && session.phase() == Phase::RoundActive {
            if session.tick(generation, sink) == Tick::Expired {
                expiries += 1;
            }
        }
        expiries
    }

    #[test]
    fn load_starts_first_round() {
        let (session, sink) = started(vec![round("One", 1, 10.0, &["A", "B"])]);

        assert_eq!(session.phase(), Phase::RoundActive);
        assert_eq!(session.state().round_index, 0);
        assert_eq!(session.state().question_index, 0);
        assert_eq!(session.state().remaining_seconds(), 60);
        assert_eq!(session.state().total_possible_marks, 10.0);
        assert!(session.timer().is_active());
        assert_eq!(sink.rounds, vec![0]);
        assert_eq!(sink.questions, vec![(0, 0)]);
        assert_eq!(sink.timers, vec!["01:00"]);
    }

    #[test]
    fn load_twice_is_rejected() {
        let (mut session, mut sink) = started(vec![round("One", 1, 10.0, &["A"])]);
        let err = session
            .load(QuizDefinition::new(vec![round("Two", 1, 5.0, &["B"])]), &mut sink)
            .unwrap_err();
        assert_eq!(err, SessionError::AlreadyLoaded);
        assert_eq!(session.state().total_possible_marks, 10.0);
    }

    #[test]
    fn perfect_single_round_goes_to_vellore() {
        let (mut session, mut sink) = started(vec![round("One", 1, 10.0, &["A", "B"])]);

        let first = session.submit_answer(Some("A"), &mut sink).unwrap();
        assert!(first.correct);
        assert_eq!(first.credit, 5.0);
        session.submit_answer(Some("B"), &mut sink).unwrap();

        assert_eq!(session.phase(), Phase::Ended);
        let outcome = session.outcome().unwrap();
        assert_eq!(outcome.accumulated_score, 10.0);
        assert_eq!(outcome.normalized_score, 10.0);
        assert_eq!(outcome.tier, AdmissionTier::Vellore);
        assert_eq!(sink.results.len(), 1);
        assert!(!session.timer().is_active());
    }

    #[test]
    fn seven_of_ten_marks_goes_to_amravati() {
        // Round one: 5 questions worth 1 each, round two: 2 questions worth 2.5
        let (mut session, mut sink) = started(vec![
            round("One", 1, 5.0, &["A", "A", "A", "A", "A"]),
            round("Two", 1, 5.0, &["B", "B"]),
        ]);

        for choice in ["A", "A", "A", "A", "C"] {
            session.submit_answer(Some(choice), &mut sink).unwrap();
        }
        assert_eq!(session.state().round_index, 1);
        for choice in ["B", "D"] {
            session.submit_answer(Some(choice), &mut sink).unwrap();
        }

        let outcome = session.outcome().unwrap();
        assert_eq!(outcome.accumulated_score, 6.5);
        assert_eq!(outcome.normalized_score, 6.5);
        assert_eq!(outcome.tier, AdmissionTier::NotAdmitted);

        let (mut session, mut sink) = started(vec![
            round("One", 1, 5.0, &["A", "A", "A", "A", "A"]),
            round("Two", 1, 5.0, &["B", "B", "B", "B", "B"]),
        ]);
        for choice in ["A", "A", "A", "A", "A", "B", "B", "C", "C", "C"] {
            session.submit_answer(Some(choice), &mut sink).unwrap();
        }
        let outcome = session.outcome().unwrap();
        assert_eq!(outcome.accumulated_score, 7.0);
        assert_eq!(outcome.normalized_score, 7.0);
        assert_eq!(outcome.tier, AdmissionTier::Amravati);
    }

    #[test]
    fn missing_selection_prompts_without_changing_state() {
        let (mut session, mut sink) = started(vec![round("One", 1, 10.0, &["A", "B"])]);
        let before = session.state().clone();

        let err = session.submit_answer(None, &mut sink).unwrap_err();

        assert_eq!(err, SessionError::NoSelection);
        assert_eq!(session.state(), &before);
        assert_eq!(sink.prompts, vec![NO_SELECTION_MESSAGE]);
        assert_eq!(sink.questions, vec![(0, 0)]);
    }

    #[test]
    fn unknown_choice_is_rejected() {
        let (mut session, mut sink) = started(vec![round("One", 1, 10.0, &["A"])]);
        let err = session.submit_answer(Some("Z"), &mut sink).unwrap_err();
        assert_eq!(err, SessionError::UnknownChoice("Z".to_string()));
        assert_eq!(session.state().question_index, 0);
    }

    #[test]
    fn answers_are_compared_exactly() {
        let mut lower = question("A");
        lower.options.push(AnswerOption::from_label("a. lowercase").unwrap());
        let (mut session, mut sink) = started(vec![Round {
            title: "Case".to_string(),
            time_limit_seconds: 60,
            marks: 1.0,
            questions: vec![lower],
        }]);

        let outcome = session.submit_answer(Some("a"), &mut sink).unwrap();
        assert!(!outcome.correct);
        assert_eq!(session.state().accumulated_score, 0.0);
    }

    #[test]
    fn countdown_expiry_ends_round_without_scoring_the_rest() {
        let (mut session, mut sink) = started(vec![
            round("One", 1, 9.0, &["A", "A", "A"]),
            round("Two", 1, 1.0, &["B"]),
        ]);
        session.submit_answer(Some("A"), &mut sink).unwrap();

        let expiries = expire_round(&mut session, &mut sink);

        assert_eq!(expiries, 1);
        assert_eq!(session.phase(), Phase::RoundActive);
        assert_eq!(session.state().round_index, 1);
        assert_eq!(session.state().question_index, 0);
        assert_eq!(session.state().accumulated_score, 3.0);
        assert_eq!(session.state().remaining_seconds(), 60);
        assert_eq!(sink.rounds, vec![0, 1]);
    }

    #[test]
    fn countdown_renders_every_second() {
        let (mut session, mut sink) = started(vec![round("One", 1, 1.0, &["A"])]);
        let generation = session.timer().generation;

        session.tick(generation, &mut sink);
        session.tick(generation, &mut sink);

        assert_eq!(sink.timers, vec!["01:00", "00:59", "00:58"]);
        assert_eq!(session.state().remaining_seconds(), 58);
    }

    #[test]
    fn stale_ticks_do_not_touch_the_new_round() {
        let (mut session, mut sink) = started(vec![
            round("One", 1, 1.0, &["A"]),
            round("Two", 2, 1.0, &["A"]),
        ]);
        let old_generation = session.timer().generation;
        session.submit_answer(Some("A"), &mut sink).unwrap();
        assert_eq!(session.state().round_index, 1);

        for _ in 0..200 {
            assert_eq!(session.tick(old_generation, &mut sink), Tick::Ignored);
        }
        assert_eq!(session.state().remaining_seconds(), 120);
        assert_eq!(session.state().round_index, 1);
    }

    #[test]
    fn zero_minute_round_expires_on_first_tick() {
        let (mut session, mut sink) = started(vec![round("Flash", 0, 2.0, &["A"])]);
        let generation = session.timer().generation;

        assert_eq!(session.tick(generation, &mut sink), Tick::Expired);
        assert_eq!(session.phase(), Phase::Ended);
        assert_eq!(session.outcome().unwrap().normalized_score, 0.0);
    }

    #[test]
    fn rounds_start_strictly_in_sequence() {
        let (mut session, mut sink) = started(vec![
            round("One", 1, 2.0, &["A", "B"]),
            round("Two", 1, 2.0, &["C"]),
            round("Three", 1, 2.0, &["D", "A"]),
            round("Four", 1, 2.0, &["B"]),
        ]);

        session.submit_answer(Some("A"), &mut sink).unwrap();
        session.submit_answer(Some("B"), &mut sink).unwrap();
        expire_round(&mut session, &mut sink);
        session.submit_answer(Some("D"), &mut sink).unwrap();
        session.advance_round(&mut sink).unwrap();
        session.submit_answer(Some("B"), &mut sink).unwrap();

        assert_eq!(sink.rounds, vec![0, 1, 2, 3]);
        assert_eq!(session.phase(), Phase::Ended);
    }

    #[test]
    fn score_never_decreases() {
        let (mut session, mut sink) = started(vec![
            round("One", 1, 3.0, &["A", "B", "C"]),
            round("Two", 1, 4.0, &["D", "A"]),
        ]);
        let mut last = 0.0;
        for choice in ["A", "C", "C", "A", "A"] {
            session.submit_answer(Some(choice), &mut sink).unwrap();
            let score = session.state().accumulated_score;
            assert!(score >= last);
            last = score;
        }
        assert_eq!(session.phase(), Phase::Ended);
    }

    #[test]
    fn empty_definition_ends_immediately_with_zero() {
        let (session, sink) = started(Vec::new());

        assert_eq!(session.phase(), Phase::Ended);
        let outcome = session.outcome().unwrap();
        assert_eq!(outcome.normalized_score, 0.0);
        assert_eq!(outcome.tier, AdmissionTier::NotAdmitted);
        assert!(sink.rounds.is_empty());
    }

    #[test]
    fn rounds_without_questions_are_skipped() {
        let (session, sink) = started(vec![
            round("Empty", 1, 4.0, &[]),
            round("Real", 1, 6.0, &["A"]),
        ]);

        assert_eq!(session.state().round_index, 1);
        assert_eq!(session.state().total_possible_marks, 10.0);
        assert_eq!(sink.rounds, vec![0, 1]);
        assert_eq!(sink.questions, vec![(1, 0)]);
    }

    #[test]
    fn ended_session_accepts_no_transitions() {
        let (mut session, mut sink) = started(vec![round("One", 1, 1.0, &["A"])]);
        session.submit_answer(Some("A"), &mut sink).unwrap();
        assert_eq!(session.phase(), Phase::Ended);

        assert_eq!(session.submit_answer(Some("A"), &mut sink), Err(SessionError::NotActive));
        assert_eq!(session.advance_round(&mut sink), Err(SessionError::NotActive));
        assert_eq!(session.tick(session.timer().generation, &mut sink), Tick::Ignored);
        assert_eq!(sink.results.len(), 1);
    }

    #[test]
    fn idle_session_rejects_answers() {
        let mut session = QuizSession::new();
        let mut sink = RecordingSink::default();
        assert_eq!(session.submit_answer(Some("A"), &mut sink), Err(SessionError::NotActive));
        assert_eq!(session.phase(), Phase::Idle);
    }
}
