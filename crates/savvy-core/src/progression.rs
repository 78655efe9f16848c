//! Lesson unlock and progress tracking.
//!
//! The course is one linear chain: flatten levels, then modules, then lessons
//! in declaration order. Lesson `k + 1` unlocks once lesson `k` is complete,
//! regardless of module or level boundaries. Premium gating is separate and
//! depends only on which level a lesson belongs to.
//!
//! Every query is total. Unknown lesson IDs answer `false`, `None` or zero
//! progress rather than erroring.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::curriculum::{Curriculum, Lesson, Level};
use crate::types::{LessonId, Progress};

/// Lessons the user has finished.
///
/// Only ever grows; see [`CompletedLessons::mark_complete`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletedLessons(BTreeSet<LessonId>);

impl CompletedLessons {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, lesson_id: &str) -> bool {
        self.0.contains(lesson_id)
    }

    /// Records a lesson as complete. Returns `false` if it already was.
    pub fn mark_complete(&mut self, lesson_id: LessonId) -> bool {
        self.0.insert(lesson_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<LessonId> for CompletedLessons {
    fn from_iter<I: IntoIterator<Item = LessonId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Observable state of a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonState {
    /// The previous lesson in the chain is not complete.
    Locked,
    /// Reachable but not yet finished.
    Unlocked,
    /// Finished. Never returns to another state.
    Completed,
}

impl fmt::Display for LessonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
            Self::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

/// Why a lesson cannot be opened.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessDenied {
    #[error("unknown lesson: {0}")]
    UnknownLesson(String),

    #[error("lesson {0} is locked; finish the previous lesson first")]
    Locked(String),

    #[error("lesson {0} requires Savvy Premium")]
    PremiumRequired(String),
}

impl Curriculum {
    /// Lesson IDs in unlock order.
    pub fn flatten_order(&self) -> Vec<&LessonId> {
        self.entries().map(|e| &e.lesson.id).collect()
    }

    /// Whether a lesson can be opened under the unlock chain.
    ///
    /// The first lesson is always unlocked. Any other lesson is unlocked when
    /// it is already complete or its predecessor is.
    pub fn is_unlocked(&self, lesson_id: &str, completed: &CompletedLessons) -> bool {
        let order = self.flatten_order();
        match order.iter().position(|id| id.as_str() == lesson_id) {
            None => false,
            Some(0) => true,
            Some(i) => completed.contains(lesson_id) || completed.contains(order[i - 1].as_str()),
        }
    }

    /// The first lesson in unlock order that is not complete.
    pub fn first_incomplete(&self, completed: &CompletedLessons) -> Option<&Lesson> {
        self.entries()
            .map(|e| e.lesson)
            .find(|lesson| !completed.contains(lesson.id.as_str()))
    }

    /// Progress across the whole course.
    pub fn course_progress(&self, completed: &CompletedLessons) -> Progress {
        scoped_progress(self.entries().map(|e| &e.lesson.id), completed)
    }

    /// Progress within one level. Zero when the level is not in the course.
    pub fn level_progress(&self, level: Level, completed: &CompletedLessons) -> Progress {
        self.level(level).map_or(Progress::NONE, |l| {
            scoped_progress(
                l.modules.iter().flat_map(|m| &m.lessons).map(|lesson| &lesson.id),
                completed,
            )
        })
    }

    /// Progress within one module. Zero when the module is not in the course.
    pub fn module_progress(&self, module_id: &str, completed: &CompletedLessons) -> Progress {
        self.module(module_id).map_or(Progress::NONE, |m| {
            scoped_progress(m.lessons.iter().map(|lesson| &lesson.id), completed)
        })
    }

    /// Whether a lesson sits behind the paywall.
    ///
    /// Everything outside the first declared level is premium. This says
    /// nothing about the unlock chain: a premium lesson may be unlocked.
    pub fn is_premium(&self, lesson_id: &str) -> bool {
        let Some(first) = self.levels.first() else {
            return false;
        };
        self.entry(lesson_id)
            .is_some_and(|e| e.level.level != first.level)
    }

    /// Current state of a lesson, or `None` for unknown IDs.
    pub fn lesson_state(
        &self,
        lesson_id: &str,
        completed: &CompletedLessons,
    ) -> Option<LessonState> {
        self.entry(lesson_id)?;
        Some(if completed.contains(lesson_id) {
            LessonState::Completed
        } else if self.is_unlocked(lesson_id, completed) {
            LessonState::Unlocked
        } else {
            LessonState::Locked
        })
    }

    /// Checks both the unlock chain and the paywall before a lesson is opened.
    pub fn check_access(
        &self,
        lesson_id: &str,
        completed: &CompletedLessons,
        premium_active: bool,
    ) -> Result<&Lesson, AccessDenied> {
        let entry = self
            .entry(lesson_id)
            .ok_or_else(|| AccessDenied::UnknownLesson(lesson_id.to_string()))?;
        if !self.is_unlocked(lesson_id, completed) {
            return Err(AccessDenied::Locked(lesson_id.to_string()));
        }
        if !premium_active && self.is_premium(lesson_id) {
            return Err(AccessDenied::PremiumRequired(lesson_id.to_string()));
        }
        Ok(entry.lesson)
    }
}

fn scoped_progress<'a>(
    scope: impl Iterator<Item = &'a LessonId>,
    completed: &CompletedLessons,
) -> Progress {
    let (done, total) = scope.fold((0, 0), |(done, total), id| {
        (done + usize::from(completed.contains(id.as_str())), total + 1)
    });
    Progress::new(done, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::{CourseLevel, Module};
    use crate::types::ModuleId;

    fn id(s: &str) -> LessonId {
        LessonId::new(s).unwrap()
    }

    fn done(ids: &[&str]) -> CompletedLessons {
        ids.iter().map(|s| id(s)).collect()
    }

    fn lesson(s: &str) -> Lesson {
        Lesson {
            id: id(s),
            title: s.to_uppercase(),
            quiz: None,
        }
    }

    fn three_lesson_course() -> Curriculum {
        Curriculum {
            levels: vec![CourseLevel {
                level: Level::Beginner,
                title: "Basics".into(),
                modules: vec![Module {
                    id: ModuleId::new("m1").unwrap(),
                    title: "Module".into(),
                    lessons: vec![lesson("L1"), lesson("L2"), lesson("L3")],
                }],
            }],
        }
    }

    #[test]
    fn three_lesson_example() {
        let course = three_lesson_course();
        let completed = done(&["L1"]);

        assert!(course.is_unlocked("L2", &completed));
        assert!(!course.is_unlocked("L3", &completed));
        assert_eq!(course.first_incomplete(&completed).map(|l| l.id.as_str()), Some("L2"));
        assert_eq!(course.course_progress(&completed), Progress::new(1, 3));
        assert_eq!(course.course_progress(&completed).percentage, 33);
    }

    #[test]
    fn first_lesson_is_always_unlocked() {
        let course = Curriculum::builtin();
        for completed in [done(&[]), done(&["b-1-2"]), done(&["a-2-2", "zzz"])] {
            assert!(course.is_unlocked("b-1-1", &completed));
        }
    }

    #[test]
    fn unlock_follows_chain_rule_for_every_lesson() {
        let course = Curriculum::builtin();
        let order: Vec<String> = course
            .flatten_order()
            .into_iter()
            .map(|id| id.as_str().to_string())
            .collect();
        let completed = done(&["b-1-1", "b-1-3", "b-2-2", "i-2-1", "a-2-2"]);

        for (i, lesson_id) in order.iter().enumerate().skip(1) {
            let expected = completed.contains(lesson_id) || completed.contains(&order[i - 1]);
            assert_eq!(
                course.is_unlocked(lesson_id, &completed),
                expected,
                "unlock mismatch for {lesson_id}"
            );
        }
    }

    #[test]
    fn chain_crosses_module_and_level_boundaries() {
        let course = Curriculum::builtin();
        // b-2-1 opens the second module, i-1-1 the second level.
        assert!(course.is_unlocked("b-2-1", &done(&["b-1-3"])));
        assert!(!course.is_unlocked("b-2-1", &done(&["b-1-1", "b-1-2"])));
        assert!(course.is_unlocked("i-1-1", &done(&["b-2-2"])));
    }

    #[test]
    fn completed_lesson_stays_unlocked_without_predecessor() {
        let course = three_lesson_course();
        let completed = done(&["L3"]);
        assert!(course.is_unlocked("L3", &completed));
        assert_eq!(course.lesson_state("L3", &completed), Some(LessonState::Completed));
        assert_eq!(course.lesson_state("L2", &completed), Some(LessonState::Locked));
    }

    #[test]
    fn unknown_lessons_get_negative_answers() {
        let course = three_lesson_course();
        let completed = done(&["L1", "ghost"]);
        assert!(!course.is_unlocked("ghost", &completed));
        assert!(!course.is_premium("ghost"));
        assert_eq!(course.lesson_state("ghost", &completed), None);
        assert_eq!(course.module_progress("ghost", &completed), Progress::NONE);
        assert_eq!(course.level_progress(Level::Advanced, &completed), Progress::NONE);
    }

    #[test]
    fn unknown_ids_in_completed_set_are_not_counted() {
        let course = three_lesson_course();
        let completed = done(&["L1", "ghost", "other"]);
        assert_eq!(course.course_progress(&completed), Progress::new(1, 3));
    }

    #[test]
    fn first_incomplete_is_none_when_course_done() {
        let course = three_lesson_course();
        assert!(course.first_incomplete(&done(&["L1", "L2", "L3"])).is_none());
        assert_eq!(
            course.first_incomplete(&done(&[])).map(|l| l.id.as_str()),
            Some("L1")
        );
        // Gaps are found even when later lessons are done.
        assert_eq!(
            course.first_incomplete(&done(&["L1", "L3"])).map(|l| l.id.as_str()),
            Some("L2")
        );
    }

    #[test]
    fn empty_course_has_zero_progress() {
        let course = Curriculum { levels: Vec::new() };
        assert_eq!(course.course_progress(&done(&["L1"])), Progress::NONE);
        assert!(course.first_incomplete(&done(&[])).is_none());
        assert!(!course.is_premium("L1"));
    }

    #[test]
    fn percentage_is_monotonic_and_reaches_hundred_only_when_complete() {
        let course = Curriculum::builtin();
        let order: Vec<LessonId> = course.flatten_order().into_iter().cloned().collect();
        let mut completed = CompletedLessons::new();
        let mut last = course.course_progress(&completed).percentage;
        assert_eq!(last, 0);

        // Complete in reverse so partial sets are not prefixes of the chain.
        for (n, lesson_id) in order.iter().rev().enumerate() {
            completed.mark_complete(lesson_id.clone());
            let pct = course.course_progress(&completed).percentage;
            assert!(pct >= last, "progress went backwards at {lesson_id}");
            assert!(pct <= 100);
            assert_eq!(pct == 100, n + 1 == order.len());
            last = pct;
        }
    }

    #[test]
    fn level_and_module_progress_are_scoped() {
        let course = Curriculum::builtin();
        let completed = done(&["b-1-1", "b-1-2", "b-1-3", "i-1-1"]);

        let beginner = course.level_progress(Level::Beginner, &completed);
        assert_eq!((beginner.completed, beginner.total, beginner.percentage), (3, 5, 60));

        let intermediate = course.level_progress(Level::Intermediate, &completed);
        assert_eq!((intermediate.completed, intermediate.total), (1, 4));

        let module = course.module_progress("budgeting-basics", &completed);
        assert!(module.is_complete());
    }

    #[test]
    fn premium_is_everything_outside_first_level() {
        let course = Curriculum::builtin();
        assert!(!course.is_premium("b-1-1"));
        assert!(!course.is_premium("b-2-2"));
        assert!(course.is_premium("i-1-1"));
        assert!(course.is_premium("a-2-2"));
    }

    #[test]
    fn premium_lesson_can_be_unlocked_yet_paywalled() {
        let course = Curriculum::builtin();
        let completed = done(&["b-1-1", "b-1-2", "b-1-3", "b-2-1", "b-2-2"]);

        assert!(course.is_unlocked("i-1-1", &completed));
        assert_eq!(
            course.check_access("i-1-1", &completed, false),
            Err(AccessDenied::PremiumRequired("i-1-1".into()))
        );
        let lesson = course.check_access("i-1-1", &completed, true).unwrap();
        assert_eq!(lesson.id.as_str(), "i-1-1");
    }

    #[test]
    fn access_check_reports_locked_before_paywall() {
        let course = Curriculum::builtin();
        assert_eq!(
            course.check_access("i-1-2", &done(&[]), false),
            Err(AccessDenied::Locked("i-1-2".into()))
        );
        assert_eq!(
            course.check_access("nope", &done(&[]), true),
            Err(AccessDenied::UnknownLesson("nope".into()))
        );
    }

    #[test]
    fn mark_complete_is_idempotent() {
        let mut completed = CompletedLessons::new();
        assert!(completed.mark_complete(id("L1")));
        assert!(!completed.mark_complete(id("L1")));
        assert_eq!(completed.len(), 1);
    }

    #[test]
    fn lesson_state_transitions() {
        let course = three_lesson_course();
        let mut completed = CompletedLessons::new();
        assert_eq!(course.lesson_state("L2", &completed), Some(LessonState::Locked));

        completed.mark_complete(id("L1"));
        assert_eq!(course.lesson_state("L2", &completed), Some(LessonState::Unlocked));

        completed.mark_complete(id("L2"));
        assert_eq!(course.lesson_state("L2", &completed), Some(LessonState::Completed));
    }

    #[test]
    fn completed_lessons_serialize_as_sorted_list() {
        let completed = done(&["b", "a"]);
        let json = serde_json::to_string(&completed).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
        let parsed: CompletedLessons = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, completed);
    }
}
