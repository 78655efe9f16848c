//! The financial-literacy course: levels, modules, lessons and quizzes.
//!
//! A curriculum is static configuration. It is built once at startup and
//! never mutated; progress lives in [`CompletedLessons`](crate::CompletedLessons).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{LessonId, ModuleId, ValidationError, rounded_percentage};

/// Course difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Level {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(ValidationError::UnknownVariant {
                kind: "level",
                value: s.to_string(),
            }),
        }
    }
}

/// The whole course, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curriculum {
    pub levels: Vec<CourseLevel>,
}

/// One difficulty tier of the course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseLevel {
    pub level: Level,
    pub title: String,
    pub modules: Vec<Module>,
}

/// A themed group of lessons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub title: String,
    pub lessons: Vec<Lesson>,
}

/// A single lesson, optionally closed by a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Quiz>,
}

/// A lesson's entry in the flattened course, with its parents.
#[derive(Debug, Clone, Copy)]
pub struct LessonEntry<'a> {
    pub level: &'a CourseLevel,
    pub module: &'a Module,
    pub lesson: &'a Lesson,
}

impl Curriculum {
    /// Every lesson with its level and module, in unlock order.
    pub fn entries(&self) -> impl Iterator<Item = LessonEntry<'_>> {
        self.levels.iter().flat_map(|level| {
            level.modules.iter().flat_map(move |module| {
                module.lessons.iter().map(move |lesson| LessonEntry {
                    level,
                    module,
                    lesson,
                })
            })
        })
    }

    /// Looks up a lesson by ID.
    pub fn entry(&self, lesson_id: &str) -> Option<LessonEntry<'_>> {
        self.entries().find(|e| e.lesson.id.as_str() == lesson_id)
    }

    /// Looks up a level by tier.
    pub fn level(&self, level: Level) -> Option<&CourseLevel> {
        self.levels.iter().find(|l| l.level == level)
    }

    /// Looks up a module by ID.
    pub fn module(&self, module_id: &str) -> Option<&Module> {
        self.levels
            .iter()
            .flat_map(|l| &l.modules)
            .find(|m| m.id.as_str() == module_id)
    }

    /// The course shipped with the app.
    #[allow(clippy::too_many_lines)]
    pub fn builtin() -> Self {
        Self {
            levels: vec![
                level(
                    Level::Beginner,
                    "Money Foundations",
                    vec![
                        module(
                            "budgeting-basics",
                            "Budgeting Basics",
                            vec![
                                lesson("b-1-1", "Why every family needs a budget").with_quiz(quiz(&[
                                    (
                                        "What is the main purpose of a household budget?",
                                        &[
                                            "To restrict all spending",
                                            "To plan where money goes",
                                            "To track the stock market",
                                        ],
                                        1,
                                    ),
                                    (
                                        "How often should a family budget be reviewed?",
                                        &["Once a year", "Regularly, at least monthly", "Never"],
                                        1,
                                    ),
                                ])),
                                lesson("b-1-2", "Needs versus wants"),
                                lesson("b-1-3", "The 50/30/20 rule").with_quiz(quiz(&[(
                                    "Under 50/30/20, what share of income goes to savings?",
                                    &["50%", "30%", "20%"],
                                    2,
                                )])),
                            ],
                        ),
                        module(
                            "saving-habits",
                            "Saving Habits",
                            vec![
                                lesson("b-2-1", "Pay yourself first"),
                                lesson("b-2-2", "Building an emergency fund").with_quiz(quiz(&[(
                                    "How many months of expenses should an emergency fund hold?",
                                    &["One week", "Three to six months", "Five years"],
                                    1,
                                )])),
                            ],
                        ),
                    ],
                ),
                level(
                    Level::Intermediate,
                    "Growing Your Money",
                    vec![
                        module(
                            "managing-debt",
                            "Managing Debt",
                            vec![
                                lesson("i-1-1", "Good debt and bad debt"),
                                lesson("i-1-2", "Paying down credit cards").with_quiz(quiz(&[(
                                    "Which balance does the avalanche method pay first?",
                                    &["The smallest", "The highest interest rate", "The newest"],
                                    1,
                                )])),
                            ],
                        ),
                        module(
                            "kids-and-money",
                            "Kids and Money",
                            vec![
                                lesson("i-2-1", "Pocket money that teaches"),
                                lesson("i-2-2", "Saving for education"),
                            ],
                        ),
                    ],
                ),
                level(
                    Level::Advanced,
                    "Long-Term Wealth",
                    vec![
                        module(
                            "investing",
                            "Investing",
                            vec![
                                lesson("a-1-1", "The power of compound interest").with_quiz(quiz(&[(
                                    "Compound interest is earned on...",
                                    &[
                                        "The original deposit only",
                                        "The deposit plus earned interest",
                                        "Fees",
                                    ],
                                    1,
                                )])),
                                lesson("a-1-2", "Index funds explained"),
                            ],
                        ),
                        module(
                            "protecting-family",
                            "Protecting Your Family",
                            vec![
                                lesson("a-2-1", "Insurance for families"),
                                lesson("a-2-2", "Writing a will"),
                            ],
                        ),
                    ],
                ),
            ],
        }
    }
}

fn level(level: Level, title: &str, modules: Vec<Module>) -> CourseLevel {
    CourseLevel {
        level,
        title: title.to_string(),
        modules,
    }
}

fn module(id: &'static str, title: &str, lessons: Vec<Lesson>) -> Module {
    Module {
        id: ModuleId::from_static(id),
        title: title.to_string(),
        lessons,
    }
}

fn lesson(id: &'static str, title: &str) -> Lesson {
    Lesson {
        id: LessonId::from_static(id),
        title: title.to_string(),
        quiz: None,
    }
}

fn quiz(questions: &[(&str, &[&str], usize)]) -> Quiz {
    Quiz {
        questions: questions
            .iter()
            .map(|(prompt, options, answer)| Question {
                prompt: (*prompt).to_string(),
                options: options.iter().map(|o| (*o).to_string()).collect(),
                answer: *answer,
            })
            .collect(),
        pass_percentage: Quiz::DEFAULT_PASS_PERCENTAGE,
    }
}

impl Lesson {
    fn with_quiz(mut self, quiz: Quiz) -> Self {
        self.quiz = Some(quiz);
        self
    }
}

/// Multiple-choice questions closing a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<Question>,
    /// Minimum score, in percent, that counts as a pass.
    #[serde(default = "Quiz::default_pass_percentage")]
    pub pass_percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub answer: usize,
}

/// Result of grading one quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizOutcome {
    pub correct: usize,
    pub total: usize,
    pub percentage: u8,
    pub passed: bool,
}

impl Quiz {
    pub const DEFAULT_PASS_PERCENTAGE: u8 = 70;

    const fn default_pass_percentage() -> u8 {
        Self::DEFAULT_PASS_PERCENTAGE
    }

    /// Grades answers given in question order.
    ///
    /// Missing answers count as wrong and extra answers are ignored. A quiz
    /// with no questions always passes.
    pub fn grade(&self, answers: &[usize]) -> QuizOutcome {
        let total = self.questions.len();
        let correct = self
            .questions
            .iter()
            .zip(answers)
            .filter(|(q, a)| q.answer == **a)
            .count();
        let percentage = rounded_percentage(correct as u128, total as u128);
        QuizOutcome {
            correct,
            total,
            percentage,
            passed: total == 0 || percentage >= self.pass_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn builtin_lesson_ids_are_unique() {
        let course = Curriculum::builtin();
        let ids: Vec<&str> = course.entries().map(|e| e.lesson.id.as_str()).collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
        assert_eq!(ids.first().copied(), Some("b-1-1"));
    }

    #[test]
    fn builtin_starts_with_beginner_level() {
        let course = Curriculum::builtin();
        let levels: Vec<Level> = course.levels.iter().map(|l| l.level).collect();
        assert_eq!(levels, [Level::Beginner, Level::Intermediate, Level::Advanced]);
    }

    #[test]
    fn builtin_quiz_answers_point_at_options() {
        let course = Curriculum::builtin();
        for entry in course.entries() {
            let Some(quiz) = &entry.lesson.quiz else {
                continue;
            };
            for q in &quiz.questions {
                assert!(q.answer < q.options.len(), "bad answer in {}", entry.lesson.id);
            }
        }
    }

    #[test]
    fn entry_reports_parents() {
        let course = Curriculum::builtin();
        let entry = course.entry("i-2-1").expect("lesson exists");
        assert_eq!(entry.level.level, Level::Intermediate);
        assert_eq!(entry.module.id.as_str(), "kids-and-money");
        assert!(course.entry("nope").is_none());
        assert!(course.module("investing").is_some());
        assert!(course.module("nope").is_none());
    }

    #[test]
    fn level_parses_and_displays() {
        for level in [Level::Beginner, Level::Intermediate, Level::Advanced] {
            assert_eq!(level.to_string().parse::<Level>().unwrap(), level);
        }
        assert!("expert".parse::<Level>().is_err());
    }

    fn two_question_quiz() -> Quiz {
        quiz(&[("q1", &["a", "b"], 0), ("q2", &["a", "b", "c"], 2)])
    }

    #[test]
    fn quiz_passes_with_all_correct() {
        let outcome = two_question_quiz().grade(&[0, 2]);
        assert_eq!(
            outcome,
            QuizOutcome {
                correct: 2,
                total: 2,
                percentage: 100,
                passed: true
            }
        );
    }

    #[test]
    fn quiz_fails_below_threshold() {
        let outcome = two_question_quiz().grade(&[0, 1]);
        assert_eq!(outcome.correct, 1);
        assert_eq!(outcome.percentage, 50);
        assert!(!outcome.passed);
    }

    #[test]
    fn quiz_counts_missing_answers_as_wrong() {
        let outcome = two_question_quiz().grade(&[0]);
        assert_eq!((outcome.correct, outcome.total), (1, 2));
        assert!(!outcome.passed);

        let outcome = two_question_quiz().grade(&[0, 2, 1, 1]);
        assert!(outcome.passed);
    }

    #[test]
    fn empty_quiz_always_passes() {
        let quiz = Quiz {
            questions: Vec::new(),
            pass_percentage: 70,
        };
        assert!(quiz.grade(&[]).passed);
    }
}
