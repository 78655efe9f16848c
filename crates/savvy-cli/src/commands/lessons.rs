//! Lesson commands: browse the course, open lessons, take quizzes.

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Args;

use savvy_core::{CompletedLessons, Curriculum, Lesson, LessonState};
use savvy_store::Store;

#[derive(Debug, Args)]
pub struct QuizArgs {
    /// Lesson ID.
    pub id: String,

    /// Chosen option index per question, in order (e.g., 1,0,2).
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub answers: Vec<usize>,
}

pub fn list<W: Write>(
    writer: &mut W,
    store: &Store,
    curriculum: &Curriculum,
    premium_active: bool,
) -> Result<()> {
    let completed = store.completed_lessons()?;

    for level in &curriculum.levels {
        let locked_behind_paywall = !premium_active
            && level
                .modules
                .iter()
                .flat_map(|m| &m.lessons)
                .next()
                .is_some_and(|l| curriculum.is_premium(l.id.as_str()));
        let suffix = if locked_behind_paywall { " (premium)" } else { "" };
        writeln!(writer, "{}: {}{suffix}", capitalize(level.level.as_str()), level.title)?;

        for module in &level.modules {
            let progress = curriculum.module_progress(module.id.as_str(), &completed);
            writeln!(
                writer,
                "  {} ({}/{})",
                module.title, progress.completed, progress.total
            )?;
            for lesson in &module.lessons {
                let state = curriculum
                    .lesson_state(lesson.id.as_str(), &completed)
                    .unwrap_or(LessonState::Locked);
                writeln!(writer, "    {} {}  {}", marker(state), lesson.id, lesson.title)?;
            }
        }
    }

    let course = curriculum.course_progress(&completed);
    writeln!(
        writer,
        "Progress: {}/{} ({}%)",
        course.completed, course.total, course.percentage
    )?;
    Ok(())
}

/// Shows a lesson and its quiz, if the lesson may be opened.
pub fn open<W: Write>(
    writer: &mut W,
    store: &Store,
    curriculum: &Curriculum,
    id: &str,
    premium_active: bool,
) -> Result<()> {
    let completed = store.completed_lessons()?;
    let lesson = curriculum.check_access(id, &completed, premium_active)?;

    writeln!(writer, "{}  {}", lesson.id, lesson.title)?;
    if completed.contains(id) {
        writeln!(writer, "Completed.")?;
    }
    match &lesson.quiz {
        None => {
            writeln!(writer, "No quiz. Mark it done with: savvy lessons complete {id}")?;
        }
        Some(quiz) => {
            writeln!(writer, "Quiz (pass mark {}%):", quiz.pass_percentage)?;
            for (n, question) in quiz.questions.iter().enumerate() {
                writeln!(writer, "{}. {}", n + 1, question.prompt)?;
                for (i, option) in question.options.iter().enumerate() {
                    writeln!(writer, "   [{i}] {option}")?;
                }
            }
            writeln!(writer, "Answer with: savvy lessons quiz {id} --answers <i,i,...>")?;
        }
    }
    Ok(())
}

pub fn complete<W: Write>(
    writer: &mut W,
    store: &mut Store,
    curriculum: &Curriculum,
    id: &str,
    premium_active: bool,
) -> Result<()> {
    let completed = store.completed_lessons()?;
    let lesson = curriculum.check_access(id, &completed, premium_active)?;
    record_completion(writer, store, curriculum, lesson)
}

pub fn quiz<W: Write>(
    writer: &mut W,
    store: &mut Store,
    curriculum: &Curriculum,
    args: &QuizArgs,
    premium_active: bool,
) -> Result<()> {
    let completed = store.completed_lessons()?;
    let lesson = curriculum.check_access(&args.id, &completed, premium_active)?;
    let Some(quiz) = &lesson.quiz else {
        bail!("lesson {} has no quiz", args.id);
    };
    if args.answers.len() != quiz.questions.len() {
        bail!(
            "expected {} answers, got {}",
            quiz.questions.len(),
            args.answers.len()
        );
    }

    let outcome = quiz.grade(&args.answers);
    tracing::debug!(lesson = %lesson.id, ?outcome, "quiz graded");
    writeln!(
        writer,
        "Score: {}/{} ({}%)",
        outcome.correct, outcome.total, outcome.percentage
    )?;
    if !outcome.passed {
        writeln!(
            writer,
            "Not passed; {}% needed. Try again.",
            quiz.pass_percentage
        )?;
        return Ok(());
    }
    writeln!(writer, "Passed!")?;
    record_completion(writer, store, curriculum, lesson)
}

fn record_completion<W: Write>(
    writer: &mut W,
    store: &mut Store,
    curriculum: &Curriculum,
    lesson: &Lesson,
) -> Result<()> {
    let newly = store
        .mark_lesson_complete(lesson.id.clone())
        .context("failed to record lesson completion")?;
    if newly {
        writeln!(writer, "Completed {}: {}", lesson.id, lesson.title)?;
    } else {
        writeln!(writer, "Lesson {} was already complete", lesson.id)?;
    }

    let completed = store.completed_lessons()?;
    write_next_up(writer, curriculum, &completed)
}

pub(crate) fn write_next_up<W: Write>(
    writer: &mut W,
    curriculum: &Curriculum,
    completed: &CompletedLessons,
) -> Result<()> {
    match curriculum.first_incomplete(completed) {
        Some(next) => writeln!(writer, "Next up: {}  {}", next.id, next.title)?,
        None => writeln!(writer, "Course complete!")?,
    }
    Ok(())
}

const fn marker(state: LessonState) -> &'static str {
    match state {
        LessonState::Completed => "[x]",
        LessonState::Unlocked => "[ ]",
        LessonState::Locked => "[-]",
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
