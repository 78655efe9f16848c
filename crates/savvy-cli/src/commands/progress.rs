//! Progress command for course completion per level and module.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use savvy_core::{Curriculum, Level, LessonId, ModuleId, Progress};
use savvy_store::Store;

use super::lessons::write_next_up;

#[derive(Debug, Serialize)]
struct ProgressReport<'a> {
    course: Progress,
    levels: Vec<LevelProgress>,
    modules: Vec<ModuleProgress<'a>>,
    next_lesson: Option<&'a LessonId>,
}

#[derive(Debug, Serialize)]
struct LevelProgress {
    level: Level,
    #[serde(flatten)]
    progress: Progress,
}

#[derive(Debug, Serialize)]
struct ModuleProgress<'a> {
    id: &'a ModuleId,
    title: &'a str,
    #[serde(flatten)]
    progress: Progress,
}

pub fn run<W: Write>(
    writer: &mut W,
    store: &Store,
    curriculum: &Curriculum,
    json: bool,
) -> Result<()> {
    let completed = store.completed_lessons()?;
    let course = curriculum.course_progress(&completed);

    if json {
        let report = ProgressReport {
            course,
            levels: curriculum
                .levels
                .iter()
                .map(|l| LevelProgress {
                    level: l.level,
                    progress: curriculum.level_progress(l.level, &completed),
                })
                .collect(),
            modules: curriculum
                .levels
                .iter()
                .flat_map(|l| &l.modules)
                .map(|m| ModuleProgress {
                    id: &m.id,
                    title: &m.title,
                    progress: curriculum.module_progress(m.id.as_str(), &completed),
                })
                .collect(),
            next_lesson: curriculum.first_incomplete(&completed).map(|l| &l.id),
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    writeln!(
        writer,
        "Course: {}/{} ({}%)",
        course.completed, course.total, course.percentage
    )?;
    for level in &curriculum.levels {
        let p = curriculum.level_progress(level.level, &completed);
        writeln!(
            writer,
            "  {:<13} {}/{} ({}%)",
            level.level.as_str(),
            p.completed,
            p.total,
            p.percentage
        )?;
    }
    write_next_up(writer, curriculum, &completed)
}
