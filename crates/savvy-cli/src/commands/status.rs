//! Status command for showing where data lives and how much of it there is.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use savvy_store::Store;

pub fn run<W: Write>(writer: &mut W, store: &Store, database_path: &Path) -> Result<()> {
    writeln!(writer, "Savvy status")?;
    writeln!(writer, "Database: {}", database_path.display())?;

    if store.keys()?.is_empty() {
        writeln!(writer, "Nothing stored yet.")?;
        return Ok(());
    }

    writeln!(writer, "Calendar events: {}", store.calendar_events()?.len())?;
    writeln!(writer, "Completed lessons: {}", store.completed_lessons()?.len())?;
    writeln!(writer, "Budget entries: {}", store.budget_entries()?.len())?;
    writeln!(writer, "Savings goals: {}", store.savings_goals()?.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use insta::assert_snapshot;
    use savvy_core::{CalendarEvent, EventId, LessonId};

    #[test]
    fn status_on_empty_store() {
        let store = Store::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(&mut output, &store, Path::new("/data/savvy.db")).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        Savvy status
        Database: /data/savvy.db
        Nothing stored yet.
        ");
    }

    #[test]
    fn status_counts_documents() {
        let mut store = Store::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        store
            .save_event(CalendarEvent::new(EventId::new("e1").unwrap(), "Dentist", date))
            .unwrap();
        store
            .save_event(CalendarEvent::new(EventId::new("e2").unwrap(), "Swim", date))
            .unwrap();
        store.mark_lesson_complete(LessonId::new("b-1-1").unwrap()).unwrap();

        let mut output = Vec::new();
        run(&mut output, &store, Path::new("/data/savvy.db")).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        Savvy status
        Database: /data/savvy.db
        Calendar events: 2
        Completed lessons: 1
        Budget entries: 0
        Savings goals: 0
        ");
    }
}
