//! Savings goal commands.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Args;

use savvy_core::{GoalId, Money, SavingsGoal};
use savvy_store::{Store, new_record_id};

use super::util::parse_date;

#[derive(Debug, Args)]
pub struct AddGoalArgs {
    /// What the family is saving for.
    pub name: String,

    /// Target amount (e.g., 1200).
    pub target: Money,

    /// Date to reach the target by.
    #[arg(long)]
    pub deadline: Option<String>,
}

#[derive(Debug, Args)]
pub struct SaveArgs {
    /// Goal ID.
    pub id: String,

    /// Amount put aside.
    pub amount: Money,
}

pub fn add<W: Write>(
    writer: &mut W,
    store: &mut Store,
    args: &AddGoalArgs,
    today: NaiveDate,
) -> Result<()> {
    let name = args.name.trim();
    if name.is_empty() {
        bail!("goal name cannot be empty");
    }
    if args.target <= Money::ZERO {
        bail!("target must be positive");
    }
    let deadline = args
        .deadline
        .as_deref()
        .map(|d| parse_date(d, today))
        .transpose()?;
    if deadline.is_some_and(|d| d < today) {
        bail!("deadline is in the past");
    }

    let goal = SavingsGoal {
        id: GoalId::new(new_record_id())?,
        name: name.to_string(),
        target: args.target,
        saved: Money::ZERO,
        deadline,
    };
    let line = format!("Created goal {}: {} ({})", goal.id, goal.name, goal.target);
    store
        .add_savings_goal(goal)
        .context("failed to save savings goal")?;
    writeln!(writer, "{line}")?;
    Ok(())
}

pub fn list<W: Write>(writer: &mut W, store: &Store) -> Result<()> {
    let goals = store.savings_goals()?;
    if goals.is_empty() {
        writeln!(writer, "No savings goals.")?;
        return Ok(());
    }
    for goal in &goals {
        writeln!(writer, "{}", describe(goal))?;
    }
    Ok(())
}

pub fn save<W: Write>(writer: &mut W, store: &mut Store, args: &SaveArgs) -> Result<()> {
    if args.amount <= Money::ZERO {
        bail!("amount must be positive");
    }
    let goal = store.deposit_to_goal(&args.id, args.amount)?;
    tracing::debug!(goal_id = %goal.id, saved = %goal.saved, "deposit recorded");

    writeln!(writer, "Saved {} towards {}", args.amount, goal.name)?;
    writeln!(writer, "{}", describe(&goal))?;
    if goal.remaining() == Money::ZERO {
        writeln!(writer, "Goal reached!")?;
    }
    Ok(())
}

fn describe(goal: &SavingsGoal) -> String {
    let deadline = goal
        .deadline
        .map(|d| format!("  by {d}"))
        .unwrap_or_default();
    format!(
        "{}  {}/{} ({}%){deadline}  {}",
        goal.name,
        goal.saved,
        goal.target,
        goal.percentage(),
        goal.id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn goal(id: &str, name: &str, target: i64, deadline: Option<NaiveDate>) -> SavingsGoal {
        SavingsGoal {
            id: GoalId::new(id).unwrap(),
            name: name.to_string(),
            target: Money::from_cents(target),
            saved: Money::ZERO,
            deadline,
        }
    }

    #[test]
    fn add_creates_goal_with_deadline() {
        let mut store = Store::open_in_memory().unwrap();
        let args = AddGoalArgs {
            name: "Summer holiday".to_string(),
            target: Money::from_cents(200_000),
            deadline: Some("2026-07-01".to_string()),
        };
        add(&mut Vec::new(), &mut store, &args, today()).unwrap();

        let goals = store.savings_goals().unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].name, "Summer holiday");
        assert_eq!(goals[0].deadline, NaiveDate::from_ymd_opt(2026, 7, 1));
        assert_eq!(goals[0].saved, Money::ZERO);
    }

    #[test]
    fn add_prints_nothing_when_save_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("savvy.db");
        let mut store = Store::open(&path).unwrap();
        rusqlite::Connection::open(&path)
            .unwrap()
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, '{not json', '')",
                ["savings_goals"],
            )
            .unwrap();

        let args = AddGoalArgs {
            name: "Bikes".to_string(),
            target: Money::from_cents(40_000),
            deadline: None,
        };
        let mut output = Vec::new();
        let err = add(&mut output, &mut store, &args, today()).unwrap_err();
        assert_eq!(err.to_string(), "failed to save savings goal");
        assert!(output.is_empty());
    }

    #[test]
    fn add_rejects_past_deadline() {
        let mut store = Store::open_in_memory().unwrap();
        let args = AddGoalArgs {
            name: "Bikes".to_string(),
            target: Money::from_cents(40_000),
            deadline: Some("yesterday".to_string()),
        };
        let err = add(&mut Vec::new(), &mut store, &args, today()).unwrap_err();
        assert_eq!(err.to_string(), "deadline is in the past");
    }

    #[test]
    fn save_until_goal_reached() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .add_savings_goal(goal("bikes", "Bikes", 40_000, NaiveDate::from_ymd_opt(2026, 6, 1)))
            .unwrap();
        store.add_savings_goal(goal("fund", "Emergency fund", 500_000, None)).unwrap();

        let mut output = Vec::new();
        for amount in [10_000, 30_000] {
            let args = SaveArgs {
                id: "bikes".to_string(),
                amount: Money::from_cents(amount),
            };
            save(&mut output, &mut store, &args).unwrap();
        }
        list(&mut output, &store).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        Saved 100.00 towards Bikes
        Bikes  100.00/400.00 (25%)  by 2026-06-01  bikes
        Saved 300.00 towards Bikes
        Bikes  400.00/400.00 (100%)  by 2026-06-01  bikes
        Goal reached!
        Bikes  400.00/400.00 (100%)  by 2026-06-01  bikes
        Emergency fund  0.00/5000.00 (0%)  fund
        ");
    }

    #[test]
    fn save_to_unknown_goal_fails() {
        let mut store = Store::open_in_memory().unwrap();
        let args = SaveArgs {
            id: "missing".to_string(),
            amount: Money::from_cents(100),
        };
        let err = save(&mut Vec::new(), &mut store, &args).unwrap_err();
        assert_eq!(err.to_string(), "savings goal not found: missing");
    }
}
