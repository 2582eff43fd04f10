use chrono::{DateTime, Datelike, Local, Utc};
use tabled::{Table, Tabled};
use tabled::settings::{Style, Color, Modify};
use tabled::settings::object::Rows;
use zenith_core::{Bucket, Task, TaskDto, TaskGroups, UserProfile, ACHIEVEMENTS};
use zenith_core::usecase::calendar::CalendarEvent;
use zenith_core::usecase::habits::HabitGrid;
use zenith_core::usecase::progress::Progress;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "")]
    check: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Task")]
    text: String,
    #[tabled(rename = "Due / Streak")]
    detail: String,
}

#[derive(Tabled)]
struct BucketRow {
    #[tabled(rename = "Period")]
    label: String,
    #[tabled(rename = "Completed")]
    count: usize,
    #[tabled(rename = "")]
    bar: String,
}

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Task")]
    title: String,
    #[tabled(rename = "")]
    done: &'static str,
}

fn styled(table: &mut Table) -> &mut Table {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN))
}

fn task_rows(tasks: &[Task], now: DateTime<Utc>) -> Vec<TaskRow> {
    tasks
        .iter()
        .map(|task| TaskDto::from_entity(task, now))
        .map(|dto| {
            let detail = match (dto.streak, dto.due_date) {
                (Some(streak), _) => format!("🔥 {}", streak),
                (None, Some(due)) => due.format("%Y-%m-%d").to_string(),
                (None, None) => "-".to_string(),
            };
            TaskRow {
                check: if dto.is_done() { "✔" } else { "☐" },
                id: dto.short_id,
                text: dto.text,
                detail,
            }
        })
        .collect()
}

pub fn show_task_groups(groups: &TaskGroups, now: DateTime<Utc>) {
    if groups.daily.is_empty() && groups.one_time.is_empty() {
        println!("No tasks found.");
        return;
    }

    for (title, tasks) in [("Daily Habits", &groups.daily), ("One-Time Tasks", &groups.one_time)] {
        if tasks.is_empty() {
            continue;
        }
        println!("\n\x1b[1;36m{}\x1b[0m ({})", title, tasks.len());
        let mut table = Table::new(task_rows(tasks, now));
        println!("{}", styled(&mut table));
    }
}

pub fn show_score(profile: &UserProfile) {
    println!("\x1b[1;36mZenith Score\x1b[0m  {}", profile.zenith_score);
    println!("Achievements  {}/{}", profile.unlocked_achievements.len(), ACHIEVEMENTS.len());
}

pub fn show_progress(progress: &Progress) {
    println!("\x1b[1;36mProgress\x1b[0m");
    println!("  Tasks completed: {}", progress.stats.total_completed);
    println!("  Longest streak:  {} days", progress.stats.longest_streak);

    println!("\n\x1b[1;36mLast 7 days\x1b[0m");
    show_buckets(&progress.last_seven_days);

    println!(
        "\n\x1b[1;36mAchievements\x1b[0m ({}/{})",
        progress.unlocked_count(),
        progress.achievements.len()
    );
    for status in &progress.achievements {
        let a = status.achievement;
        if status.unlocked {
            println!("  {} {:<14} {}", a.icon, a.title, a.description);
        } else {
            println!("  \x1b[2m🔒 {:<14} {}\x1b[0m", a.title, a.description);
        }
    }
}

pub fn show_buckets(buckets: &[Bucket]) {
    let rows: Vec<BucketRow> = buckets
        .iter()
        .map(|b| BucketRow {
            label: b.label.clone(),
            count: b.count,
            bar: "█".repeat(b.count),
        })
        .collect();
    let mut table = Table::new(rows);
    println!("{}", styled(&mut table));
}

pub fn show_habit_grid(grid: &HabitGrid) {
    println!("\x1b[1;36m{}\x1b[0m", grid.label);
    if grid.rows.is_empty() {
        println!("No daily habits yet.");
        return;
    }

    let mut builder = tabled::builder::Builder::default();
    let mut header = vec!["Habit".to_string()];
    header.extend(grid.dates.iter().map(|d| {
        if grid.dates.len() <= 7 {
            d.format("%a").to_string()
        } else {
            d.day().to_string()
        }
    }));
    header.push("🔥".to_string());
    builder.push_record(header);

    for row in &grid.rows {
        let mut record = vec![row.text.clone()];
        record.extend(row.done.iter().map(|done| if *done { "●" } else { "·" }.to_string()));
        record.push(row.streak.to_string());
        builder.push_record(record);
    }

    let mut table = builder.build();
    println!("{}", styled(&mut table));
}

pub fn show_calendar(events: &[CalendarEvent]) {
    if events.is_empty() {
        println!("No tasks with due dates.");
        return;
    }

    let today = Local::now().date_naive();
    let rows: Vec<EventRow> = events
        .iter()
        .map(|e| {
            let date = if e.date < today && !e.completed {
                format!("{} (overdue)", e.date.format("%Y-%m-%d %a"))
            } else {
                e.date.format("%Y-%m-%d %a").to_string()
            };
            EventRow {
                date,
                id: e.task_id.to_string()[..8].to_string(),
                title: e.title.clone(),
                done: if e.completed { "✔" } else { "" },
            }
        })
        .collect();
    let mut table = Table::new(rows);
    println!("{}", styled(&mut table));
}
