mod report;
mod views;

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::Parser;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zenith_core::{
    bucket, new_task_from_args, select_grouped, task_edit_from_args, AuthProvider, Completion, Config,
    FileProfileRepository, FileSessionProvider, FileTaskRepository, Granularity, ProfileService, SortStrategy,
    TaskFilter, TaskService,
};
use zenith_core::usecase::{calendar::{due_events, events_in_month}, habits::habit_grid, progress::ProgressUseCase, report::window_label};

#[derive(Parser)]
#[command(name = "zenith")]
#[command(about = "Tasks, daily habits and streaks in the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in as a local user
    Login { name: String },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Add a task (usage: add "Pay rent" due:eom, add Meditate type:daily)
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List tasks grouped into daily habits and one-time tasks
    List {
        /// all | active | completed
        #[arg(long, short)]
        filter: Option<TaskFilter>,
        /// createdAt_desc | createdAt_asc | dueDate_asc (or newest | oldest | due)
        #[arg(long)]
        sort: Option<SortStrategy>,
        /// Case-insensitive text search
        #[arg(long, short, default_value = "")]
        search: String,
    },
    /// Check a task off (toggles one-time tasks)
    Done { id: String },
    /// Edit a task's text or due date (due:none clears it)
    Edit {
        id: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Delete a task
    Rm { id: String },
    /// Show today's Zenith score
    Score,
    /// Stats, the last seven days and achievements
    Progress,
    /// Completions per day or month
    Report {
        /// week | month | year
        #[arg(long, default_value = "week")]
        view: Granularity,
        /// Any date inside the window (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Open the interactive bar chart
        #[arg(long)]
        chart: bool,
    },
    /// Habit completion grid
    Habits {
        /// week | month
        #[arg(long, default_value = "week")]
        view: Granularity,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// One-time tasks by due date
    Calendar {
        /// Only show one month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,zenith=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(cli.command) {
        error!(error = %err, "command failed");
        println!("Error: {:#}", err);
    }
}

fn run(command: Commands) -> Result<()> {
    let config = Config::load()?;
    let dir = Some(config.data_dir.clone());
    let auth = FileSessionProvider::new(dir.clone())?;
    let tasks = FileTaskRepository::new(dir.clone())?;
    let profiles = FileProfileRepository::new(dir)?;

    let now = Utc::now();
    let today = Local::now().date_naive();

    match &command {
        Commands::Login { name } => {
            auth.sign_in(name)?;
            println!("Signed in as {}", name.trim());
            return Ok(());
        }
        Commands::Logout => {
            auth.sign_out()?;
            println!("Signed out.");
            return Ok(());
        }
        Commands::Whoami => {
            match auth.current_user()? {
                Some(user) => println!("{}", user),
                None => println!("Not signed in."),
            }
            return Ok(());
        }
        _ => {}
    }

    let user = auth
        .current_user()?
        .ok_or_else(|| anyhow!("Not signed in. Run `zenith login <name>` first."))?;
    let service = TaskService::new(tasks.clone(), profiles.clone());

    match command {
        Commands::Add { args } => {
            let task = service.create_task(&user, new_task_from_args(&args, today)?)?;
            let kind = if task.is_daily() { "Habit" } else { "Task" };
            println!("{} added: {} (ID: {})", kind, task.text, &task.id.to_string()[..8]);
            if let Some(d) = task.due_date() {
                println!("  Due: {}", d);
            }
        }
        Commands::List { filter, sort, search } => {
            let all = service.list_tasks(&user)?;
            let groups = select_grouped(
                &all,
                filter.unwrap_or(config.default_filter),
                sort.unwrap_or(config.default_sort),
                &search,
                now,
            );
            views::show_task_groups(&groups, now);
        }
        Commands::Done { id } => {
            let task = service.find_by_prefix(&user, &id)?;
            let report = service.toggle_completion(&user, &task.id, now)?;
            match report.completion {
                Completion::AlreadyDoneToday => println!("'{}' is already done for today.", task.text),
                Completion::Habit { new_streak, .. } => {
                    println!("'{}' done. Streak: {} 🔥  (+{})", task.text, new_streak, report.awarded)
                }
                Completion::Toggle { completed: true } => println!("'{}' completed. (+{})", task.text, report.awarded),
                Completion::Toggle { completed: false } => println!("'{}' marked as not done.", task.text),
            }
            for a in &report.unlocked {
                println!("{} Achievement unlocked: {} ({})", a.icon, a.title, a.description);
            }
        }
        Commands::Edit { id, args } => {
            let task = service.find_by_prefix(&user, &id)?;
            let edit = task_edit_from_args(&args, today)?;
            service.edit_task(&task.id, edit.text.as_deref(), edit.due_date)?;
            println!("Task updated: {}", &task.id.to_string()[..8]);
        }
        Commands::Rm { id } => {
            let task = service.find_by_prefix(&user, &id)?;
            service.delete_task(&task.id)?;
            println!("Deleted '{}'.", task.text);
        }
        Commands::Score => {
            let profile = ProfileService::new(profiles).dashboard_profile(&user, now)?;
            views::show_score(&profile);
        }
        Commands::Progress => {
            let progress = ProgressUseCase::new(&tasks, &profiles).get_progress(&user, now)?;
            views::show_progress(&progress);
        }
        Commands::Report { view, date, chart } => {
            let all = service.list_tasks(&user)?;
            let reference = date.unwrap_or(today);
            if chart {
                report::run(all, view, reference, today)?;
            } else {
                println!("\x1b[1;36m{}\x1b[0m", window_label(view, reference));
                views::show_buckets(&bucket(&all, view, reference));
            }
        }
        Commands::Habits { view, date } => {
            let all = service.list_tasks(&user)?;
            let grid = habit_grid(&all, view, date.unwrap_or(today))?;
            views::show_habit_grid(&grid);
        }
        Commands::Calendar { month } => {
            let all = service.list_tasks(&user)?;
            let events = match month {
                Some(month) => events_in_month(due_events(&all), parse_month(&month)?),
                None => due_events(&all),
            };
            views::show_calendar(&events);
        }
        Commands::Login { .. } | Commands::Logout | Commands::Whoami => {}
    }
    Ok(())
}

fn parse_month(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", input.trim()), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid month (expected YYYY-MM): {}", input))
}
