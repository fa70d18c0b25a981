use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use taskboard::commands::*;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Personal task board with recurring tasks and voice-style commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: Option<String>,
        /// Start time, YYYY-MM-DD HH:MM (default: current hour)
        #[arg(short, long)]
        start: Option<String>,
        /// End time, YYYY-MM-DD HH:MM
        #[arg(short, long)]
        end: Option<String>,
        /// Duration in minutes, used when no end time is given
        #[arg(short = 'D', long)]
        duration: Option<i64>,
        /// Recurrence (none, daily, weekly)
        #[arg(short, long)]
        repeat: Option<String>,
        /// Category tag
        #[arg(short, long)]
        category: Option<String>,
        /// Weekday tag (monday..sunday)
        #[arg(long)]
        day: Option<String>,
        /// Pre-fill from a template (matched by title)
        #[arg(short, long)]
        template: Option<String>,
    },
    /// List tasks on the board
    List {
        /// Only one column (todo, inprogress, done)
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Move a task to another column
    Move {
        id: String,
        /// Target column (todo, inprogress, done)
        status: String,
    },
    /// Remove a task
    Remove {
        id: String,
        /// Remove every occurrence of a repeating task without asking
        #[arg(long, conflicts_with = "keep_others")]
        cascade: bool,
        /// Remove only this occurrence without asking
        #[arg(long)]
        keep_others: bool,
    },
    /// Run a voice-style command, e.g. "add task walk the dog at 2 pm for 1 hour"
    Say {
        /// The utterance, as transcribed text
        #[arg(required = true)]
        utterance: Vec<String>,
    },
    /// Schedule missed occurrences of recurring tasks
    Sweep,
    /// Export a task as an .ics calendar file
    Export {
        id: String,
        /// Output path (default: "<title>.ics")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Manage task templates
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
}

#[derive(Subcommand)]
enum TemplateCommands {
    /// Add a custom template
    Add {
        /// Template title
        title: String,
        /// Duration in minutes (60 or 120)
        #[arg(short = 'D', long, default_value_t = 60)]
        duration: u32,
        /// Category tag
        #[arg(short, long)]
        category: Option<String>,
        /// Weekday tag (monday..sunday)
        #[arg(long)]
        day: Option<String>,
    },
    /// List templates
    List,
    /// Remove a custom template by id
    Remove {
        id: String,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Add { title, start, end, duration, repeat, category, day, template } => {
            cmd_add(title, start, end, duration, repeat, category, day, template, false)
        }
        Commands::List { status } => cmd_list(status),
        Commands::Move { id, status } => cmd_move(id, status, false),
        Commands::Remove { id, cascade, keep_others } => {
            let decided = if cascade {
                Some(true)
            } else if keep_others {
                Some(false)
            } else {
                None
            };
            cmd_remove(id, decided, false)
        }
        Commands::Say { utterance } => cmd_say(utterance, false),
        Commands::Sweep => cmd_sweep(false),
        Commands::Export { id, output } => cmd_export(id, output, false),
        Commands::Template { command } => match command {
            TemplateCommands::Add { title, duration, category, day } => {
                cmd_template_add(title, duration, category, day, false)
            }
            TemplateCommands::List => cmd_template_list(),
            TemplateCommands::Remove { id } => cmd_template_remove(id, false),
        },
        Commands::Completions { shell } => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "taskboard", &mut io::stdout());
        }
    }
}
