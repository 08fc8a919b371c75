use clap::Subcommand;
use studyroom_core::progress::round_hours;
use studyroom_core::{ColorTag, Config, NewSubject, Priority};

#[derive(Subcommand)]
pub enum SubjectsAction {
    /// List subjects, highest priority first
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a subject to the saved subject list
    Add {
        /// Subject name
        name: String,
        /// high, medium or low
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Weekly target in hours (1-20, default from config)
        #[arg(long)]
        target_hours: Option<u32>,
        /// primary, success, creative or energy
        #[arg(long, default_value = "primary")]
        color: ColorTag,
    },
}

pub fn run(action: SubjectsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SubjectsAction::List { json } => {
            let config = Config::load()?;
            let registry = config.registry();
            let sorted = registry.sorted_by_priority();
            if json {
                println!("{}", serde_json::to_string_pretty(&sorted)?);
                return Ok(());
            }
            if sorted.is_empty() {
                println!("No subjects yet. Add one with `studyroom subjects add <name>`.");
                return Ok(());
            }
            for s in sorted {
                println!(
                    "{:<24} {:<6} {:>5.1}/{:<4} h  {:>3.0}%",
                    s.name,
                    s.priority.label(),
                    round_hours(s.studied_minutes),
                    s.target_minutes / 60,
                    s.progress_pct(),
                );
            }
        }
        SubjectsAction::Add {
            name,
            priority,
            target_hours,
            color,
        } => {
            let mut config = Config::load()?;
            let mut registry = config.registry();
            let new = NewSubject::named(name)
                .priority(priority)
                .color(color)
                .target_hours(target_hours.unwrap_or(config.goals.default_target_hours));
            let added = registry.add(new)?.clone();
            config.subjects = registry.iter().cloned().collect();
            config.save()?;
            println!("{}", serde_json::to_string_pretty(&added)?);
        }
    }
    Ok(())
}
