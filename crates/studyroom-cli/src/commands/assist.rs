use std::io::{IsTerminal, Read};

use clap::{Args, Subcommand};
use studyroom_core::{CannedAssistant, Config, StudyAssistant};

#[derive(Args)]
pub struct AssistArgs {
    /// Subject the material belongs to
    #[arg(long)]
    subject: String,
    /// Study material; read from stdin when omitted
    #[arg(long)]
    text: Option<String>,
    /// Skip the simulated response delay
    #[arg(long)]
    instant: bool,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
pub enum AssistAction {
    /// Summarize study material
    Summary(AssistArgs),
    /// Build a mind map from study material
    Mindmap(AssistArgs),
    /// Recommend study resources for a subject
    Resources {
        /// Subject to find material for
        #[arg(long)]
        subject: String,
        /// Skip the simulated response delay
        #[arg(long)]
        instant: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn assistant(instant: bool) -> Result<CannedAssistant, Box<dyn std::error::Error>> {
    if instant {
        return Ok(CannedAssistant::instant());
    }
    Ok(Config::load()?.assistant())
}

fn material(text: Option<String>) -> Result<String, std::io::Error> {
    if let Some(text) = text {
        return Ok(text);
    }
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut buf = String::new();
    stdin.lock().read_to_string(&mut buf)?;
    Ok(buf)
}

pub fn run(action: AssistAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AssistAction::Summary(args) => {
            let text = material(args.text)?;
            let assistant = assistant(args.instant)?;
            let summary = super::block_on(assistant.summarize(&args.subject, &text))??;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary.render());
            }
        }
        AssistAction::Mindmap(args) => {
            let text = material(args.text)?;
            let assistant = assistant(args.instant)?;
            let map = super::block_on(assistant.mind_map(&args.subject, &text))??;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else {
                print!("{}", map.outline());
            }
        }
        AssistAction::Resources {
            subject,
            instant,
            json,
        } => {
            let assistant = assistant(instant)?;
            let resources = super::block_on(assistant.recommend(&subject))??;
            if json {
                println!("{}", serde_json::to_string_pretty(&resources)?);
                return Ok(());
            }
            for r in resources {
                let duration = r.duration.as_deref().unwrap_or("-");
                println!(
                    "[{:?}] {} ({:?}, {duration}, {:.1}/5)\n    {}\n    {}",
                    r.kind, r.title, r.difficulty, r.rating, r.description, r.url
                );
            }
        }
    }
    Ok(())
}
