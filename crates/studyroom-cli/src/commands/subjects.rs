use clap::Subcommand;
use studyroom_core::{Config, SubjectDirectory};

#[derive(Subcommand)]
pub enum SubjectsAction {
    /// List subjects a work session can be attributed to
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: SubjectsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    match action {
        SubjectsAction::List { json } => {
            let subjects = config.list_subjects();
            if json {
                println!("{}", serde_json::to_string_pretty(&subjects)?);
            } else if subjects.is_empty() {
                println!("No subjects configured.");
            } else {
                for subject in subjects {
                    println!("{:<12} {}", subject.id, subject.name);
                }
            }
        }
    }
    Ok(())
}
