//! Interactive prompts for trying addresses without memorizing CLI flags.

use dialoguer::{Input, Select};
use flets_area_address::decompose::decompose_with_rule;
use flets_area_address::{AddressMatcher, MatchCandidate, similarity};

use crate::report::{DecomposeReport, MatchReport};

/// Top-level actions available in the interactive menu.
enum Action {
    Decompose,
    Match,
    Compare,
}

impl Action {
    const ALL: &[Self] = &[Self::Decompose, Self::Match, Self::Compare];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Decompose => "Decompose addresses",
            Self::Match => "Match an address against candidates",
            Self::Compare => "Compare two addresses",
        }
    }
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if a prompt fails or output cannot be serialized.
pub fn run(matcher: &AddressMatcher) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Decompose => decompose_loop()?,
        Action::Match => match_once(matcher)?,
        Action::Compare => compare_once()?,
    }

    Ok(())
}

fn prompt_line(prompt: &str) -> Result<String, dialoguer::Error> {
    let line: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(line.trim().to_string())
}

/// Decomposes addresses until an empty line is entered.
fn decompose_loop() -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let address = prompt_line("Address (empty to quit)")?;
        if address.is_empty() {
            return Ok(());
        }
        let (components, rule) = decompose_with_rule(&address);
        let report = DecomposeReport::new(&address, components, rule);
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
}

fn match_once(matcher: &AddressMatcher) -> Result<(), Box<dyn std::error::Error>> {
    let address = prompt_line("Address")?;
    if address.is_empty() {
        return Ok(());
    }

    let mut texts = Vec::new();
    loop {
        let text = prompt_line(&format!("Candidate {} (empty to finish)", texts.len() + 1))?;
        if text.is_empty() {
            break;
        }
        texts.push(text);
    }

    let candidates = MatchCandidate::from_texts(texts);
    let result = matcher.find_best_match(&address, &candidates);
    let ranking = matcher.score_candidates(&address, &candidates);
    let report = MatchReport::new(&address, result, &candidates, Some(ranking));
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn compare_once() -> Result<(), Box<dyn std::error::Error>> {
    let a = prompt_line("First address")?;
    let b = prompt_line("Second address")?;
    println!("{:.2}", similarity(&a, &b));
    Ok(())
}
