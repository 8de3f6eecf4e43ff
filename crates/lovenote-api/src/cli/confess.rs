//! Interactive submission wizard (`lovenote confess`).
//!
//! Drives the core wizard one step at a time with dialoguer prompts. Every
//! accepted step is written to the draft slot, so quitting (or Ctrl+C) and
//! running the command again picks up the same answers.

use std::time::Duration;

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};

use lovenote_core::draft::CONFESSION_DRAFT_KEY;
use lovenote_types::confession::{Mood, YearOrBatch, mood_emoji};
use lovenote_types::draft::{AffiliationFields, ConfessionDraft, IdentityFields, MessageFields};
use lovenote_types::error::WizardError;
use lovenote_types::wizard::{FieldErrors, Notice, StepInput, WizardStep};
use lovenote_types::{MAX_MESSAGE_LENGTH, MIN_MESSAGE_LENGTH};

use crate::cli::confession::render_view;
use crate::cli::print_json;
use crate::state::{AppState, ConcreteWizard};

enum PreviewChoice {
    Send,
    Back,
    UndoPolish,
    Polish,
    Quit,
}

pub async fn confess(state: &AppState, no_enhance: bool, json: bool) -> Result<()> {
    let mut wizard = state.open_wizard(CONFESSION_DRAFT_KEY).await;
    if no_enhance || !wizard.has_enhancer() {
        wizard.set_enhancement(false).await?;
    }

    println!();
    println!(
        "  {} {}",
        style("💌").bold(),
        style(&state.config.app_name).magenta().bold()
    );
    if !wizard.draft().is_blank() {
        println!(
            "  {}",
            style("Picking up your saved draft. Press Enter to keep an answer.").dim()
        );
    }

    loop {
        let step = wizard.step();
        match step {
            WizardStep::Message | WizardStep::Affiliation | WizardStep::Identity => {
                print_step_header(step);
                let input = match step {
                    WizardStep::Message => StepInput::Message(prompt_message(wizard.draft())?),
                    WizardStep::Affiliation => {
                        StepInput::Affiliation(prompt_affiliation(wizard.draft())?)
                    }
                    _ => StepInput::Identity(prompt_identity(wizard.draft())?),
                };
                advance(&mut wizard, input).await?;
            }
            WizardStep::Preview => match preview(&wizard)? {
                PreviewChoice::Send => {
                    if send(state, &mut wizard, json).await? {
                        return Ok(());
                    }
                }
                PreviewChoice::Back => {
                    wizard.retreat()?;
                }
                PreviewChoice::UndoPolish => {
                    wizard.revert_enhancement().await?;
                }
                PreviewChoice::Polish => {
                    let spinner = spinner("Polishing your message...");
                    let notice = wizard.set_enhancement(true).await?;
                    spinner.finish_and_clear();
                    print_notice(notice.as_ref());
                }
                PreviewChoice::Quit => {
                    println!();
                    println!(
                        "  {} Draft saved. Run {} to continue.",
                        style("i").blue().bold(),
                        style("lovenote confess").yellow()
                    );
                    println!();
                    return Ok(());
                }
            },
            WizardStep::Submitting | WizardStep::Submitted => return Ok(()),
        }
    }
}

/// Submit the draft. Returns `true` when the wizard is finished.
async fn send(state: &AppState, wizard: &mut ConcreteWizard, json: bool) -> Result<bool> {
    let spinner = spinner("Sending your confession...");
    let result = wizard.submit(state.confession_service.repository()).await;
    spinner.finish_and_clear();

    let submission = match result {
        Ok(submission) => submission,
        Err(WizardError::Network(message)) => {
            println!();
            println!(
                "  {} Couldn't send it: {}",
                style("✗").red().bold(),
                message
            );
            println!("  {}", style("Your draft is safe. Try again.").dim());
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        print_json(&submission)?;
        return Ok(true);
    }

    let code = &submission.confession.unique_code;
    println!();
    println!(
        "  {} Your confession is out there!",
        style("✓").green().bold()
    );
    println!();
    println!(
        "  {}  {}",
        style("Code:").bold(),
        style(code).magenta().bold()
    );
    println!(
        "  {}",
        style("Keep this code to find your confession again.").dim()
    );

    tokio::time::sleep(submission.redirect.after).await;
    match state.confession_service.find_by_code(code, None).await {
        Ok(Some(view)) => render_view(&view),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "could not open the new confession"),
    }
    Ok(true)
}

async fn advance(wizard: &mut ConcreteWizard, input: StepInput) -> Result<()> {
    let leaving_identity = wizard.step() == WizardStep::Identity;
    let polishing = leaving_identity && wizard.snapshot().enhancement_requested;
    let spinner = polishing.then(|| spinner("Polishing your message..."));

    let result = wizard.advance(input).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match result {
        Ok(advanced) => {
            print_notice(advanced.notice.as_ref());
            Ok(())
        }
        Err(WizardError::Validation(errors)) => {
            print_field_errors(&errors);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_step_header(step: WizardStep) {
    println!();
    println!(
        "  {} {}",
        style(format!("Step {}/{}", step.number(), WizardStep::TOTAL_STEPS)).dim(),
        style(step.title()).bold()
    );
}

fn print_field_errors(errors: &FieldErrors) {
    println!();
    for (field, message) in errors {
        println!(
            "  {} {} {}",
            style("✗").red().bold(),
            style(format!("{field}:")).dim(),
            message
        );
    }
}

fn print_notice(notice: Option<&Notice>) {
    if let Some(notice) = notice {
        println!();
        println!("  {} {}", style("!").yellow().bold(), notice.message);
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("  {spinner:.magenta} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Text prompt pre-filled with the saved answer.
fn ask(prompt: &str, saved: Option<&str>, optional: bool) -> Result<String> {
    let mut input = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(optional);
    if let Some(saved) = saved.filter(|s| !s.is_empty()) {
        input = input.with_initial_text(saved);
    }
    Ok(input.interact_text()?.trim().to_string())
}

fn optional(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn prompt_message(draft: &ConfessionDraft) -> Result<MessageFields> {
    let saved = draft.message_fields();
    let message = ask(
        &format!("Your message ({MIN_MESSAGE_LENGTH}-{MAX_MESSAGE_LENGTH} characters)"),
        Some(&saved.message),
        false,
    )?;

    let mut items: Vec<String> = Mood::ALL
        .iter()
        .map(|m| format!("{} {}", m.emoji(), m.label()))
        .collect();
    items.push(format!("{} No particular mood", mood_emoji(None)));
    let default = draft
        .mood
        .and_then(|m| Mood::ALL.iter().position(|x| *x == m))
        .unwrap_or(0);
    let picked = Select::new()
        .with_prompt("Mood")
        .items(&items)
        .default(default)
        .interact()?;
    let mood = Mood::ALL.get(picked).map(|m| m.to_string());

    let song_link = ask(
        "Song or video link (optional)",
        saved.song_link.as_deref(),
        true,
    )?;

    Ok(MessageFields {
        message,
        mood,
        song_link: optional(song_link),
    })
}

fn prompt_affiliation(draft: &ConfessionDraft) -> Result<AffiliationFields> {
    let saved = draft.affiliation_fields();
    let college_name = ask("College", Some(&saved.college_name), false)?;
    let department = ask("Department", Some(&saved.department), false)?;

    let labels: Vec<&str> = YearOrBatch::ALL.iter().map(|y| y.label()).collect();
    let default = draft
        .year_or_batch
        .and_then(|y| YearOrBatch::ALL.iter().position(|x| *x == y))
        .unwrap_or(0);
    let picked = Select::new()
        .with_prompt("Year / batch")
        .items(&labels)
        .default(default)
        .interact()?;

    let section = ask("Their section (optional)", saved.section.as_deref(), true)?;
    let recipient_hint = ask(
        "A hint about who it's for (optional)",
        saved.recipient_hint.as_deref(),
        true,
    )?;

    Ok(AffiliationFields {
        college_name,
        department,
        year_or_batch: labels.get(picked).copied().unwrap_or_default().to_string(),
        section: optional(section),
        recipient_hint: optional(recipient_hint),
    })
}

fn prompt_identity(draft: &ConfessionDraft) -> Result<IdentityFields> {
    let saved = draft.identity_fields();
    let is_anonymous = Confirm::new()
        .with_prompt("Stay anonymous?")
        .default(saved.is_anonymous)
        .interact()?;
    if is_anonymous {
        return Ok(IdentityFields::default());
    }

    let sender_name = ask("Your name", saved.sender_name.as_deref(), false)?;
    let sender_email = ask("Email (optional)", saved.sender_email.as_deref(), true)?;
    let sender_phone = ask("Phone, 10 digits (optional)", saved.sender_phone.as_deref(), true)?;
    let sender_section = ask("Your section (optional)", saved.sender_section.as_deref(), true)?;
    let additional_message = ask(
        "A P.S. for them (optional)",
        saved.additional_message.as_deref(),
        true,
    )?;

    Ok(IdentityFields {
        is_anonymous,
        sender_name: optional(sender_name),
        sender_email: optional(sender_email),
        sender_phone: optional(sender_phone),
        sender_section: optional(sender_section),
        additional_message: optional(additional_message),
    })
}

fn preview(wizard: &ConcreteWizard) -> Result<PreviewChoice> {
    let snapshot = wizard.snapshot();
    let draft = &snapshot.draft;
    print_step_header(WizardStep::Preview);
    println!();

    if let Some(hint) = &draft.recipient_hint {
        println!("  {} {}", style("To:").bold(), style(hint).cyan());
    }
    for line in draft.message.as_deref().unwrap_or_default().lines() {
        println!("  {}", style(line).italic());
    }
    if snapshot.enhanced {
        println!("  {}", style("(polished; your original is kept)").dim());
    }
    println!();
    let from = if draft.is_anonymous {
        "Anonymous"
    } else {
        draft.sender_name.as_deref().unwrap_or("Anonymous")
    };
    println!("  {} {}", style("From:").bold(), from);
    println!(
        "  {}",
        style(format!(
            "{} · {} · {}",
            draft.college_name.as_deref().unwrap_or_default(),
            draft.department.as_deref().unwrap_or_default(),
            draft.year_or_batch.map(|y| y.label()).unwrap_or_default()
        ))
        .dim()
    );
    println!();

    let mut choices = vec![
        ("Send it 💌", PreviewChoice::Send),
        ("Go back and edit", PreviewChoice::Back),
    ];
    if snapshot.enhanced {
        choices.push(("Use my original words", PreviewChoice::UndoPolish));
    } else if snapshot.enhancer_available {
        choices.push(("Polish my message", PreviewChoice::Polish));
    }
    choices.push(("Save and quit", PreviewChoice::Quit));

    let labels: Vec<&str> = choices.iter().map(|(label, _)| *label).collect();
    let picked = Select::new()
        .with_prompt("Ready?")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(choices
        .into_iter()
        .nth(picked)
        .map(|(_, choice)| choice)
        .unwrap_or(PreviewChoice::Quit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(optional(String::new()), None);
        assert_eq!(optional("Kai".to_string()), Some("Kai".to_string()));
    }
}
