//! Submission wizard state machine.
//!
//! Steps run Message -> Affiliation -> Identity -> Preview, then
//! Submitting -> Submitted. Only field values are persisted (through the
//! draft slot on every successful advance); the step itself always starts
//! at Message when a wizard is opened.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use lovenote_types::config::LovenoteConfig;
use lovenote_types::{MAX_MESSAGE_LENGTH, MIN_MESSAGE_LENGTH};
use lovenote_types::confession::Confession;
use lovenote_types::draft::ConfessionDraft;
use lovenote_types::error::{EnhanceError, WizardError};
use lovenote_types::wizard::{Notice, Redirect, StepInput, WizardStep};

use crate::draft::{DraftSlot, DraftStore, Drafts};
use crate::repository::confession::ConfessionRepository;

use super::enhance::Enhancer;
use super::record::{build_record, create_with_fresh_code};
use super::schema;

/// Timing knobs for one wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardSettings {
    /// Upper bound on a single enhancement call.
    pub enhance_timeout: Duration,
    /// Delay attached to the post-submit redirect.
    pub redirect_delay: Duration,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            enhance_timeout: Duration::from_secs(15),
            redirect_delay: Duration::from_millis(2_000),
        }
    }
}

impl WizardSettings {
    pub fn from_config(config: &LovenoteConfig) -> Self {
        Self {
            enhance_timeout: Duration::from_secs(config.enhancement.timeout_secs),
            redirect_delay: Duration::from_millis(config.wizard.redirect_delay_ms),
        }
    }
}

/// Outcome of a successful `advance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advanced {
    pub step: WizardStep,
    /// Set when enhancement was attempted and failed.
    pub notice: Option<Notice>,
}

/// Outcome of a successful `submit`.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub confession: Confession,
    pub redirect: Redirect,
}

/// Serializable view of a wizard for API clients.
#[derive(Debug, Clone, Serialize)]
pub struct WizardSnapshot {
    pub step: WizardStep,
    pub step_number: u8,
    pub total_steps: u8,
    pub title: &'static str,
    pub draft: ConfessionDraft,
    pub enhancement_requested: bool,
    pub enhancer_available: bool,
    pub enhanced: bool,
}

/// One user's pass through the submission form.
pub struct Wizard<S: DraftStore, E: Enhancer> {
    slot: DraftSlot<S, ConfessionDraft>,
    enhancer: Option<Arc<E>>,
    settings: WizardSettings,
    step: WizardStep,
    enhancement_requested: bool,
}

impl<S: DraftStore, E: Enhancer> Wizard<S, E> {
    /// Open the wizard on `key`, pre-filling from whatever the slot holds.
    pub async fn open(
        drafts: &Drafts<S>,
        key: impl Into<String>,
        enhancer: Option<Arc<E>>,
        settings: WizardSettings,
    ) -> Self {
        let slot = drafts.slot(key, ConfessionDraft::default()).await;
        if !slot.get().is_blank() {
            tracing::debug!(key = slot.key(), "resuming saved confession draft");
        }
        Self {
            slot,
            enhancer,
            settings,
            step: WizardStep::Message,
            enhancement_requested: true,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &ConfessionDraft {
        self.slot.get()
    }

    pub fn has_enhancer(&self) -> bool {
        self.enhancer.is_some()
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            step: self.step,
            step_number: self.step.number(),
            total_steps: WizardStep::TOTAL_STEPS,
            title: self.step.title(),
            draft: self.slot.get().clone(),
            enhancement_requested: self.enhancement_requested,
            enhancer_available: self.enhancer.is_some(),
            enhanced: self.slot.get().original_message.is_some(),
        }
    }

    /// Validate `input` for the current step, merge it into the draft and
    /// move forward. Leaving Identity runs the optional enhancement.
    pub async fn advance(&mut self, input: StepInput) -> Result<Advanced, WizardError> {
        self.ensure_editable("advance")?;
        if self.step == WizardStep::Preview {
            return Err(WizardError::InvalidState {
                step: self.step,
                action: "advance",
            });
        }
        if input.step() != self.step {
            return Err(WizardError::StepMismatch {
                expected: self.step,
                got: input.step(),
            });
        }

        let valid = schema::validate(&input).map_err(WizardError::Validation)?;
        self.slot.update(|draft| valid.merge_into(draft)).await;

        let notice = if self.step == WizardStep::Identity {
            self.optionally_enhance().await
        } else {
            None
        };

        if let Some(next) = self.step.next() {
            self.step = next;
        }
        tracing::debug!(step = %self.step, "wizard advanced");
        Ok(Advanced {
            step: self.step,
            notice,
        })
    }

    /// Step back without validating. No-op on the first step.
    pub fn retreat(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_editable("go back")?;
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        Ok(self.step)
    }

    /// Toggle enhancement. On the preview step, switching on runs it now
    /// and switching off restores the user's own text.
    pub async fn set_enhancement(&mut self, enabled: bool) -> Result<Option<Notice>, WizardError> {
        self.ensure_editable("change enhancement")?;
        self.enhancement_requested = enabled;
        if self.step != WizardStep::Preview {
            return Ok(None);
        }
        if enabled {
            Ok(self.optionally_enhance().await)
        } else {
            self.restore_original().await;
            Ok(None)
        }
    }

    /// Put the user's own text back. Returns whether anything changed.
    pub async fn revert_enhancement(&mut self) -> Result<bool, WizardError> {
        if self.step != WizardStep::Preview {
            return Err(WizardError::InvalidState {
                step: self.step,
                action: "revert the enhancement",
            });
        }
        Ok(self.restore_original().await)
    }

    /// Persist the draft as a confession.
    ///
    /// On failure the wizard returns to Preview with the draft untouched so
    /// the user can retry.
    pub async fn submit<R: ConfessionRepository>(
        &mut self,
        repo: &R,
    ) -> Result<Submission, WizardError> {
        match self.step {
            WizardStep::Preview => {}
            WizardStep::Submitting => return Err(WizardError::AlreadySubmitting),
            step => {
                return Err(WizardError::InvalidState {
                    step,
                    action: "submit",
                });
            }
        }

        let record = build_record(self.slot.get()).map_err(WizardError::Validation)?;
        self.step = WizardStep::Submitting;

        match create_with_fresh_code(repo, record).await {
            Ok(confession) => {
                self.slot.clear(ConfessionDraft::default()).await;
                self.step = WizardStep::Submitted;
                tracing::info!(
                    confession_id = %confession.id,
                    code = %confession.unique_code,
                    anonymous = confession.is_anonymous,
                    "confession submitted"
                );
                let redirect = Redirect {
                    path: format!("/confession/{}", confession.unique_code),
                    after: self.settings.redirect_delay,
                };
                Ok(Submission {
                    confession,
                    redirect,
                })
            }
            Err(e) => {
                self.step = WizardStep::Preview;
                tracing::warn!(error = %e, "confession submission failed");
                Err(WizardError::Network(e.to_string()))
            }
        }
    }

    fn ensure_editable(&self, action: &'static str) -> Result<(), WizardError> {
        match self.step {
            WizardStep::Submitting => Err(WizardError::AlreadySubmitting),
            WizardStep::Submitted => Err(WizardError::InvalidState {
                step: self.step,
                action,
            }),
            _ => Ok(()),
        }
    }

    /// Run the enhancer on the user's own text, if one is configured and
    /// requested. Never fails: problems come back as a notice and the
    /// message stays as it was.
    async fn optionally_enhance(&mut self) -> Option<Notice> {
        if !self.enhancement_requested {
            return None;
        }
        let Some(enhancer) = self.enhancer.clone() else {
            tracing::debug!("no enhancer configured, keeping message as written");
            return None;
        };

        let draft = self.slot.get();
        let base = draft.original_message.clone().or_else(|| draft.message.clone())?;
        let mut request = draft.clone();
        request.message = Some(base.clone());

        let outcome = match tokio::time::timeout(
            self.settings.enhance_timeout,
            enhancer.enhance(&request),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(EnhanceError::Timeout(self.settings.enhance_timeout.as_secs())),
        };
        // The replacement must still pass the Message step.
        let outcome = outcome.and_then(|text| {
            let length = text.trim().chars().count();
            if (MIN_MESSAGE_LENGTH..=MAX_MESSAGE_LENGTH).contains(&length) {
                Ok(text)
            } else {
                Err(EnhanceError::Malformed(length))
            }
        });

        match outcome {
            Ok(text) if text == base => {
                self.restore_original().await;
                None
            }
            Ok(text) => {
                self.slot
                    .update(|d| {
                        d.message = Some(text);
                        d.original_message = Some(base);
                    })
                    .await;
                tracing::info!("message enhanced");
                None
            }
            Err(EnhanceError::Unavailable) => None,
            Err(e) => {
                tracing::warn!(error = %e, "enhancement failed, keeping message");
                Some(Notice::new(format!(
                    "Couldn't polish your message ({e}). Your words are kept as written."
                )))
            }
        }
    }

    async fn restore_original(&mut self) -> bool {
        if self.slot.get().original_message.is_none() {
            return false;
        }
        self.slot
            .update(|d| {
                if let Some(original) = d.original_message.take() {
                    d.message = Some(original);
                }
            })
            .await;
        true
    }
}
